#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static city coordinate table for the rent map.
//!
//! The table of known city centroids is embedded at compile time from
//! `data/cities.toml`. Adding a city to the map only requires a new
//! `[[cities]]` entry there.

use std::collections::BTreeMap;

use rent_predictor_geography_models::{CityLocation, Coordinates};
use serde::Deserialize;
use thiserror::Error;

/// Embedded city table.
const CITIES_TOML: &str = include_str!("../data/cities.toml");

/// Number of cities in the embedded table. Enforced by a test.
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 5;

/// Errors that can occur while building a coordinate table.
#[derive(Debug, Error)]
pub enum GeoError {
    /// TOML parsing failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An entry is invalid.
    #[error("Invalid city entry: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct CityFile {
    cities: Vec<CityLocation>,
}

/// Immutable lookup from city name to centroid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityCoordinateTable {
    cities: BTreeMap<String, Coordinates>,
}

impl CityCoordinateTable {
    /// Returns the embedded table of known cities.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, a failure indicates a development error and is
    /// caught by the tests.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(CITIES_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded city table: {e}"))
    }

    /// Parses a table from TOML with one `[[cities]]` entry per city.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the TOML is malformed, a city is listed
    /// twice, or a coordinate is out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GeoError> {
        let file: CityFile = toml::de::from_str(toml_str)?;
        Self::from_locations(file.cities)
    }

    /// Builds a table from a list of locations.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Conversion`] for duplicate names or out-of-range
    /// coordinates.
    pub fn from_locations(
        locations: impl IntoIterator<Item = CityLocation>,
    ) -> Result<Self, GeoError> {
        let mut cities = BTreeMap::new();
        for location in locations {
            if !(-90.0..=90.0).contains(&location.latitude)
                || !(-180.0..=180.0).contains(&location.longitude)
            {
                return Err(GeoError::Conversion {
                    message: format!(
                        "'{}' has out-of-range coordinates ({}, {})",
                        location.name, location.latitude, location.longitude
                    ),
                });
            }
            let coordinates = location.coordinates();
            if cities.insert(location.name.clone(), coordinates).is_some() {
                return Err(GeoError::Conversion {
                    message: format!("'{}' is listed more than once", location.name),
                });
            }
        }

        log::debug!("Built coordinate table with {} cities", cities.len());
        Ok(Self { cities })
    }

    /// Looks up the centroid of a city by exact name.
    #[must_use]
    pub fn get(&self, city: &str) -> Option<Coordinates> {
        self.cities.get(city).copied()
    }

    /// Returns the number of known cities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if no city is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Iterates over known cities in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Coordinates)> {
        self.cities.iter().map(|(name, c)| (name.as_str(), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_builtin_table() {
        let table = CityCoordinateTable::builtin();
        assert_eq!(
            table.len(),
            EXPECTED_CITY_COUNT,
            "Expected {EXPECTED_CITY_COUNT} cities, found {}. \
             Update EXPECTED_CITY_COUNT after adding/removing cities.",
            table.len()
        );
        assert_eq!(
            table.get("São Paulo"),
            Some(Coordinates {
                latitude: -23.5505,
                longitude: -46.6333,
            })
        );
        assert_eq!(table.get("Recife"), None);
    }

    #[test]
    fn builtin_cities_are_in_brazil() {
        for (name, c) in CityCoordinateTable::builtin().iter() {
            assert!(
                (-34.0..=6.0).contains(&c.latitude) && (-74.0..=-34.0).contains(&c.longitude),
                "{name} is outside Brazil: {c:?}"
            );
        }
    }

    #[test]
    fn rejects_duplicates_and_bad_coordinates() {
        let duplicate = r#"
            [[cities]]
            name = "Campinas"
            latitude = -22.9
            longitude = -47.0

            [[cities]]
            name = "Campinas"
            latitude = -22.9
            longitude = -47.0
        "#;
        assert!(matches!(
            CityCoordinateTable::from_toml_str(duplicate),
            Err(GeoError::Conversion { .. })
        ));

        let out_of_range = r#"
            [[cities]]
            name = "Nowhere"
            latitude = -122.0
            longitude = 10.0
        "#;
        assert!(matches!(
            CityCoordinateTable::from_toml_str(out_of_range),
            Err(GeoError::Conversion { .. })
        ));

        assert!(matches!(
            CityCoordinateTable::from_toml_str("cities = 3"),
            Err(GeoError::Toml(_))
        ));
    }
}
