//! Per-city rent averages and their map markers.

use std::collections::BTreeMap;

use rent_predictor_analytics_models::{CityRent, CityRentSummary, MapPoint, RentListing};
use rent_predictor_geography::CityCoordinateTable;

/// Map title for the per-city averages.
pub const MAP_TITLE: &str = "Promedio de Alquiler por Ciudad en Brasil";

/// Computes the arithmetic mean rent of every city, sorted by city name.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rent_by_city(listings: &[RentListing]) -> Vec<CityRent> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for listing in listings {
        let entry = totals.entry(listing.city.as_str()).or_insert((0.0, 0));
        entry.0 += listing.rent;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(city, (sum, count))| CityRent {
            city: city.to_string(),
            average_rent: sum / count as f64,
            listings: count,
        })
        .collect()
}

/// Left-joins city averages with the coordinate table.
///
/// Cities missing from the table are kept with `coordinates: None`.
#[must_use]
pub fn join_coordinates(
    averages: Vec<CityRent>,
    table: &CityCoordinateTable,
) -> Vec<CityRentSummary> {
    averages
        .into_iter()
        .map(|avg| {
            let coordinates = table.get(&avg.city);
            if coordinates.is_none() {
                log::debug!("No coordinates for '{}'", avg.city);
            }
            CityRentSummary {
                city: avg.city,
                average_rent: avg.average_rent,
                listings: avg.listings,
                coordinates,
            }
        })
        .collect()
}

/// Builds map markers for every summary that has coordinates.
#[must_use]
pub fn map_points(summaries: &[CityRentSummary]) -> Vec<MapPoint> {
    summaries
        .iter()
        .filter_map(|summary| {
            summary.coordinates.map(|c| MapPoint {
                city: summary.city.clone(),
                latitude: c.latitude,
                longitude: c.longitude,
                average_rent: summary.average_rent,
                label: format!("{}: {:.2} R$", summary.city, summary.average_rent),
            })
        })
        .collect()
}

/// Averages, joins and returns the per-city summaries in one step.
#[must_use]
pub fn summarize_cities(
    listings: &[RentListing],
    table: &CityCoordinateTable,
) -> Vec<CityRentSummary> {
    join_coordinates(average_rent_by_city(listings), table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(city: &str, rent: f64) -> RentListing {
        RentListing {
            city: city.to_string(),
            rent,
        }
    }

    fn example() -> Vec<RentListing> {
        vec![
            listing("São Paulo", 1000.0),
            listing("São Paulo", 2000.0),
            listing("Unknown", 500.0),
        ]
    }

    #[test]
    fn averages_per_city() {
        let averages = average_rent_by_city(&example());
        assert_eq!(
            averages,
            vec![
                CityRent {
                    city: "São Paulo".to_string(),
                    average_rent: 1500.0,
                    listings: 2,
                },
                CityRent {
                    city: "Unknown".to_string(),
                    average_rent: 500.0,
                    listings: 1,
                },
            ]
        );
    }

    #[test]
    fn unknown_cities_stay_in_the_aggregate_but_not_on_the_map() {
        let summaries = summarize_cities(&example(), &CityCoordinateTable::builtin());
        assert_eq!(summaries.len(), 2);

        let unknown = summaries.iter().find(|s| s.city == "Unknown").unwrap();
        assert_eq!(unknown.coordinates, None);
        assert!((unknown.average_rent - 500.0).abs() < f64::EPSILON);

        let points = map_points(&summaries);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].city, "São Paulo");
        assert_eq!(points[0].label, "São Paulo: 1500.00 R$");
        assert!((points[0].latitude - -23.5505).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_yields_empty_aggregate() {
        assert!(average_rent_by_city(&[]).is_empty());
        assert!(map_points(&[]).is_empty());
    }
}
