#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for rent analytics.
//!
//! Covers the two read-only views shown next to the prediction form: the
//! model's feature-importance ranking and the average rent per city.

use rent_predictor_geography_models::Coordinates;
use serde::{Deserialize, Serialize};

/// A feature with its importance score and position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFeature {
    /// 1-based rank, 1 being the most important feature.
    pub rank: usize,
    /// Feature name as reported by the model.
    pub feature: String,
    /// Importance score.
    pub importance: f64,
}

/// Outcome of asking the model for feature importances.
///
/// Absence is an expected state, so callers must branch on it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeatureImportanceOutcome {
    /// Importances sorted ascending (least important first), ready for a
    /// horizontal bar chart that draws the most important feature on top.
    Available {
        /// Ranked features, ascending by importance.
        features: Vec<RankedFeature>,
    },
    /// The model could not provide importances.
    Unavailable {
        /// User-facing explanation.
        reason: String,
    },
}

/// One historical listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentListing {
    /// City name.
    pub city: String,
    /// Monthly rent in R$.
    pub rent: f64,
}

/// Average rent of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRent {
    /// City name.
    pub city: String,
    /// Arithmetic mean of the city's listings.
    pub average_rent: f64,
    /// Number of listings averaged.
    pub listings: usize,
}

/// Average rent of a city joined with its centroid, when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRentSummary {
    /// City name.
    pub city: String,
    /// Arithmetic mean of the city's listings.
    pub average_rent: f64,
    /// Number of listings averaged.
    pub listings: usize,
    /// Centroid, or `None` for cities missing from the coordinate table.
    pub coordinates: Option<Coordinates>,
}

/// A city marker ready to be drawn on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// City name.
    pub city: String,
    /// Marker latitude.
    pub latitude: f64,
    /// Marker longitude.
    pub longitude: f64,
    /// Average rent in R$.
    pub average_rent: f64,
    /// Hover text, e.g. `"São Paulo: 1500.00 R$"`.
    pub label: String,
}
