#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the rent predictor server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the pipeline and analytics types to allow independent evolution of
//! the API contract.

use rent_predictor_analytics_models::{CityRentSummary, FeatureImportanceOutcome, MapPoint};
use rent_predictor_inference::RentPrediction;
use rent_predictor_property::{FormField, ValidationError};
use rent_predictor_property_models::PropertyRecord;
use serde::Serialize;

/// Page title shown above the form.
pub const FORM_TITLE: &str = "Predicción de Precios de Alquiler";

/// Introductory text shown above the form.
pub const FORM_DESCRIPTION: &str = "Por favor ingrese los detalles de la propiedad para la cual le gustaría predecir el precio de alquiler.";

/// Currency symbol used for every amount.
pub const CURRENCY: &str = "R$";

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Description of the property form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiForm {
    /// Page title.
    pub title: &'static str,
    /// Introductory text.
    pub description: &'static str,
    /// Inputs in feature schema order.
    pub fields: Vec<FormField>,
}

impl ApiForm {
    /// Builds the form description from the given fields.
    #[must_use]
    pub const fn new(fields: Vec<FormField>) -> Self {
        Self {
            title: FORM_TITLE,
            description: FORM_DESCRIPTION,
            fields,
        }
    }
}

/// A successful rent prediction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPrediction {
    /// Predicted monthly rent.
    pub rent: f64,
    /// Rent with two decimal places.
    pub formatted: String,
    /// Currency symbol.
    pub currency: &'static str,
    /// Sentence to display to the user.
    pub message: String,
    /// The coerced record that was sent to the model.
    pub record: PropertyRecord,
}

impl From<RentPrediction> for ApiPrediction {
    fn from(prediction: RentPrediction) -> Self {
        Self {
            message: format!(
                "La renta mensual estimada para esta propiedad es de: {CURRENCY} {}",
                prediction.formatted
            ),
            rent: prediction.rent,
            formatted: prediction.formatted,
            currency: CURRENCY,
            record: prediction.record,
        }
    }
}

/// Whether an error can be fixed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The request was invalid; the user can correct it.
    Validation,
    /// The server failed; nothing the user can do.
    Internal,
}

/// Error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// Human-readable message.
    pub error: String,
    /// Offending form field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// Builds an internal error response.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Internal,
            error: message.into(),
            field: None,
        }
    }

    /// Builds a validation error response for a malformed request body.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            error: message.into(),
            field: None,
        }
    }
}

impl From<&ValidationError> for ApiError {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            error: err.to_string(),
            field: Some(err.field().to_string()),
        }
    }
}

/// Feature importance chart data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFeatureImportance {
    /// Chart title.
    pub title: &'static str,
    /// Ranked features or the reason they are unavailable.
    #[serde(flatten)]
    pub outcome: FeatureImportanceOutcome,
}

/// Average rent of every city in the dataset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCityRents {
    /// Per-city summaries, sorted by city name.
    pub cities: Vec<CityRentSummary>,
}

/// Map of average rents for cities with known coordinates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRentMap {
    /// Map title.
    pub title: &'static str,
    /// Markers to draw.
    pub points: Vec<MapPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_predictor_property_models::{Animal, Furniture};

    #[test]
    fn prediction_message_uses_formatted_rent() {
        let api = ApiPrediction::from(RentPrediction {
            record: PropertyRecord {
                city: "Campinas".to_string(),
                area: 50.0,
                rooms: 1,
                bathroom: 1,
                parking_spaces: 0,
                floor: 1,
                animal: Animal::No,
                furniture: Furniture::Furnished,
                hoa: 0.0,
                property_tax: 0.0,
                fire_insurance: 0.0,
            },
            rent: 1234.5,
            formatted: "1234.50".to_string(),
        });
        assert_eq!(
            api.message,
            "La renta mensual estimada para esta propiedad es de: R$ 1234.50"
        );
    }

    #[test]
    fn validation_errors_carry_their_field() {
        let api = ApiError::from(&ValidationError::Missing { field: "city" });
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["field"], "city");
    }

    #[test]
    fn importance_outcome_is_flattened() {
        let api = ApiFeatureImportance {
            title: "t",
            outcome: FeatureImportanceOutcome::Unavailable {
                reason: "no data".to_string(),
            },
        };
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "no data");
        assert_eq!(json["title"], "t");
    }
}
