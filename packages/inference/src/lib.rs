#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Single-record rent inference pipeline.
//!
//! Takes the raw form, coerces it into the feature schema, builds the
//! one-row model input, asks the model for a prediction and formats it for
//! display. Nothing is cached between calls: the same form and model always
//! yield the same result.

use rent_predictor_model::{ModelError, RentOracle};
use rent_predictor_property::{RawPropertyForm, ValidationError, coerce};
use rent_predictor_property_models::PropertyRecord;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while predicting a rent.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The submitted form is invalid; the model was not called.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The model rejected the request or failed to produce a value.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl InferenceError {
    /// Returns `true` if the user can fix the error by editing the form.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A successful rent prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentPrediction {
    /// The coerced record that was sent to the model.
    pub record: PropertyRecord,
    /// Predicted monthly rent in R$.
    pub rent: f64,
    /// `rent` with two decimal places.
    pub formatted: String,
}

/// Formats a rent amount with exactly two decimal places.
#[must_use]
pub fn format_rent(rent: f64) -> String {
    format!("{rent:.2}")
}

/// Runs the full pipeline for one raw form.
///
/// # Errors
///
/// Returns [`InferenceError::Validation`] if the form cannot be coerced, in
/// which case the model is never called, or [`InferenceError::Model`] if the
/// model fails.
pub fn predict_rent(
    oracle: &dyn RentOracle,
    form: &RawPropertyForm,
) -> Result<RentPrediction, InferenceError> {
    let record = coerce(form)?;
    predict_record(oracle, record)
}

/// Predicts the rent of an already coerced record.
///
/// # Errors
///
/// Returns [`InferenceError::Model`] if the model fails.
pub fn predict_record(
    oracle: &dyn RentOracle,
    record: PropertyRecord,
) -> Result<RentPrediction, InferenceError> {
    let row = record.to_row();
    let rent = oracle.predict(&row).inspect_err(|e| {
        log::error!("Prediction failed for city '{}': {e}", record.city);
    })?;

    log::debug!("Predicted rent {rent} for {record:?}");

    Ok(RentPrediction {
        formatted: format_rent(rent),
        record,
        rent,
    })
}
