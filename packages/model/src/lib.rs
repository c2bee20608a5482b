#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading and evaluation of the pre-trained rent regression model.
//!
//! The model is produced by an external training process and shipped as a
//! JSON artifact (see [`artifact`]). [`ModelHandle`] loads it once, checks it
//! for internal consistency, and then answers predictions for single rows.
//! Callers depend on the [`RentOracle`] trait rather than the concrete handle
//! so the pipeline and analytics can be exercised against stubs.
//!
//! A loaded [`ModelHandle`] is immutable and evaluation is a pure tree walk,
//! so one handle can be shared across threads behind an `Arc` without
//! locking.

pub mod artifact;
mod handle;

pub use handle::{ARTIFACT_FILE_NAME, ModelHandle};

use std::path::PathBuf;

use rent_predictor_property_models::FeatureRow;
use thiserror::Error;

/// Errors that can occur while loading or querying the rent model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact file could not be read.
    #[error("Failed to read model artifact {}: {source}", .path.display())]
    Io {
        /// Resolved artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact is not valid JSON for the expected layout.
    #[error("Failed to parse model artifact: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact parsed but cannot be evaluated by this runtime.
    #[error("Incompatible model artifact: {message}")]
    Incompatible {
        /// Description of what went wrong.
        message: String,
    },

    /// A row's columns do not line up with the columns the model was
    /// trained on.
    #[error("Feature schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the first difference found.
        message: String,
    },

    /// Importances need a held-out evaluation set the artifact does not
    /// carry.
    #[error("Feature importance is unavailable without a held-out evaluation set")]
    InsufficientData,

    /// The ensemble produced a non-finite value.
    #[error("Model produced a non-finite prediction: {value}")]
    InvalidOutput {
        /// The offending value.
        value: f64,
    },
}

impl ModelError {
    /// Returns `true` for errors raised while loading an artifact.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Json(_) | Self::Incompatible { .. }
        )
    }
}

/// A pre-trained rent regressor.
///
/// Implementations must be reentrant: the server calls them concurrently
/// from every worker.
pub trait RentOracle: Send + Sync {
    /// Predicts the monthly rent for a single row.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SchemaMismatch`] if the row does not match the
    /// training columns, or [`ModelError::InvalidOutput`] if no finite
    /// prediction could be produced.
    fn predict(&self, row: &FeatureRow) -> Result<f64, ModelError>;

    /// Returns `(feature name, importance)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InsufficientData`] when importances cannot be
    /// computed without a held-out evaluation set.
    fn feature_importance(&self) -> Result<Vec<(String, f64)>, ModelError>;
}
