#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Descriptive analytics over the rent model and historical listings.
//!
//! Two independent read paths feed the visualizations next to the form:
//! [`importance`] ranks the model's feature importances, and [`dataset`] plus
//! [`aggregate`] turn the historical listings CSV into per-city averages
//! placed on the map. Neither path touches the prediction pipeline.

pub mod aggregate;
pub mod dataset;
pub mod importance;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The dataset file could not be opened.
    #[error("Failed to open dataset {}: {source}", .path.display())]
    Io {
        /// Dataset path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The CSV is malformed or a value cannot be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn {
        /// The absent column.
        column: &'static str,
    },
}
