#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Form input coercion into the rent predictor feature schema.
//!
//! Raw form values arrive as loosely typed JSON (numbers or text, localized
//! labels for the yes/no style fields). [`coerce`] turns them into a typed
//! [`PropertyRecord`](rent_predictor_property_models::PropertyRecord),
//! applying the schema defaults and domain floors, or reports the first
//! field that cannot be interpreted. [`form_fields`] describes the form so a
//! front end can render it with the same defaults and minimums.

pub mod coerce;
pub mod form;

pub use coerce::{RawPropertyForm, RawValue, coerce};
pub use form::{FormField, FormInput, FormOption, form_fields};

use thiserror::Error;

/// A user-correctable problem with a submitted form value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was absent or blank.
    #[error("Missing value for '{field}'")]
    Missing {
        /// Schema column name.
        field: &'static str,
    },

    /// A numeric field could not be parsed as a finite number.
    #[error("'{value}' is not a valid number for '{field}'")]
    NotANumber {
        /// Schema column name.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// A count field was given a fractional value.
    #[error("{value} is not a whole number for '{field}'")]
    NotAnInteger {
        /// Schema column name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A count field exceeds what the schema can represent.
    #[error("{value} is out of range for '{field}'")]
    OutOfRange {
        /// Schema column name.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An enum field was given a label no label set recognizes.
    #[error("'{value}' is not an accepted option for '{field}'")]
    UnknownLabel {
        /// Schema column name.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },
}

impl ValidationError {
    /// Returns the schema column the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::NotANumber { field, .. }
            | Self::NotAnInteger { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownLabel { field, .. } => field,
        }
    }
}
