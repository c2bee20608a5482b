#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Property feature schema types shared by the rent predictor.
//!
//! This crate defines the canonical, ordered set of columns the rent model
//! was trained on, the typed [`PropertyRecord`] built for each prediction,
//! and the single-row [`FeatureRow`] handed to the model. Column names are
//! the exact strings of the training dataset (including the `(R$)` suffixes)
//! so the row layout never drifts from what the model expects.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Exact column names of the feature schema.
pub mod column {
    /// City name.
    pub const CITY: &str = "city";
    /// Floor area in square meters.
    pub const AREA: &str = "area";
    /// Number of rooms.
    pub const ROOMS: &str = "rooms";
    /// Number of bathrooms.
    pub const BATHROOM: &str = "bathroom";
    /// Number of parking spaces.
    pub const PARKING_SPACES: &str = "parking spaces";
    /// Floor the unit is on.
    pub const FLOOR: &str = "floor";
    /// Whether animals are allowed.
    pub const ANIMAL: &str = "animal";
    /// Whether the unit is furnished.
    pub const FURNITURE: &str = "furniture";
    /// Monthly homeowners association fee.
    pub const HOA: &str = "hoa (R$)";
    /// Monthly property tax.
    pub const PROPERTY_TAX: &str = "property tax (R$)";
    /// Monthly fire insurance.
    pub const FIRE_INSURANCE: &str = "fire insurance (R$)";
}

/// How the model consumes a column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeatureKind {
    /// Real-valued column (counts and currency amounts included).
    Numeric,
    /// String-valued column drawn from a vocabulary.
    Categorical,
}

/// A single column of the feature schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureColumn {
    /// Column name exactly as seen at training time.
    pub name: &'static str,
    /// How the column is consumed.
    pub kind: FeatureKind,
}

impl FeatureColumn {
    const fn numeric(name: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Numeric,
        }
    }

    const fn categorical(name: &'static str) -> Self {
        Self {
            name,
            kind: FeatureKind::Categorical,
        }
    }
}

/// The ordered feature schema the rent model was trained on.
pub const FEATURE_SCHEMA: &[FeatureColumn] = &[
    FeatureColumn::categorical(column::CITY),
    FeatureColumn::numeric(column::AREA),
    FeatureColumn::numeric(column::ROOMS),
    FeatureColumn::numeric(column::BATHROOM),
    FeatureColumn::numeric(column::PARKING_SPACES),
    FeatureColumn::numeric(column::FLOOR),
    FeatureColumn::categorical(column::ANIMAL),
    FeatureColumn::categorical(column::FURNITURE),
    FeatureColumn::numeric(column::HOA),
    FeatureColumn::numeric(column::PROPERTY_TAX),
    FeatureColumn::numeric(column::FIRE_INSURANCE),
];

/// A set of user-facing labels for enum-valued fields.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LabelSet {
    /// The values the model was trained on (`"yes"`, `"furnished"`, ...).
    Canonical,
    /// Spanish form labels (`"Sí"`, `"Amueblado"`, ...).
    Spanish,
}

impl LabelSet {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Canonical, Self::Spanish]
    }
}

/// An enum-valued feature with one label per variant in every [`LabelSet`].
///
/// Within a label set the mapping is a bijection, so converting a variant to
/// a label and back always yields the same variant.
pub trait LabeledFeature: Copy + Eq + 'static {
    /// All variants, in display order.
    fn all() -> &'static [Self];

    /// The label shown for this variant in the given label set.
    fn label(self, set: LabelSet) -> &'static str;

    /// The value handed to the model.
    fn canonical(self) -> &'static str {
        self.label(LabelSet::Canonical)
    }

    /// Resolves a label from any label set, ignoring case and surrounding
    /// whitespace.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        LabelSet::all().iter().find_map(|set| {
            Self::all()
                .iter()
                .copied()
                .find(|variant| variant.label(*set).to_lowercase() == label.to_lowercase())
        })
    }
}

/// Whether the property accepts animals.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Animal {
    /// Animals are allowed.
    Yes,
    /// Animals are not allowed.
    No,
}

impl LabeledFeature for Animal {
    fn all() -> &'static [Self] {
        &[Self::Yes, Self::No]
    }

    fn label(self, set: LabelSet) -> &'static str {
        match (set, self) {
            (LabelSet::Canonical, Self::Yes) => "yes",
            (LabelSet::Canonical, Self::No) => "no",
            (LabelSet::Spanish, Self::Yes) => "Sí",
            (LabelSet::Spanish, Self::No) => "No",
        }
    }
}

/// Whether the property is rented furnished.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Furniture {
    /// Rented with furniture.
    #[serde(rename = "furnished")]
    #[strum(serialize = "furnished")]
    Furnished,
    /// Rented empty.
    #[serde(rename = "not furnished")]
    #[strum(serialize = "not furnished")]
    NotFurnished,
}

impl LabeledFeature for Furniture {
    fn all() -> &'static [Self] {
        &[Self::Furnished, Self::NotFurnished]
    }

    fn label(self, set: LabelSet) -> &'static str {
        match (set, self) {
            (LabelSet::Canonical, Self::Furnished) => "furnished",
            (LabelSet::Canonical, Self::NotFurnished) => "not furnished",
            (LabelSet::Spanish, Self::Furnished) => "Amueblado",
            (LabelSet::Spanish, Self::NotFurnished) => "No amueblado",
        }
    }
}

/// A fully validated property description, one field per schema column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// City name.
    pub city: String,
    /// Floor area in square meters.
    pub area: f64,
    /// Number of rooms.
    pub rooms: u32,
    /// Number of bathrooms.
    pub bathroom: u32,
    /// Number of parking spaces.
    #[serde(rename = "parking spaces")]
    pub parking_spaces: u32,
    /// Floor the unit is on.
    pub floor: u32,
    /// Whether animals are allowed.
    pub animal: Animal,
    /// Whether the unit is furnished.
    pub furniture: Furniture,
    /// Monthly HOA fee in R$.
    #[serde(rename = "hoa (R$)")]
    pub hoa: f64,
    /// Monthly property tax in R$.
    #[serde(rename = "property tax (R$)")]
    pub property_tax: f64,
    /// Monthly fire insurance in R$.
    #[serde(rename = "fire insurance (R$)")]
    pub fire_insurance: f64,
}

impl PropertyRecord {
    /// Builds the single-row model input, in [`FEATURE_SCHEMA`] order.
    #[must_use]
    pub fn to_row(&self) -> FeatureRow {
        FeatureRow::new(vec![
            (column::CITY.to_string(), FeatureValue::Category(self.city.clone())),
            (column::AREA.to_string(), FeatureValue::Number(self.area)),
            (
                column::ROOMS.to_string(),
                FeatureValue::Number(f64::from(self.rooms)),
            ),
            (
                column::BATHROOM.to_string(),
                FeatureValue::Number(f64::from(self.bathroom)),
            ),
            (
                column::PARKING_SPACES.to_string(),
                FeatureValue::Number(f64::from(self.parking_spaces)),
            ),
            (
                column::FLOOR.to_string(),
                FeatureValue::Number(f64::from(self.floor)),
            ),
            (
                column::ANIMAL.to_string(),
                FeatureValue::Category(self.animal.canonical().to_string()),
            ),
            (
                column::FURNITURE.to_string(),
                FeatureValue::Category(self.furniture.canonical().to_string()),
            ),
            (column::HOA.to_string(), FeatureValue::Number(self.hoa)),
            (
                column::PROPERTY_TAX.to_string(),
                FeatureValue::Number(self.property_tax),
            ),
            (
                column::FIRE_INSURANCE.to_string(),
                FeatureValue::Number(self.fire_insurance),
            ),
        ])
    }
}

/// A single cell of a [`FeatureRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// A numeric cell.
    Number(f64),
    /// A categorical cell.
    Category(String),
}

impl FeatureValue {
    /// Returns the column kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        match self {
            Self::Number(_) => FeatureKind::Numeric,
            Self::Category(_) => FeatureKind::Categorical,
        }
    }
}

/// An ordered single-row model input: `(column name, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    /// Creates a row from ordered `(column name, value)` pairs.
    #[must_use]
    pub const fn new(columns: Vec<(String, FeatureValue)>) -> Self {
        Self { columns }
    }

    /// Returns the ordered cells of the row.
    #[must_use]
    pub fn columns(&self) -> &[(String, FeatureValue)] {
        &self.columns
    }

    /// Looks up a cell by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the row has exactly the columns of `schema`, with
    /// matching kinds, in the same order.
    #[must_use]
    pub fn matches_schema(&self, schema: &[FeatureColumn]) -> bool {
        self.columns.len() == schema.len()
            && self
                .columns
                .iter()
                .zip(schema)
                .all(|((name, value), column)| name == column.name && value.kind() == column.kind)
    }
}
