//! Descriptive metadata for rendering the property form.

use rent_predictor_property_models::{
    Animal, FeatureKind, Furniture, LabelSet, LabeledFeature, column,
};
use serde::Serialize;

use crate::coerce::{
    DEFAULT_ANIMAL, DEFAULT_FURNITURE, MIN_AREA, MIN_COUNT, MIN_CURRENCY, MIN_PARKING_SPACES,
};

/// One input of the property form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Schema column the input feeds.
    pub column: &'static str,
    /// Spanish caption shown above the input.
    pub caption: &'static str,
    /// English caption.
    pub caption_en: &'static str,
    /// How the column is consumed by the model.
    pub kind: FeatureKind,
    /// Input widget description.
    pub input: FormInput,
}

/// The widget used for a [`FormField`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormInput {
    /// Free text input.
    Text,
    /// Numeric input with a minimum, prefilled with the default.
    Number {
        /// Smallest accepted value; lower values are clamped to it.
        min: f64,
        /// Prefilled value.
        default: f64,
        /// Whether only whole numbers are accepted.
        integer: bool,
    },
    /// Single choice among labeled options.
    Select {
        /// Options in display order.
        options: Vec<FormOption>,
        /// Canonical value selected by default.
        default: &'static str,
    },
}

/// One option of a [`FormInput::Select`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOption {
    /// Canonical value sent to the model.
    pub value: &'static str,
    /// Spanish label shown to the user.
    pub label: &'static str,
}

fn options<T: LabeledFeature>() -> Vec<FormOption> {
    T::all()
        .iter()
        .map(|variant| FormOption {
            value: variant.canonical(),
            label: variant.label(LabelSet::Spanish),
        })
        .collect()
}

#[allow(clippy::cast_lossless)]
const fn count(min: u32) -> FormInput {
    FormInput::Number {
        min: min as f64,
        default: min as f64,
        integer: true,
    }
}

const fn amount(min: f64) -> FormInput {
    FormInput::Number {
        min,
        default: min,
        integer: false,
    }
}

/// Returns the form inputs in feature schema order.
#[must_use]
pub fn form_fields() -> Vec<FormField> {
    vec![
        FormField {
            column: column::CITY,
            caption: "Ciudad",
            caption_en: "City",
            kind: FeatureKind::Categorical,
            input: FormInput::Text,
        },
        FormField {
            column: column::AREA,
            caption: "Área (en m2)",
            caption_en: "Area (m2)",
            kind: FeatureKind::Numeric,
            input: amount(MIN_AREA),
        },
        FormField {
            column: column::ROOMS,
            caption: "Número de habitaciones",
            caption_en: "Rooms",
            kind: FeatureKind::Numeric,
            input: count(MIN_COUNT),
        },
        FormField {
            column: column::BATHROOM,
            caption: "Número de baños",
            caption_en: "Bathrooms",
            kind: FeatureKind::Numeric,
            input: count(MIN_COUNT),
        },
        FormField {
            column: column::PARKING_SPACES,
            caption: "Número de espacios de estacionamiento",
            caption_en: "Parking spaces",
            kind: FeatureKind::Numeric,
            input: count(MIN_PARKING_SPACES),
        },
        FormField {
            column: column::FLOOR,
            caption: "Piso",
            caption_en: "Floor",
            kind: FeatureKind::Numeric,
            input: count(MIN_COUNT),
        },
        FormField {
            column: column::ANIMAL,
            caption: "Se permiten mascotas",
            caption_en: "Animals allowed",
            kind: FeatureKind::Categorical,
            input: FormInput::Select {
                options: options::<Animal>(),
                default: DEFAULT_ANIMAL.canonical(),
            },
        },
        FormField {
            column: column::FURNITURE,
            caption: "Amueblado",
            caption_en: "Furnished",
            kind: FeatureKind::Categorical,
            input: FormInput::Select {
                options: options::<Furniture>(),
                default: DEFAULT_FURNITURE.canonical(),
            },
        },
        FormField {
            column: column::HOA,
            caption: "Impuesto de la Asociación de Propietarios (en R$)",
            caption_en: "HOA fee (R$)",
            kind: FeatureKind::Numeric,
            input: amount(MIN_CURRENCY),
        },
        FormField {
            column: column::PROPERTY_TAX,
            caption: "Impuesto sobre la propiedad (en R$)",
            caption_en: "Property tax (R$)",
            kind: FeatureKind::Numeric,
            input: amount(MIN_CURRENCY),
        },
        FormField {
            column: column::FIRE_INSURANCE,
            caption: "Seguro contra incendios (en R$)",
            caption_en: "Fire insurance (R$)",
            kind: FeatureKind::Numeric,
            input: amount(MIN_CURRENCY),
        },
    ]
}
