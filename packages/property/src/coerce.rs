//! Conversion of raw form values into a [`PropertyRecord`].

use rent_predictor_property_models::{
    Animal, Furniture, LabeledFeature, PropertyRecord, column,
};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Smallest accepted area, in square meters.
pub const MIN_AREA: f64 = 1.0;
/// Smallest accepted room, bathroom and floor count.
pub const MIN_COUNT: u32 = 1;
/// Smallest accepted parking space count.
pub const MIN_PARKING_SPACES: u32 = 0;
/// Smallest accepted currency amount.
pub const MIN_CURRENCY: f64 = 0.0;

/// Default animal policy when the field is not submitted.
pub const DEFAULT_ANIMAL: Animal = Animal::Yes;
/// Default furniture state when the field is not submitted.
pub const DEFAULT_FURNITURE: Furniture = Furniture::Furnished;

/// A single raw form value: either a JSON number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A JSON number.
    Number(f64),
    /// Free text, including numbers typed into text inputs.
    Text(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl RawValue {
    /// Returns `true` for blank text, which is treated like an absent field.
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    fn to_raw_string(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Raw property form as submitted by the presentation layer.
///
/// Keys are the schema column names; snake_case aliases are accepted for the
/// columns whose names contain spaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPropertyForm {
    /// City name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<RawValue>,
    /// Area in square meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<RawValue>,
    /// Number of rooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<RawValue>,
    /// Number of bathrooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom: Option<RawValue>,
    /// Number of parking spaces.
    #[serde(
        default,
        rename = "parking spaces",
        alias = "parking_spaces",
        skip_serializing_if = "Option::is_none"
    )]
    pub parking_spaces: Option<RawValue>,
    /// Floor number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<RawValue>,
    /// Animal policy label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal: Option<RawValue>,
    /// Furniture label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furniture: Option<RawValue>,
    /// HOA fee in R$.
    #[serde(
        default,
        rename = "hoa (R$)",
        alias = "hoa",
        skip_serializing_if = "Option::is_none"
    )]
    pub hoa: Option<RawValue>,
    /// Property tax in R$.
    #[serde(
        default,
        rename = "property tax (R$)",
        alias = "property_tax",
        skip_serializing_if = "Option::is_none"
    )]
    pub property_tax: Option<RawValue>,
    /// Fire insurance in R$.
    #[serde(
        default,
        rename = "fire insurance (R$)",
        alias = "fire_insurance",
        skip_serializing_if = "Option::is_none"
    )]
    pub fire_insurance: Option<RawValue>,
}

/// Coerces a raw form into a schema-conformant [`PropertyRecord`].
///
/// Absent or blank fields take their schema default (the city has none and
/// is required). Values below a field's domain floor are clamped up to it.
///
/// # Errors
///
/// Returns [`ValidationError`] for the first field that is missing,
/// unparseable, fractional where a count is expected, too large to
/// represent, or carries an unrecognized label.
pub fn coerce(form: &RawPropertyForm) -> Result<PropertyRecord, ValidationError> {
    Ok(PropertyRecord {
        city: coerce_city(form.city.as_ref())?,
        area: coerce_real(column::AREA, form.area.as_ref(), MIN_AREA)?,
        rooms: coerce_count(column::ROOMS, form.rooms.as_ref(), MIN_COUNT)?,
        bathroom: coerce_count(column::BATHROOM, form.bathroom.as_ref(), MIN_COUNT)?,
        parking_spaces: coerce_count(
            column::PARKING_SPACES,
            form.parking_spaces.as_ref(),
            MIN_PARKING_SPACES,
        )?,
        floor: coerce_count(column::FLOOR, form.floor.as_ref(), MIN_COUNT)?,
        animal: coerce_label(column::ANIMAL, form.animal.as_ref(), DEFAULT_ANIMAL)?,
        furniture: coerce_label(column::FURNITURE, form.furniture.as_ref(), DEFAULT_FURNITURE)?,
        hoa: coerce_real(column::HOA, form.hoa.as_ref(), MIN_CURRENCY)?,
        property_tax: coerce_real(column::PROPERTY_TAX, form.property_tax.as_ref(), MIN_CURRENCY)?,
        fire_insurance: coerce_real(
            column::FIRE_INSURANCE,
            form.fire_insurance.as_ref(),
            MIN_CURRENCY,
        )?,
    })
}

/// Drops absent and blank values.
fn present(raw: Option<&RawValue>) -> Option<&RawValue> {
    raw.filter(|value| !value.is_blank())
}

fn coerce_city(raw: Option<&RawValue>) -> Result<String, ValidationError> {
    match present(raw) {
        None => Err(ValidationError::Missing {
            field: column::CITY,
        }),
        Some(value) => Ok(value.to_raw_string().trim().to_string()),
    }
}

/// Parses a decimal.
///
/// A `,` is accepted as the decimal separator when it is the only separator
/// and is followed by one or two digits. Text that looks like a thousands
/// group (`1,500`, `1.500`) is ambiguous and rejected.
fn parse_number(field: &'static str, raw: &RawValue) -> Result<f64, ValidationError> {
    let value = match raw {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(text) => {
            let text = text.trim();
            if is_thousands_group(text) {
                None
            } else {
                text.parse::<f64>()
                    .ok()
                    .or_else(|| parse_decimal_comma(text))
            }
        }
    };

    value
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            value: raw.to_raw_string(),
        })
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Matches `d[dd]` followed by `.` or `,` and exactly three digits, where the
/// leading group does not start with `0`.
fn is_thousands_group(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let Some((int, frac)) = unsigned.split_once(['.', ',']) else {
        return false;
    };
    int.len() <= 3
        && !int.starts_with('0')
        && all_digits(int)
        && frac.len() == 3
        && all_digits(frac)
}

fn parse_decimal_comma(text: &str) -> Option<f64> {
    let (int, frac) = text.split_once(',')?;
    if int.contains(['.', ',']) || frac.len() > 2 || !all_digits(frac) {
        return None;
    }
    format!("{int}.{frac}").parse().ok()
}

fn coerce_real(
    field: &'static str,
    raw: Option<&RawValue>,
    floor: f64,
) -> Result<f64, ValidationError> {
    let Some(raw) = present(raw) else {
        return Ok(floor);
    };

    let value = parse_number(field, raw)?;
    if value < floor {
        log::debug!("Clamping '{field}' from {value} to {floor}");
        return Ok(floor);
    }
    Ok(value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_count(
    field: &'static str,
    raw: Option<&RawValue>,
    floor: u32,
) -> Result<u32, ValidationError> {
    let Some(raw) = present(raw) else {
        return Ok(floor);
    };

    let value = parse_number(field, raw)?;
    if value < f64::from(floor) {
        log::debug!("Clamping '{field}' from {value} to {floor}");
        return Ok(floor);
    }
    if value.fract() != 0.0 {
        return Err(ValidationError::NotAnInteger { field, value });
    }
    if value > f64::from(u32::MAX) {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(value as u32)
}

fn coerce_label<T: LabeledFeature>(
    field: &'static str,
    raw: Option<&RawValue>,
    default: T,
) -> Result<T, ValidationError> {
    let Some(raw) = present(raw) else {
        return Ok(default);
    };

    let RawValue::Text(text) = raw else {
        return Err(ValidationError::UnknownLabel {
            field,
            value: raw.to_raw_string(),
        });
    };

    T::from_label(text).ok_or_else(|| ValidationError::UnknownLabel {
        field,
        value: text.clone(),
    })
}
