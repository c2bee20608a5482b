//! Loading of the historical rent listings CSV.

use std::io::Read;
use std::path::Path;

use rent_predictor_analytics_models::RentListing;
use serde::Deserialize;

use crate::AnalyticsError;

/// Column holding the city name.
pub const CITY_COLUMN: &str = "city";
/// Column holding the monthly rent.
pub const RENT_COLUMN: &str = "rent amount (R$)";

/// The subset of a dataset row this crate reads; other columns are ignored.
#[derive(Debug, Deserialize)]
struct DatasetRow {
    city: String,
    #[serde(rename = "rent amount (R$)")]
    rent: Option<f64>,
}

/// Loads listings from a CSV file.
///
/// # Errors
///
/// Returns [`AnalyticsError::Io`] if the file cannot be opened, or any error
/// from [`read_dataset`].
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<RentListing>, AnalyticsError> {
    let path = path.as_ref();
    log::info!("Loading rent dataset from {}", path.display());

    let file = std::fs::File::open(path).map_err(|source| AnalyticsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let listings = read_dataset(file)?;
    log::info!("Loaded {} listings", listings.len());
    Ok(listings)
}

/// Reads listings from CSV data with a header row.
///
/// Rows with a blank city or a blank rent are skipped.
///
/// # Errors
///
/// Returns [`AnalyticsError::MissingColumn`] if the `city` or
/// `rent amount (R$)` column is absent, or [`AnalyticsError::Csv`] for
/// malformed rows and unparseable rents.
pub fn read_dataset(reader: impl Read) -> Result<Vec<RentListing>, AnalyticsError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in [CITY_COLUMN, RENT_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(AnalyticsError::MissingColumn { column });
        }
    }

    let mut listings = Vec::new();
    let mut skipped = 0_usize;

    for row in csv_reader.deserialize::<DatasetRow>() {
        let row = row?;
        match row.rent {
            Some(rent) if !row.city.is_empty() && rent.is_finite() => {
                listings.push(RentListing {
                    city: row.city,
                    rent,
                });
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} listings with a blank city or rent");
    }

    Ok(listings)
}
