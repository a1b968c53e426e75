//! CSV loader for batches of estimate requests.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive. Any column may be omitted entirely; a missing
//! column reads the same as an empty cell.
//!
//! | Column              | Type    | Notes |
//! |---------------------|---------|-------|
//! | `owner_birth_date`  | date    | `YYYY-MM-DD`; an empty cell is rejected by the eligibility gate |
//! | `land_value`        | text    | Digits with optional separators, e.g. `"500,000,000"` |
//! | `valuation_method`  | string  | `public` (default when empty) or `appraised` |
//! | `survivor_election` | flag    | `yes`/`no`, `true`/`false`, `1`/`0`; empty is `no` |
//! | `spouse_birth_date` | date    | Required by the gate when the survivor option is elected |
//!
//! Structural problems (bad dates, unknown methods) fail the whole load.
//! Missing answers are kept so the gate can report them per row.
//!
//! ### Example
//!
//! ```csv
//! owner_birth_date,land_value,valuation_method,survivor_election,spouse_birth_date
//! 1961-04-02,"200,000,000",public,no,
//! 1951-09-15,"1,000,000,000",appraised,yes,1954-02-11
//! ```
use std::path::Path;

use chrono::NaiveDate;
use pension_core::ValuationMethod;
use pension_core::intake::EstimationRequest;
use serde::Deserialize;

use crate::utils::{LandValueParseError, parse_flag, parse_land_value};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    owner_birth_date: Option<NaiveDate>,
    land_value: Option<String>,
    valuation_method: Option<String>,
    survivor_election: Option<String>,
    spouse_birth_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, unparseable date, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `valuation_method` cell was not a recognised method. `row` is the
    /// 1-based data row number (header = row 0).
    #[error("unrecognised valuation method '{value}' on row {row}")]
    InvalidValuationMethod { value: String, row: usize },

    #[error("invalid land value on row {row}: {source}")]
    InvalidLandValue {
        row: usize,
        #[source]
        source: LandValueParseError,
    },

    #[error("unrecognised survivor election '{value}' on row {row}")]
    InvalidSurvivorElection { value: String, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Convert a single CSV row into an EstimationRequest.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<EstimationRequest, CsvLoadError> {
    let valuation_method = match row.valuation_method.as_deref().map(str::trim) {
        None | Some("") => ValuationMethod::default(),
        Some(value) => {
            ValuationMethod::parse(value).ok_or_else(|| CsvLoadError::InvalidValuationMethod {
                value: value.to_string(),
                row: row_number,
            })?
        }
    };

    let land_value = match row.land_value.as_deref() {
        Some(text) => {
            parse_land_value(text).map_err(|source| CsvLoadError::InvalidLandValue {
                row: row_number,
                source,
            })?
        }
        None => None,
    };

    let survivor_text = row.survivor_election.unwrap_or_default();
    let has_survivor_election =
        parse_flag(&survivor_text).ok_or_else(|| CsvLoadError::InvalidSurvivorElection {
            value: survivor_text.clone(),
            row: row_number,
        })?;

    Ok(EstimationRequest {
        owner_birth_date: row.owner_birth_date,
        land_value,
        valuation_method,
        has_survivor_election,
        spouse_birth_date: row.spouse_birth_date,
    })
}

/// Parse CSV text (the full file contents as a &str) and return a vector of
/// EstimationRequest. Rows are returned in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a date
///   cannot be deserialised.
/// * [CsvLoadError::InvalidValuationMethod],
///   [CsvLoadError::InvalidLandValue],
///   [CsvLoadError::InvalidSurvivorElection] – if a cell holds a value that
///   cannot be interpreted.
pub fn load_from_str(input: &str) -> Result<Vec<EstimationRequest>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<EstimationRequest>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
