use std::fs::File;
use std::io::Read;
use std::path::Path;

use pension_core::{AgeFactorTable, AgeFactors, FactorTableError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Row label used for the overflow row.
pub const OVERFLOW_LABEL: &str = "max";

/// Errors that can occur when loading age factor data.
#[derive(Debug, Error)]
pub enum AgeFactorLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid age '{value}' on row {row} (expected a whole number or 'max')")]
    InvalidAge { value: String, row: usize },

    #[error("No 'max' row found")]
    MissingOverflowRow,

    #[error("Duplicate 'max' row on row {0}")]
    DuplicateOverflowRow(usize),

    #[error("Invalid factor table: {0}")]
    Table(#[from] FactorTableError),
}

impl From<csv::Error> for AgeFactorLoaderError {
    fn from(err: csv::Error) -> Self {
        AgeFactorLoaderError::CsvParse(err.to_string())
    }
}

/// Which table row a CSV record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAge {
    Age(u32),
    Overflow,
}

impl RowAge {
    fn parse(
        value: &str,
        row: usize,
    ) -> Result<Self, AgeFactorLoaderError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(OVERFLOW_LABEL) {
            return Ok(Self::Overflow);
        }
        value
            .parse::<u32>()
            .map(Self::Age)
            .map_err(|_| AgeFactorLoaderError::InvalidAge {
                value: value.to_string(),
                row,
            })
    }
}

/// A single record from an age factor CSV file.
///
/// - `age`: whole-number age, or `max` for the overflow row
/// - `life`, `term5`, `term10`, `term15`: monthly payout per
///   100,000,000 of land value
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgeFactorRecord {
    pub age: String,
    pub life: Decimal,
    pub term5: Decimal,
    pub term10: Decimal,
    pub term15: Decimal,
}

impl AgeFactorRecord {
    fn factors(&self) -> AgeFactors {
        AgeFactors {
            life: self.life,
            term5: self.term5,
            term10: self.term10,
            term15: self.term15,
        }
    }
}

/// Loader for age factor tables stored as CSV.
///
/// The file needs one row per age plus exactly one `max` row:
///
/// ```csv
/// age,life,term5,term10,term15
/// 60,230000,1600000,850000,600000
/// 61,245000,1630000,870000,620000
/// max,750000,2500000,1500000,1200000
/// ```
pub struct AgeFactorLoader;

impl AgeFactorLoader {
    /// Parse age factor records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice. Surrounding whitespace in cells is ignored.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<AgeFactorRecord>, AgeFactorLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: AgeFactorRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a table from parsed records.
    ///
    /// Row numbers in errors are 1-based data rows (the header is not
    /// counted). A table whose factors fall with age is still returned; each
    /// such drop is logged as a warning.
    pub fn build(records: &[AgeFactorRecord]) -> Result<AgeFactorTable, AgeFactorLoaderError> {
        let mut rows = Vec::with_capacity(records.len());
        let mut overflow = None;

        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            match RowAge::parse(&record.age, row)? {
                RowAge::Age(age) => rows.push((age, record.factors())),
                RowAge::Overflow => {
                    if overflow.replace(record.factors()).is_some() {
                        return Err(AgeFactorLoaderError::DuplicateOverflowRow(row));
                    }
                }
            }
        }

        let overflow = overflow.ok_or(AgeFactorLoaderError::MissingOverflowRow)?;
        let table = AgeFactorTable::from_rows(rows, overflow)?;

        for violation in table.monotonic_violations() {
            warn!(
                age = violation.age,
                kind = %violation.kind,
                previous = %violation.previous,
                current = %violation.current,
                "factor decreases with age"
            );
        }
        debug!(
            rows = table.len(),
            min_age = table.min_age(),
            max_age = table.max_age(),
            "built age factor table"
        );

        Ok(table)
    }

    /// Parse and build a table from a reader.
    pub fn load<R: Read>(reader: R) -> Result<AgeFactorTable, AgeFactorLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    /// Read a table from a file on disk.
    pub fn load_from_path(path: &Path) -> Result<AgeFactorTable, AgeFactorLoaderError> {
        let file = File::open(path).map_err(|source| AgeFactorLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(file)
    }
}
