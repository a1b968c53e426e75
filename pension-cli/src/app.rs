//! Glue between the front end and the core estimator.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use pension_core::intake::{self, EstimationRequest, IntakeError};
use pension_core::{
    AgeFactorTable, EstimationResult, EstimatorConfig, PayoutEstimator, PayoutEstimatorError,
    ValuationMethod,
};
use pension_data::{AgeFactorLoader, AgeFactorLoaderError};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Estimate(#[from] PayoutEstimatorError),
}

/// Everything shown to the user for one successful estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateReport {
    pub owner_age: u32,
    pub spouse_age: Option<i32>,
    pub valuation_method: ValuationMethod,
    pub has_survivor_election: bool,
    pub result: EstimationResult,
}

/// Runs a raw request through the intake gate and the estimator.
///
/// The estimator is never called for a request the gate rejects.
pub fn estimate_request(
    estimator: &PayoutEstimator<'_>,
    request: &EstimationRequest,
    today: NaiveDate,
) -> Result<EstimateReport, AppError> {
    let validated = intake::validate(request, today)?;
    let result = estimator.estimate(&validated.input)?;

    Ok(EstimateReport {
        owner_age: validated.input.owner_age,
        spouse_age: validated.spouse_age,
        valuation_method: validated.input.valuation_method,
        has_survivor_election: validated.input.has_survivor_election,
        result,
    })
}

/// Outcome for one applicant in a batch. `row` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub row: usize,
    pub outcome: Result<EstimateReport, AppError>,
}

/// Estimates every request, keeping failures alongside successes.
pub fn estimate_batch(
    estimator: &PayoutEstimator<'_>,
    requests: &[EstimationRequest],
    today: NaiveDate,
) -> Vec<BatchRow> {
    let rows: Vec<BatchRow> = requests
        .iter()
        .enumerate()
        .map(|(idx, request)| {
            let outcome = estimate_request(estimator, request, today);
            if let Err(ref e) = outcome {
                debug!(row = idx + 1, error = %e, "applicant rejected");
            }
            BatchRow {
                row: idx + 1,
                outcome,
            }
        })
        .collect();

    let rejected = rows.iter().filter(|r| r.outcome.is_err()).count();
    info!(
        total = rows.len(),
        estimated = rows.len() - rejected,
        rejected,
        "batch complete"
    );

    rows
}

#[derive(Debug, Serialize)]
struct BatchCsvRow {
    row: usize,
    owner_age: Option<u32>,
    adjusted_land_value: Option<Decimal>,
    lifetime: Option<Decimal>,
    term5: Option<Decimal>,
    term10: Option<Decimal>,
    term15: Option<Decimal>,
    error: Option<String>,
}

impl From<&BatchRow> for BatchCsvRow {
    fn from(row: &BatchRow) -> Self {
        match &row.outcome {
            Ok(report) => Self {
                row: row.row,
                owner_age: Some(report.owner_age),
                adjusted_land_value: Some(report.result.adjusted_land_value),
                lifetime: Some(report.result.lifetime_amount),
                term5: Some(report.result.term5_amount),
                term10: Some(report.result.term10_amount),
                term15: Some(report.result.term15_amount),
                error: None,
            },
            Err(e) => Self {
                row: row.row,
                owner_age: None,
                adjusted_land_value: None,
                lifetime: None,
                term5: None,
                term10: None,
                term15: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Writes batch results as CSV with a header row.
pub fn write_batch_csv<W: Write>(
    writer: W,
    rows: &[BatchRow],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(BatchCsvRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Loads the factor table from `path`, or the built-in table when `None`.
pub fn load_factor_table(path: Option<&Path>) -> Result<AgeFactorTable, AgeFactorLoaderError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading custom age factor table");
            let table = AgeFactorLoader::load_from_path(path)?;
            if table.max_age() != AgeFactorTable::standard().max_age() {
                warn!(
                    max_age = table.max_age(),
                    "custom table does not end at the standard age"
                );
            }
            Ok(table)
        }
        None => Ok(AgeFactorTable::standard().clone()),
    }
}

/// Builds an estimator over `table` with the configured constants.
pub fn build_estimator(
    table: &AgeFactorTable,
    config: EstimatorConfig,
) -> Result<PayoutEstimator<'_>, PayoutEstimatorError> {
    PayoutEstimator::new(table, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(
        year: i32,
        month: u32,
        day: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 1)
    }

    fn request(
        birth_year: i32,
        land_value: u64,
    ) -> EstimationRequest {
        EstimationRequest {
            owner_birth_date: Some(date(birth_year, 3, 14)),
            land_value: Some(land_value),
            ..Default::default()
        }
    }

    // =========================================================================
    // estimate_request
    // =========================================================================

    #[test]
    fn estimate_request_age_65_scenario() {
        let estimator = PayoutEstimator::standard();

        let report = estimate_request(&estimator, &request(1960, 200_000_000), today()).unwrap();

        assert_eq!(report.owner_age, 65);
        assert_eq!(report.spouse_age, None);
        assert_eq!(report.result.lifetime_amount, dec!(610000));
        assert_eq!(report.result.term5_amount, dec!(3000000));
        assert_eq!(report.result.term10_amount, dec!(1900000));
        assert_eq!(report.result.term15_amount, dec!(1400000));
    }

    #[test]
    fn estimate_request_with_survivor_reports_spouse_age() {
        let estimator = PayoutEstimator::standard();
        let request = EstimationRequest {
            has_survivor_election: true,
            spouse_birth_date: Some(date(1963, 1, 1)),
            ..request(1960, 200_000_000)
        };

        let report = estimate_request(&estimator, &request, today()).unwrap();

        assert_eq!(report.spouse_age, Some(62));
        assert!(report.has_survivor_election);
        assert_eq!(report.result.lifetime_amount, dec!(518500));
        assert_eq!(report.result.term5_amount, dec!(3000000));
    }

    #[test]
    fn estimate_request_rejects_before_estimating() {
        let estimator = PayoutEstimator::standard();

        let err = estimate_request(&estimator, &request(1970, 200_000_000), today()).unwrap_err();

        assert_eq!(
            err,
            AppError::Intake(IntakeError::BelowEligibleAge {
                age: 55,
                minimum: 60
            })
        );
    }

    #[test]
    fn estimate_request_passes_through_intake_message() {
        let estimator = PayoutEstimator::standard();
        let request = EstimationRequest::default();

        let err = estimate_request(&estimator, &request, today()).unwrap_err();

        assert_eq!(err.to_string(), IntakeError::MissingBirthDate.to_string());
    }

    // =========================================================================
    // estimate_batch / write_batch_csv
    // =========================================================================

    #[test]
    fn batch_keeps_going_after_rejection() {
        let estimator = PayoutEstimator::standard();
        let requests = vec![
            request(1960, 200_000_000),
            EstimationRequest {
                land_value: None,
                ..request(1960, 0)
            },
            request(1940, 100_000_000),
        ];

        let rows = estimate_batch(&estimator, &requests, today());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.row).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(rows[0].outcome.is_ok());
        assert_eq!(
            rows[1].outcome,
            Err(AppError::Intake(IntakeError::MissingLandValue))
        );
        let oldest = rows[2].outcome.as_ref().unwrap();
        assert_eq!(oldest.owner_age, 85);
        assert_eq!(oldest.result.factor_age, 80);
        assert_eq!(oldest.result.lifetime_amount, dec!(652000));
    }

    #[test]
    fn batch_csv_has_header_and_error_column() {
        let estimator = PayoutEstimator::standard();
        let requests = vec![
            request(1960, 200_000_000),
            EstimationRequest {
                owner_birth_date: None,
                ..request(1960, 1)
            },
        ];
        let rows = estimate_batch(&estimator, &requests, today());

        let mut out = Vec::new();
        write_batch_csv(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "row,owner_age,adjusted_land_value,lifetime,term5,term10,term15,error"
        );
        assert_eq!(lines[1], "1,65,200000000,610000,3000000,1900000,1400000,");
        assert_eq!(lines[2], "2,,,,,,,Please enter the owner's date of birth.");
    }

    // =========================================================================
    // load_factor_table / build_estimator
    // =========================================================================

    #[test]
    fn load_factor_table_defaults_to_standard() {
        let table = load_factor_table(None).unwrap();

        assert_eq!(&table, AgeFactorTable::standard());
    }

    #[test]
    fn load_factor_table_missing_file_is_error() {
        let result = load_factor_table(Some(Path::new("no/such/factors.csv")));

        assert!(matches!(result, Err(AgeFactorLoaderError::Io { .. })));
    }

    #[test]
    fn build_estimator_rejects_invalid_config() {
        let table = AgeFactorTable::standard();
        let config = EstimatorConfig {
            appraised_ratio: dec!(1.5),
            ..Default::default()
        };

        assert!(matches!(
            build_estimator(table, config),
            Err(PayoutEstimatorError::InvalidValuationRatio { .. })
        ));
    }
}
