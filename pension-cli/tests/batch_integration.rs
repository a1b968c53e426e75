//! Integration tests that run the applicant fixture through the whole batch
//! path: CSV on disk, intake gate, estimator and CSV output.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pension_cli::app::{self, AppError};
use pension_cli::csv_loader;
use pension_core::ValuationMethod;
use pension_core::intake::IntakeError;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("applicants.csv")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[test]
fn test_load_fixture_file_succeeds() {
    let requests =
        csv_loader::load_from_file(&fixture_path()).expect("fixture file should load without error");

    // The fixture has exactly 6 rows.
    assert_eq!(requests.len(), 6);
    assert_eq!(requests[1].valuation_method, ValuationMethod::Appraised);
    assert!(requests[1].has_survivor_election);
    assert_eq!(requests[4].land_value, None);
}

#[test]
fn test_batch_outcomes_per_row() {
    let table = app::load_factor_table(None).unwrap();
    let estimator = app::build_estimator(&table, Default::default()).unwrap();
    let requests = csv_loader::load_from_file(&fixture_path()).unwrap();

    let rows = app::estimate_batch(&estimator, &requests, today());

    // Row 1: the age-65 scenario.
    let first = rows[0].outcome.as_ref().unwrap();
    assert_eq!(first.owner_age, 65);
    assert_eq!(first.result.lifetime_amount, dec!(610000));
    assert_eq!(first.result.term5_amount, dec!(3000000));

    // Row 2: age 70, appraised 500M -> 450M, survivor after the cap.
    let second = rows[1].outcome.as_ref().unwrap();
    assert_eq!(second.owner_age, 70);
    assert_eq!(second.spouse_age, Some(67));
    assert_eq!(second.result.adjusted_land_value, dec!(450000000));
    assert_eq!(second.result.lifetime_amount, dec!(1518525));
    assert_eq!(second.result.term5_amount, dec!(3000000));
    assert_eq!(second.result.term15_amount, dec!(3000000));

    // Row 3: too young.
    assert_eq!(
        rows[2].outcome,
        Err(AppError::Intake(IntakeError::BelowEligibleAge {
            age: 55,
            minimum: 60
        }))
    );

    // Row 4: age 77 uses its own row; every amount is capped.
    let fourth = rows[3].outcome.as_ref().unwrap();
    assert_eq!(fourth.result.factor_age, 77);
    assert_eq!(fourth.result.lifetime_amount, dec!(3000000));

    // Rows 5 and 6: missing answers.
    assert_eq!(
        rows[4].outcome,
        Err(AppError::Intake(IntakeError::MissingLandValue))
    );
    assert_eq!(
        rows[5].outcome,
        Err(AppError::Intake(IntakeError::MissingSpouseBirthDate))
    );
}

#[test]
fn test_batch_csv_output_for_fixture() {
    let estimator = pension_core::PayoutEstimator::standard();
    let requests = csv_loader::load_from_file(&fixture_path()).unwrap();
    let rows = app::estimate_batch(&estimator, &requests, today());

    let mut out = Vec::new();
    app::write_batch_csv(&mut out, &rows).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1], "1,65,200000000,610000,3000000,1900000,1400000,");
    assert!(lines[3].starts_with("3,,,,,,,Enrolment is available from age 60"));
}
