//! Integration tests for loading age factor tables and estimating with them.

use std::path::Path;

use pension_core::{
    AgeFactorTable, EstimationInput, EstimatorConfig, PayoutEstimator, PayoutKind,
    ValuationMethod,
};
use pension_data::{AgeFactorLoader, AgeFactorLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const STANDARD_CSV: &str = include_str!("../test-data/age_factors_standard.csv");

fn fixture_path() -> &'static Path {
    Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/test-data/age_factors_standard.csv"
    ))
}

#[test]
fn test_standard_csv_matches_builtin_table() {
    let table = AgeFactorLoader::load(STANDARD_CSV.as_bytes()).expect("Failed to load table");

    assert_eq!(&table, AgeFactorTable::standard());
}

#[test]
fn test_load_from_path_reads_fixture() {
    let table = AgeFactorLoader::load_from_path(fixture_path()).expect("Failed to load fixture");

    assert_eq!(table.len(), 21);
    assert_eq!(table.min_age(), 60);
    assert_eq!(table.max_age(), 80);
    assert!(table.monotonic_violations().is_empty());
}

#[test]
fn test_loaded_table_drives_estimator() {
    let table = AgeFactorLoader::load(STANDARD_CSV.as_bytes()).expect("Failed to load table");
    let estimator =
        PayoutEstimator::new(&table, EstimatorConfig::default()).expect("default config is valid");

    let result = estimator
        .estimate(&EstimationInput {
            owner_age: 65,
            land_value: 200_000_000,
            valuation_method: ValuationMethod::Public,
            has_survivor_election: false,
        })
        .expect("Failed to estimate");

    assert_eq!(result.amount(PayoutKind::Lifetime), dec!(610000));
    assert_eq!(result.amount(PayoutKind::Term5), dec!(3000000));
    assert_eq!(result.amount(PayoutKind::Term10), dec!(1900000));
    assert_eq!(result.amount(PayoutKind::Term15), dec!(1400000));
}

#[test]
fn test_truncated_table_clamps_to_last_row() {
    let csv: String = STANDARD_CSV
        .lines()
        .filter(|line| {
            line.split(',')
                .next()
                .and_then(|age| age.parse::<u32>().ok())
                .is_none_or(|age| age <= 70)
        })
        .map(|line| format!("{line}\n"))
        .collect();
    let table = AgeFactorLoader::load(csv.as_bytes()).expect("Failed to load table");
    let estimator =
        PayoutEstimator::new(&table, EstimatorConfig::default()).expect("default config is valid");

    let result = estimator
        .estimate(&EstimationInput {
            owner_age: 78,
            land_value: 100_000_000,
            valuation_method: ValuationMethod::Public,
            has_survivor_election: false,
        })
        .expect("Failed to estimate");

    assert_eq!(result.factor_age, 70);
    assert_eq!(result.lifetime_amount, dec!(397000));
}

#[test]
fn test_missing_overflow_row_in_fixture_copy() {
    let csv: String = STANDARD_CSV
        .lines()
        .filter(|line| !line.starts_with("max"))
        .map(|line| format!("{line}\n"))
        .collect();

    let result = AgeFactorLoader::load(csv.as_bytes());

    assert!(matches!(
        result,
        Err(AgeFactorLoaderError::MissingOverflowRow)
    ));
}
