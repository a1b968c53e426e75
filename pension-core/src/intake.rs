//! Eligibility gate that runs before any estimate.
//!
//! Raw answers from a front end are collected in an [`EstimationRequest`] and
//! checked by [`validate`]. Only a request that passes every check becomes an
//! [`EstimationInput`]; a rejected request never reaches the estimator.
//!
//! Ages are calendar-year differences (`today.year() - birth.year()`), not
//! exact elapsed time, so an owner born in December counts as a year older on
//! the first of January.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pension_core::ValuationMethod;
//! use pension_core::intake::{EstimationRequest, IntakeError, validate};
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
//! let request = EstimationRequest {
//!     owner_birth_date: NaiveDate::from_ymd_opt(1961, 11, 30),
//!     land_value: Some(200_000_000),
//!     valuation_method: ValuationMethod::Public,
//!     has_survivor_election: false,
//!     spouse_birth_date: None,
//! };
//!
//! let validated = validate(&request, today).unwrap();
//! assert_eq!(validated.input.owner_age, 65);
//!
//! let too_young = EstimationRequest {
//!     owner_birth_date: NaiveDate::from_ymd_opt(1970, 1, 1),
//!     ..request
//! };
//! assert_eq!(
//!     validate(&too_young, today),
//!     Err(IntakeError::BelowEligibleAge { age: 56, minimum: 60 })
//! );
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{EstimationInput, ValuationMethod};

/// Youngest age at which an owner may enrol.
pub const MINIMUM_ENROLLMENT_AGE: u32 = 60;

/// Reasons a request is turned away before estimating.
///
/// The messages are written for the person filling in the form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please enter the owner's date of birth.")]
    MissingBirthDate,

    #[error("Please enter the land value.")]
    MissingLandValue,

    #[error("Please enter the spouse's date of birth to elect the survivor option.")]
    MissingSpouseBirthDate,

    #[error("Enrolment is available from age {minimum}; the owner is {age}.")]
    BelowEligibleAge { age: i32, minimum: u32 },
}

/// Unvalidated answers collected by a front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationRequest {
    pub owner_birth_date: Option<NaiveDate>,
    /// Declared land value in whole currency units.
    pub land_value: Option<u64>,
    pub valuation_method: ValuationMethod,
    pub has_survivor_election: bool,
    /// Only required when `has_survivor_election` is set.
    pub spouse_birth_date: Option<NaiveDate>,
}

/// A request that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub input: EstimationInput,
    /// Spouse age for display. It never changes the payout factors.
    pub spouse_age: Option<i32>,
}

/// Whole-year age as a calendar-year difference.
pub fn calendar_age(
    birth_date: NaiveDate,
    today: NaiveDate,
) -> i32 {
    today.year() - birth_date.year()
}

/// Checks a request and converts it into estimator input.
///
/// Checks run in a fixed order and the first failure is returned:
/// birth date, land value (absent or zero), spouse birth date (when the
/// survivor option is elected), then minimum age.
///
/// # Errors
///
/// Returns the [`IntakeError`] for the first failed check.
pub fn validate(
    request: &EstimationRequest,
    today: NaiveDate,
) -> Result<ValidatedRequest, IntakeError> {
    let birth_date = request
        .owner_birth_date
        .ok_or(IntakeError::MissingBirthDate)?;

    let land_value = match request.land_value {
        Some(value) if value > 0 => value,
        _ => return Err(IntakeError::MissingLandValue),
    };

    let spouse_birth_date = if request.has_survivor_election {
        Some(
            request
                .spouse_birth_date
                .ok_or(IntakeError::MissingSpouseBirthDate)?,
        )
    } else {
        None
    };

    let age = calendar_age(birth_date, today);
    let owner_age = u32::try_from(age)
        .ok()
        .filter(|age| *age >= MINIMUM_ENROLLMENT_AGE)
        .ok_or(IntakeError::BelowEligibleAge {
            age,
            minimum: MINIMUM_ENROLLMENT_AGE,
        })?;

    let spouse_age = spouse_birth_date.map(|date| calendar_age(date, today));
    debug!(owner_age, ?spouse_age, "request passed intake");

    Ok(ValidatedRequest {
        input: EstimationInput {
            owner_age,
            land_value,
            valuation_method: request.valuation_method,
            has_survivor_election: request.has_survivor_election,
        },
        spouse_age,
    })
}
