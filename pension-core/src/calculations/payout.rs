//! Monthly payout estimation for the farmland pension.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Age bucket: owner age, clamped down to the table's oldest row |
//! | 2    | Factor lookup for that bucket |
//! | 3    | Adjusted value: land value × valuation ratio, truncated |
//! | 4    | Land units: adjusted value ÷ 100,000,000 |
//! | 5    | Raw payout per kind: factor × land units, truncated |
//! | 6    | Cap each payout at the maximum monthly payout (3,000,000) |
//! | 7    | Survivor election: lifetime payout × 85%, truncated |
//!
//! The survivor reduction runs after the cap, so a capped lifetime payout
//! still drops below the cap when the option is elected. Term payouts never
//! change with the survivor election.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pension_core::{EstimationInput, PayoutEstimator, ValuationMethod};
//!
//! let estimator = PayoutEstimator::standard();
//! let input = EstimationInput {
//!     owner_age: 65,
//!     land_value: 200_000_000,
//!     valuation_method: ValuationMethod::Public,
//!     has_survivor_election: false,
//! };
//!
//! let result = estimator.estimate(&input).unwrap();
//!
//! assert_eq!(result.lifetime_amount, dec!(610000));
//! assert_eq!(result.term5_amount, dec!(3000000));
//! assert_eq!(result.term10_amount, dec!(1900000));
//! assert_eq!(result.term15_amount, dec!(1400000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{cap, floor_whole};
use crate::{AgeFactorTable, EstimationInput, EstimationResult, PayoutKind, ValuationMethod};

/// Errors that can occur while configuring or running the estimator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutEstimatorError {
    /// The owner is younger than the youngest age in the factor table.
    #[error("age {age} is below the minimum factor table age {minimum}")]
    BelowMinimumAge { age: u32, minimum: u32 },

    /// A payout could not be represented.
    #[error("{kind} payout overflowed for adjusted land value {adjusted_land_value}")]
    AmountOverflow {
        kind: PayoutKind,
        adjusted_land_value: Decimal,
    },

    /// The maximum monthly payout must be a non-negative whole amount.
    #[error("maximum payout must be a non-negative whole amount, got {0}")]
    InvalidMaxPayout(Decimal),

    /// The survivor retention factor must be in (0, 1].
    #[error("survivor retention must be greater than 0 and at most 1, got {0}")]
    InvalidSurvivorRetention(Decimal),

    /// A valuation ratio must be in (0, 1].
    #[error("{method} valuation ratio must be greater than 0 and at most 1, got {value}")]
    InvalidValuationRatio {
        method: ValuationMethod,
        value: Decimal,
    },

    /// The land value unit must be positive.
    #[error("unit land value must be positive, got {0}")]
    InvalidUnitLandValue(Decimal),
}

/// Tunable constants for the estimate.
///
/// The defaults are simplified estimation values rather than actuarial
/// figures, so every one of them can be overridden.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::{EstimatorConfig, ValuationMethod};
///
/// let config = EstimatorConfig::default();
///
/// assert_eq!(config.max_payout, dec!(3000000));
/// assert_eq!(config.ratio_for(ValuationMethod::Appraised), dec!(0.9));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Ceiling applied to every monthly payout (step 6). Must be a whole
    /// amount.
    pub max_payout: Decimal,

    /// Share of the lifetime payout kept when the survivor option is
    /// elected (step 7). `0.85` is a 15% reduction.
    pub survivor_retention: Decimal,

    /// Ratio applied to publicly assessed land values (step 3).
    pub public_ratio: Decimal,

    /// Ratio applied to appraised land values (step 3).
    pub appraised_ratio: Decimal,

    /// Land value that one table factor is quoted against (step 4).
    pub unit_land_value: Decimal,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_payout: Decimal::from(3_000_000),
            survivor_retention: Decimal::new(85, 2),
            public_ratio: Decimal::ONE,
            appraised_ratio: Decimal::new(9, 1),
            unit_land_value: Decimal::from(100_000_000),
        }
    }
}

impl EstimatorConfig {
    /// Ratio applied to the declared land value for `method`.
    pub fn ratio_for(
        &self,
        method: ValuationMethod,
    ) -> Decimal {
        match method {
            ValuationMethod::Public => self.public_ratio,
            ValuationMethod::Appraised => self.appraised_ratio,
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutEstimatorError`] if:
    /// - `max_payout` is negative or has a fractional part
    /// - `survivor_retention` is not in (0, 1]
    /// - either valuation ratio is not in (0, 1]
    /// - `unit_land_value` is not positive
    pub fn validate(&self) -> Result<(), PayoutEstimatorError> {
        if self.max_payout < Decimal::ZERO || !self.max_payout.fract().is_zero() {
            return Err(PayoutEstimatorError::InvalidMaxPayout(self.max_payout));
        }

        if !is_unit_fraction(self.survivor_retention) {
            return Err(PayoutEstimatorError::InvalidSurvivorRetention(
                self.survivor_retention,
            ));
        }

        for method in [ValuationMethod::Public, ValuationMethod::Appraised] {
            let value = self.ratio_for(method);
            if !is_unit_fraction(value) {
                return Err(PayoutEstimatorError::InvalidValuationRatio { method, value });
            }
        }

        if self.unit_land_value <= Decimal::ZERO {
            return Err(PayoutEstimatorError::InvalidUnitLandValue(
                self.unit_land_value,
            ));
        }

        Ok(())
    }
}

fn is_unit_fraction(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= Decimal::ONE
}

/// Calculator for farmland pension payouts.
///
/// Holds a borrowed factor table and a validated configuration. Estimating is
/// pure: the same input always produces the same result.
#[derive(Debug, Clone)]
pub struct PayoutEstimator<'a> {
    table: &'a AgeFactorTable,
    config: EstimatorConfig,
}

impl PayoutEstimator<'static> {
    /// Estimator over the built-in table with default constants.
    pub fn standard() -> Self {
        Self {
            table: AgeFactorTable::standard(),
            config: EstimatorConfig::default(),
        }
    }
}

impl<'a> PayoutEstimator<'a> {
    /// Creates an estimator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`EstimatorConfig::validate`] finds.
    pub fn new(
        table: &'a AgeFactorTable,
        config: EstimatorConfig,
    ) -> Result<Self, PayoutEstimatorError> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn table(&self) -> &AgeFactorTable {
        self.table
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Calculates the four candidate monthly payouts.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutEstimatorError::BelowMinimumAge`] when the owner is
    /// younger than the table's first row. Callers are expected to reject
    /// such owners before estimating; the estimator never aliases them to the
    /// youngest row.
    pub fn estimate(
        &self,
        input: &EstimationInput,
    ) -> Result<EstimationResult, PayoutEstimatorError> {
        let factor_age = self.factor_bucket(input.owner_age)?;
        let factors = self
            .table
            .get(factor_age)
            .ok_or(PayoutEstimatorError::BelowMinimumAge {
                age: input.owner_age,
                minimum: self.table.min_age(),
            })?;

        let adjusted_land_value =
            self.adjusted_land_value(input.land_value, input.valuation_method);
        let units = self.land_units(adjusted_land_value);

        let mut amounts = [Decimal::ZERO; 4];
        for (slot, kind) in amounts.iter_mut().zip(PayoutKind::ALL) {
            let raw = self.scaled_amount(factors.get(kind), units).ok_or(
                PayoutEstimatorError::AmountOverflow {
                    kind,
                    adjusted_land_value,
                },
            )?;
            *slot = cap(raw, self.config.max_payout);
        }
        let [lifetime, term5, term10, term15] = amounts;

        let lifetime_amount = self.survivor_adjusted(lifetime, input.has_survivor_election);

        debug!(
            owner_age = input.owner_age,
            factor_age,
            %adjusted_land_value,
            survivor = input.has_survivor_election,
            "estimated payouts"
        );

        Ok(EstimationResult {
            factor_age,
            adjusted_land_value,
            lifetime_amount,
            term5_amount: term5,
            term10_amount: term10,
            term15_amount: term15,
        })
    }

    /// Applies the valuation ratio to a declared land value.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pension_core::{PayoutEstimator, ValuationMethod};
    ///
    /// let estimator = PayoutEstimator::standard();
    ///
    /// assert_eq!(
    ///     estimator.adjusted_land_value(500_000_000, ValuationMethod::Appraised),
    ///     dec!(450000000)
    /// );
    /// ```
    pub fn adjusted_land_value(
        &self,
        land_value: u64,
        method: ValuationMethod,
    ) -> Decimal {
        floor_whole(Decimal::from(land_value) * self.config.ratio_for(method))
    }

    /// Resolves the table row used for `owner_age`.
    fn factor_bucket(
        &self,
        owner_age: u32,
    ) -> Result<u32, PayoutEstimatorError> {
        self.table
            .bucket_for(owner_age)
            .ok_or(PayoutEstimatorError::BelowMinimumAge {
                age: owner_age,
                minimum: self.table.min_age(),
            })
    }

    /// Expresses an adjusted land value in table units.
    fn land_units(
        &self,
        adjusted_land_value: Decimal,
    ) -> Decimal {
        adjusted_land_value / self.config.unit_land_value
    }

    /// Scales a factor by the land units, truncated to a whole amount.
    fn scaled_amount(
        &self,
        factor: Decimal,
        units: Decimal,
    ) -> Option<Decimal> {
        factor.checked_mul(units).map(floor_whole)
    }

    /// Applies the survivor reduction to an already capped lifetime payout.
    fn survivor_adjusted(
        &self,
        lifetime_amount: Decimal,
        has_survivor_election: bool,
    ) -> Decimal {
        if has_survivor_election {
            floor_whole(lifetime_amount * self.config.survivor_retention)
        } else {
            lifetime_amount
        }
    }
}
