//! Age-banded payout factors.
//!
//! Rates are monthly payments per 100,000,000 of adjusted land value. Each
//! row covers one whole-year age; ages above the last row use the last row.
//! The table also carries an overflow row describing the product ceiling for
//! owners past the banded range. It is kept as reference data and reported
//! alongside the table, but the estimator never selects it.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pension_core::AgeFactorTable;
//!
//! let table = AgeFactorTable::standard();
//!
//! assert_eq!(table.bucket_for(92), Some(80));
//! assert_eq!(table.get(75).map(|f| f.life), Some(dec!(512000)));
//! assert_eq!(table.bucket_for(59), None);
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use thiserror::Error;

use super::{AgeFactors, PayoutKind};

/// `[life, term5, term10, term15]` for ages 60 through 80.
const STANDARD_ROWS: [(u32, [i64; 4]); 21] = [
    (60, [230_000, 1_600_000, 850_000, 600_000]),
    (61, [245_000, 1_630_000, 870_000, 620_000]),
    (62, [260_000, 1_660_000, 890_000, 640_000]),
    (63, [275_000, 1_690_000, 910_000, 660_000]),
    (64, [290_000, 1_720_000, 930_000, 680_000]),
    (65, [305_000, 1_750_000, 950_000, 700_000]),
    (66, [322_000, 1_780_000, 975_000, 720_000]),
    (67, [340_000, 1_810_000, 1_000_000, 740_000]),
    (68, [358_000, 1_840_000, 1_025_000, 760_000]),
    (69, [377_000, 1_870_000, 1_050_000, 780_000]),
    (70, [397_000, 1_900_000, 1_075_000, 800_000]),
    (71, [418_000, 1_930_000, 1_100_000, 820_000]),
    (72, [440_000, 1_960_000, 1_125_000, 840_000]),
    (73, [463_000, 1_990_000, 1_150_000, 860_000]),
    (74, [487_000, 2_020_000, 1_175_000, 880_000]),
    (75, [512_000, 2_050_000, 1_200_000, 900_000]),
    (76, [538_000, 2_080_000, 1_225_000, 920_000]),
    (77, [565_000, 2_110_000, 1_250_000, 940_000]),
    (78, [593_000, 2_140_000, 1_275_000, 960_000]),
    (79, [622_000, 2_170_000, 1_300_000, 980_000]),
    (80, [652_000, 2_200_000, 1_325_000, 1_000_000]),
];

const STANDARD_OVERFLOW: [i64; 4] = [750_000, 2_500_000, 1_500_000, 1_200_000];

static STANDARD: LazyLock<AgeFactorTable> = LazyLock::new(|| AgeFactorTable {
    rows: STANDARD_ROWS
        .iter()
        .map(|&(age, rates)| (age, AgeFactors::from_whole(rates)))
        .collect(),
    overflow: AgeFactors::from_whole(STANDARD_OVERFLOW),
});

/// Errors raised when building a table from caller-supplied rows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FactorTableError {
    #[error("factor table has no age rows")]
    Empty,

    #[error("age {0} appears more than once")]
    DuplicateAge(u32),

    #[error("ages must be contiguous: expected {expected}, found {found}")]
    NonContiguous { expected: u32, found: u32 },

    #[error("negative {kind} factor {value} for age {age}")]
    NegativeFactor {
        age: u32,
        kind: PayoutKind,
        value: Decimal,
    },

    #[error("negative {kind} factor {value} in overflow row")]
    NegativeOverflowFactor { kind: PayoutKind, value: Decimal },
}

/// A place where a factor decreases as age increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonotonicViolation {
    /// The older of the two ages compared.
    pub age: u32,
    pub kind: PayoutKind,
    pub previous: Decimal,
    pub current: Decimal,
}

/// Immutable mapping from age to [`AgeFactors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeFactorTable {
    rows: BTreeMap<u32, AgeFactors>,
    overflow: AgeFactors,
}

impl AgeFactorTable {
    /// The built-in simplified estimation table (ages 60 to 80).
    pub fn standard() -> &'static AgeFactorTable {
        &STANDARD
    }

    /// Builds a table from `(age, factors)` rows.
    ///
    /// Rows may arrive in any order. Ages must be unique and contiguous and
    /// every factor must be non-negative. Monotonicity is not enforced here;
    /// use [`AgeFactorTable::monotonic_violations`] to inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`FactorTableError`] when the rows are empty, repeat an age,
    /// leave a gap, or contain a negative factor.
    pub fn from_rows<I>(
        rows: I,
        overflow: AgeFactors,
    ) -> Result<Self, FactorTableError>
    where
        I: IntoIterator<Item = (u32, AgeFactors)>,
    {
        let mut map = BTreeMap::new();
        for (age, factors) in rows {
            if let Some(kind) = first_negative(&factors) {
                return Err(FactorTableError::NegativeFactor {
                    age,
                    kind,
                    value: factors.get(kind),
                });
            }
            if map.insert(age, factors).is_some() {
                return Err(FactorTableError::DuplicateAge(age));
            }
        }

        if let Some(kind) = first_negative(&overflow) {
            return Err(FactorTableError::NegativeOverflowFactor {
                kind,
                value: overflow.get(kind),
            });
        }

        let mut ages = map.keys().copied();
        let mut previous = ages.next().ok_or(FactorTableError::Empty)?;
        for age in ages {
            // Keys are sorted and unique, so `previous < age <= u32::MAX`.
            let expected = previous.checked_add(1).unwrap_or(previous);
            if age != expected {
                return Err(FactorTableError::NonContiguous {
                    expected,
                    found: age,
                });
            }
            previous = age;
        }

        Ok(Self {
            rows: map,
            overflow,
        })
    }

    /// Youngest age with its own row.
    pub fn min_age(&self) -> u32 {
        self.rows.keys().next().copied().unwrap_or_default()
    }

    /// Oldest age with its own row.
    pub fn max_age(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or_default()
    }

    /// Factors for exactly `age`, if the table has that row.
    pub fn get(
        &self,
        age: u32,
    ) -> Option<&AgeFactors> {
        self.rows.get(&age)
    }

    /// Overflow row for ages beyond the banded range.
    pub fn overflow(&self) -> &AgeFactors {
        &self.overflow
    }

    /// Resolves the age bucket used for `age`.
    ///
    /// Ages above the table clamp down to [`AgeFactorTable::max_age`]. Ages
    /// below [`AgeFactorTable::min_age`] have no bucket.
    pub fn bucket_for(
        &self,
        age: u32,
    ) -> Option<u32> {
        if age < self.min_age() {
            return None;
        }
        let bucket = age.min(self.max_age());
        if self.rows.contains_key(&bucket) {
            Some(bucket)
        } else {
            Some(self.max_age())
        }
    }

    /// Rows in ascending age order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &AgeFactors)> {
        self.rows.iter().map(|(age, factors)| (*age, factors))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every place a factor drops from one age to the next.
    ///
    /// An empty result means each column is non-decreasing with age.
    pub fn monotonic_violations(&self) -> Vec<MonotonicViolation> {
        let mut violations = Vec::new();
        let mut previous: Option<&AgeFactors> = None;

        for (age, factors) in self.iter() {
            if let Some(prev) = previous {
                for kind in PayoutKind::ALL {
                    if factors.get(kind) < prev.get(kind) {
                        violations.push(MonotonicViolation {
                            age,
                            kind,
                            previous: prev.get(kind),
                            current: factors.get(kind),
                        });
                    }
                }
            }
            previous = Some(factors);
        }

        violations
    }
}

fn first_negative(factors: &AgeFactors) -> Option<PayoutKind> {
    PayoutKind::ALL
        .into_iter()
        .find(|kind| factors.get(*kind).is_sign_negative())
}
