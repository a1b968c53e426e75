mod age_factor_table;
mod age_factors;
mod estimation;
mod valuation_method;

pub use age_factor_table::{AgeFactorTable, FactorTableError, MonotonicViolation};
pub use age_factors::{AgeFactors, PayoutKind};
pub use estimation::{EstimationInput, EstimationResult};
pub use valuation_method::ValuationMethod;
