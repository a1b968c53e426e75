use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayoutKind, ValuationMethod};

/// Validated inputs for a single payout estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationInput {
    /// Owner age in whole calendar years.
    pub owner_age: u32,
    /// Declared land value in whole currency units.
    pub land_value: u64,
    pub valuation_method: ValuationMethod,
    /// Whether the spouse-succession (survivor) option was elected.
    pub has_survivor_election: bool,
}

/// The four candidate monthly payouts for one estimate.
///
/// Every amount is a whole number no greater than the configured payout cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Age bucket whose factors were applied.
    pub factor_age: u32,
    /// Declared land value after the valuation ratio was applied.
    pub adjusted_land_value: Decimal,
    pub lifetime_amount: Decimal,
    pub term5_amount: Decimal,
    pub term10_amount: Decimal,
    pub term15_amount: Decimal,
}

impl EstimationResult {
    pub fn amount(
        &self,
        kind: PayoutKind,
    ) -> Decimal {
        match kind {
            PayoutKind::Lifetime => self.lifetime_amount,
            PayoutKind::Term5 => self.term5_amount,
            PayoutKind::Term10 => self.term10_amount,
            PayoutKind::Term15 => self.term15_amount,
        }
    }

    /// All four amounts paired with their kind, in display order.
    pub fn amounts(&self) -> [(PayoutKind, Decimal); 4] {
        PayoutKind::ALL.map(|kind| (kind, self.amount(kind)))
    }
}
