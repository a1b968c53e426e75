use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four payout schedules offered for a farmland pension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayoutKind {
    Lifetime,
    Term5,
    Term10,
    Term15,
}

impl PayoutKind {
    /// Every kind, in display order.
    pub const ALL: [PayoutKind; 4] = [
        PayoutKind::Lifetime,
        PayoutKind::Term5,
        PayoutKind::Term10,
        PayoutKind::Term15,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lifetime => "life",
            Self::Term5 => "term5",
            Self::Term10 => "term10",
            Self::Term15 => "term15",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Lifetime => "Lifetime",
            Self::Term5 => "5-year term",
            Self::Term10 => "10-year term",
            Self::Term15 => "15-year term",
        }
    }
}

impl fmt::Display for PayoutKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monthly payout rates for one age bucket.
///
/// Each rate is the monthly payment (in whole currency units) owed per
/// 100,000,000 of adjusted land value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeFactors {
    pub life: Decimal,
    pub term5: Decimal,
    pub term10: Decimal,
    pub term15: Decimal,
}

impl AgeFactors {
    /// Builds a factor row from whole-number rates ordered
    /// `[life, term5, term10, term15]`.
    pub fn from_whole(rates: [i64; 4]) -> Self {
        let [life, term5, term10, term15] = rates.map(Decimal::from);
        Self {
            life,
            term5,
            term10,
            term15,
        }
    }

    /// Returns the rate for a single payout kind.
    pub fn get(
        &self,
        kind: PayoutKind,
    ) -> Decimal {
        match kind {
            PayoutKind::Lifetime => self.life,
            PayoutKind::Term5 => self.term5,
            PayoutKind::Term10 => self.term10,
            PayoutKind::Term15 => self.term15,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn from_whole_maps_rates_in_order() {
        let factors = AgeFactors::from_whole([305_000, 1_750_000, 950_000, 700_000]);

        assert_eq!(factors.get(PayoutKind::Lifetime), dec!(305000));
        assert_eq!(factors.get(PayoutKind::Term5), dec!(1750000));
        assert_eq!(factors.get(PayoutKind::Term10), dec!(950000));
        assert_eq!(factors.get(PayoutKind::Term15), dec!(700000));
    }

    #[test]
    fn payout_kind_strings_are_stable() {
        let codes: Vec<_> = PayoutKind::ALL.iter().map(|k| k.as_str()).collect();

        assert_eq!(codes, vec!["life", "term5", "term10", "term15"]);
        assert_eq!(PayoutKind::Term10.to_string(), "term10");
    }
}
