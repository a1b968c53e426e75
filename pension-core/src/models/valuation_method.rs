use std::fmt;

use serde::{Deserialize, Serialize};

/// How the declared land value was obtained.
///
/// The method decides which ratio is applied to the declared value before
/// payouts are scaled (see [`crate::EstimatorConfig::ratio_for`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationMethod {
    /// Publicly assessed (officially posted) land price.
    #[default]
    Public,
    /// Private appraisal.
    Appraised,
}

impl ValuationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Appraised => "appraised",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Public => "Publicly assessed",
            Self::Appraised => "Appraised",
        }
    }

    /// Parses a method code. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "appraised" => Some(Self::Appraised),
            _ => None,
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
