//! Qualitative buckets for a cost of capital.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the low tier.
pub const LOW_THRESHOLD: f64 = 0.07;

/// Upper bound (exclusive) of the moderate tier.
pub const HIGH_THRESHOLD: f64 = 0.10;

/// Risk tier implied by a WACC.
///
/// Thresholds are fixed: below 7% is low, from 7% up to 10% is moderate,
/// and 10% or more is high.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// WACC below 7%
    #[display("low cost of capital")]
    Low,
    /// WACC in [7%, 10%)
    #[display("moderate")]
    Moderate,
    /// WACC of 10% or more
    #[display("high")]
    High,
}

impl RiskTier {
    /// Bucket a WACC expressed as a fraction.
    pub fn from_wacc(wacc: f64) -> Self {
        if wacc < LOW_THRESHOLD {
            Self::Low
        } else if wacc < HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RiskTier::Low)]
    #[case(0.0699, RiskTier::Low)]
    #[case(0.07, RiskTier::Moderate)]
    #[case(0.0999, RiskTier::Moderate)]
    #[case(0.10, RiskTier::High)]
    #[case(0.25, RiskTier::High)]
    #[case(-0.01, RiskTier::Low)]
    fn test_tier_boundaries(#[case] wacc: f64, #[case] expected: RiskTier) {
        assert_eq!(RiskTier::from_wacc(wacc), expected);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(RiskTier::Low.to_string(), "low cost of capital");
        assert_eq!(RiskTier::Moderate.to_string(), "moderate");
        assert_eq!(RiskTier::High.to_string(), "high");
    }
}
