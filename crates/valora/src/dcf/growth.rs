//! Sanity bounds for the explicit-horizon growth assumption.

use serde::{Deserialize, Serialize};

/// Accepted range for a growth assumption, plus the value used outside it.
///
/// A growth rate `g` is accepted when `min < g <= max`. Anything else,
/// including a missing or non-finite value, is replaced by `default`.
/// This keeps a percentage that slipped through as `5.0` instead of `0.05`
/// from producing an absurd valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthBounds {
    /// Exclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
    /// Substitute for missing or out-of-range input
    pub default: f64,
}

impl Default for GrowthBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.30,
            default: 0.03,
        }
    }
}

impl GrowthBounds {
    /// Whether a growth rate falls inside the accepted range.
    pub fn contains(&self, growth: f64) -> bool {
        growth > self.min && growth <= self.max
    }

    /// The growth rate to project with.
    pub fn sanitize(&self, growth: Option<f64>) -> f64 {
        match growth {
            Some(g) if self.contains(g) => g,
            Some(g) => {
                tracing::debug!(
                    growth = g,
                    fallback = self.default,
                    "growth outside sanity bounds, using default"
                );
                self.default
            }
            None => self.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.05), 0.05)]
    #[case(Some(0.30), 0.30)]
    #[case(Some(0.0001), 0.0001)]
    #[case(Some(0.0), 0.03)]
    #[case(Some(-0.02), 0.03)]
    #[case(Some(0.31), 0.03)]
    #[case(Some(5.0), 0.03)]
    #[case(Some(f64::NAN), 0.03)]
    #[case(None, 0.03)]
    fn test_sanitize(#[case] input: Option<f64>, #[case] expected: f64) {
        assert_eq!(GrowthBounds::default().sanitize(input), expected);
    }

    #[test]
    fn test_custom_bounds() {
        let bounds = GrowthBounds {
            min: -0.05,
            max: 0.10,
            default: 0.01,
        };
        assert_eq!(bounds.sanitize(Some(-0.02)), -0.02);
        assert_eq!(bounds.sanitize(Some(0.12)), 0.01);
        assert!(!bounds.contains(-0.05));
    }
}
