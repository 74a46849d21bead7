//! Comparison of intrinsic value with the traded price.

use crate::{Result, ValuationError};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Whether the market prices a company below or above its intrinsic value.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Intrinsic value strictly above price
    #[display("undervalued")]
    Undervalued,
    /// Intrinsic value at or below price
    #[display("overvalued")]
    Overvalued,
}

impl Verdict {
    /// Classify a deviation in percent. Zero counts as overvalued.
    pub fn from_deviation(deviation_pct: f64) -> Self {
        if deviation_pct > 0.0 {
            Self::Undervalued
        } else {
            Self::Overvalued
        }
    }
}

/// Intrinsic value paired with the price it was compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    /// Model value per share, full precision
    pub intrinsic_value: f64,
    /// Traded price per share
    pub price: f64,
    /// (intrinsic_value - price) / price * 100
    pub deviation_pct: f64,
    /// Classification of `deviation_pct`
    pub verdict: Verdict,
}

/// Compare an intrinsic value with a traded price.
///
/// # Errors
///
/// [`ValuationError::MissingData`] when the price is not strictly positive.
pub fn compare_to_price(intrinsic_value: f64, price: f64) -> Result<PriceComparison> {
    if price.is_nan() || price <= 0.0 {
        return Err(ValuationError::missing("price must be positive"));
    }
    let deviation_pct = (intrinsic_value - price) / price * 100.0;
    Ok(PriceComparison {
        intrinsic_value,
        price,
        deviation_pct,
        verdict: Verdict::from_deviation(deviation_pct),
    })
}
