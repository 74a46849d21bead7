//! Company fundamentals as supplied by a data adapter.
//!
//! All rates on a [`CompanyRecord`] are decimal fractions. Adapters that read
//! percentages convert them before constructing the record.

use crate::registry::Country;
use serde::{Deserialize, Serialize};

/// Fundamentals for one listed company.
///
/// Every numeric field is optional. `None` means "not reported" and is never
/// conflated with a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Ticker symbol
    pub ticker: String,
    /// Company name
    pub name: Option<String>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Gross interest-bearing debt
    pub total_debt: Option<f64>,
    /// Debt-to-equity ratio as a fraction (0.5 means debt is half of equity)
    pub debt_to_equity: Option<f64>,
    /// Cash and equivalents
    pub cash: Option<f64>,
    /// Equity beta
    pub beta: Option<f64>,
    /// Trailing free cash flow for the whole company
    pub free_cash_flow: Option<f64>,
    /// Traded price per share
    pub price: Option<f64>,
    /// Country of listing
    pub country: Option<Country>,
    /// Explicit growth assumption for the projection horizon
    pub growth_rate: Option<f64>,
    /// Annual interest expense
    pub interest_expense: Option<f64>,
    /// Effective tax rate overriding the country default
    pub tax_rate: Option<f64>,
}

impl CompanyRecord {
    /// Create an empty record for a ticker.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Shares outstanding implied by market cap and price.
    ///
    /// `None` unless both are present and strictly positive.
    pub fn shares_outstanding(&self) -> Option<f64> {
        match (self.market_cap, self.price) {
            (Some(market_cap), Some(price)) if market_cap > 0.0 && price > 0.0 => {
                Some(market_cap / price)
            }
            _ => None,
        }
    }

    /// Free cash flow per share.
    ///
    /// Negative cash flow is passed through unchanged.
    pub fn fcf_per_share(&self) -> Option<f64> {
        Some(self.free_cash_flow? / self.shares_outstanding()?)
    }

    /// Country of listing, defaulting to [`Country::Unknown`].
    pub fn country_or_unknown(&self) -> Country {
        self.country.unwrap_or(Country::Unknown)
    }

    /// Display label: the name when known, otherwise the ticker.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ticker)
    }
}
