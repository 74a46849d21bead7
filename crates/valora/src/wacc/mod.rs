//! Weighted average cost of capital.
//!
//! Blends a CAPM cost of equity with an after-tax cost of debt, weighted by
//! market value of equity and net debt.

pub mod risk_tier;

pub use risk_tier::RiskTier;

use crate::{
    Result, ValuationError,
    record::CompanyRecord,
    registry::{Country, MarketRegistry},
    round::round_to,
    traits::{ConfigurableModel, Model},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Capital-structure and risk inputs for one company.
///
/// Debt is always an absolute amount here. Records that only carry a
/// debt-to-equity ratio are resolved in [`WaccInputs::from_record`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaccInputs {
    /// Market value of equity
    pub market_cap: f64,
    /// Gross interest-bearing debt
    pub total_debt: f64,
    /// Cash netted against debt
    pub cash: f64,
    /// Equity beta, never clamped
    pub beta: f64,
    /// Selects risk-free rate, premium and default tax rate
    pub country: Country,
    /// Reported interest expense, used for an effective cost of debt
    pub interest_expense: Option<f64>,
    /// Tax rate overriding the country default
    pub tax_rate: Option<f64>,
}

impl WaccInputs {
    /// Debt-free inputs for a company.
    pub const fn new(market_cap: f64, beta: f64, country: Country) -> Self {
        Self {
            market_cap,
            total_debt: 0.0,
            cash: 0.0,
            beta,
            country,
            interest_expense: None,
            tax_rate: None,
        }
    }

    /// Set gross debt and the cash that offsets it.
    pub const fn with_debt(mut self, total_debt: f64, cash: f64) -> Self {
        self.total_debt = total_debt;
        self.cash = cash;
        self
    }

    /// Set reported interest expense.
    pub const fn with_interest_expense(mut self, interest_expense: f64) -> Self {
        self.interest_expense = Some(interest_expense);
        self
    }

    /// Override the country's default tax rate.
    pub const fn with_tax_rate(mut self, tax_rate: f64) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }

    /// Build inputs from a company record.
    ///
    /// Reported total debt (offset by cash) wins over a debt-to-equity ratio.
    /// A ratio is applied to market cap with no cash offset. With neither,
    /// the company is treated as debt-free.
    ///
    /// # Errors
    ///
    /// [`ValuationError::MissingData`] when market cap or beta is absent, or
    /// when market cap, beta, total debt or cash is not a finite number.
    pub fn from_record(record: &CompanyRecord) -> Result<Self> {
        let market_cap = finite(record.market_cap, "market cap")?
            .ok_or_else(|| ValuationError::missing("market cap"))?;
        let beta = finite(record.beta, "beta")?.ok_or_else(|| ValuationError::missing("beta"))?;
        let reported_debt = finite(record.total_debt, "total debt")?;
        let cash = finite(record.cash, "cash")?;

        let (total_debt, cash) = match (reported_debt, record.debt_to_equity) {
            (Some(total_debt), _) => (total_debt, cash.unwrap_or(0.0)),
            (None, Some(ratio)) if ratio > 0.0 => (market_cap * ratio, 0.0),
            _ => (0.0, 0.0),
        };

        Ok(Self {
            market_cap,
            total_debt,
            cash,
            beta,
            country: record.country_or_unknown(),
            interest_expense: record.interest_expense,
            tax_rate: record.tax_rate,
        })
    }

    /// Debt net of cash, floored at zero.
    pub fn net_debt(&self) -> f64 {
        (self.total_debt - self.cash).max(0.0)
    }
}

/// A present but non-finite value counts as missing data.
fn finite(value: Option<f64>, field: &str) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(ValuationError::missing(format!("{field} is {v}"))),
        other => Ok(other),
    }
}

/// Where the pre-tax cost of debt came from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostOfDebtSource {
    /// Interest expense divided by total debt
    #[display("reported interest")]
    ReportedInterest,
    /// Risk-free rate plus the configured credit spread
    #[display("credit spread")]
    CreditSpread,
}

/// Configuration for the WACC calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaccConfig {
    /// Spread over the risk-free rate when no interest expense is reported.
    pub credit_spread: f64,
    /// Decimal places of the reported rate.
    pub decimals: u32,
    /// Country table. Not read from config files; overrides are registered
    /// explicitly.
    #[serde(skip)]
    pub markets: MarketRegistry,
}

impl Default for WaccConfig {
    fn default() -> Self {
        Self {
            credit_spread: 0.015,
            decimals: 4,
            markets: MarketRegistry::with_defaults(),
        }
    }
}

/// How a WACC was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccBreakdown {
    /// CAPM cost of equity
    pub cost_of_equity: f64,
    /// Pre-tax cost of debt
    pub cost_of_debt: f64,
    /// Source of the cost of debt
    pub cost_of_debt_source: CostOfDebtSource,
    /// Tax rate applied to the cost of debt
    pub tax_rate: f64,
    /// Debt net of cash
    pub net_debt: f64,
    /// E / V
    pub equity_weight: f64,
    /// D / V
    pub debt_weight: f64,
    /// Blended rate, rounded to the configured decimals
    pub rate: f64,
    /// Qualitative bucket of `rate`
    pub risk_tier: RiskTier,
}

impl WaccBreakdown {
    /// Cost of debt after the tax shield.
    pub fn after_tax_cost_of_debt(&self) -> f64 {
        self.cost_of_debt * (1.0 - self.tax_rate)
    }
}

/// WACC calculator.
///
/// ```text
/// re   = rf + beta * premium
/// rd   = interest_expense / total_debt   (when reported and debt > 0)
///      = rf + credit_spread              (otherwise)
/// D    = max(total_debt - cash, 0)
/// V    = E + D
/// WACC = E/V * re + D/V * rd * (1 - tax)
/// ```
///
/// Inputs are accepted as-is. `V == 0` and a non-finite result are refused.
#[derive(Debug, Clone, Default)]
pub struct Wacc {
    config: WaccConfig,
}

impl Model for Wacc {
    type Input = WaccInputs;
    type Output = WaccBreakdown;

    fn name(&self) -> &str {
        "wacc"
    }

    fn description(&self) -> &str {
        "Weighted average cost of capital - CAPM equity cost blended with after-tax debt cost"
    }

    fn evaluate(&self, input: &WaccInputs) -> Result<WaccBreakdown> {
        let market = self.config.markets.get(input.country);

        let cost_of_equity = market.risk_free_rate + input.beta * market.market_premium;

        let (cost_of_debt, cost_of_debt_source) = match input.interest_expense {
            Some(interest) if input.total_debt > 0.0 => {
                (interest / input.total_debt, CostOfDebtSource::ReportedInterest)
            }
            _ => (
                market.risk_free_rate + self.config.credit_spread,
                CostOfDebtSource::CreditSpread,
            ),
        };

        let tax_rate = input.tax_rate.unwrap_or(market.tax_rate);

        let equity = input.market_cap;
        let net_debt = input.net_debt();
        let capital = equity + net_debt;
        if capital == 0.0 {
            tracing::debug!(country = %input.country, "total capital is zero, WACC undefined");
            return Err(ValuationError::UndefinedWacc);
        }

        let equity_weight = equity / capital;
        let debt_weight = net_debt / capital;
        let raw = equity_weight * cost_of_equity + debt_weight * cost_of_debt * (1.0 - tax_rate);
        if !raw.is_finite() {
            tracing::debug!(country = %input.country, raw, "WACC is not a finite number");
            return Err(ValuationError::UndefinedWacc);
        }
        let rate = round_to(raw, self.config.decimals);

        Ok(WaccBreakdown {
            cost_of_equity,
            cost_of_debt,
            cost_of_debt_source,
            tax_rate,
            net_debt,
            equity_weight,
            debt_weight,
            rate,
            risk_tier: RiskTier::from_wacc(rate),
        })
    }
}

impl ConfigurableModel for Wacc {
    type Config = WaccConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

/// WACC with the default country table.
///
/// Returns `None` when total capital is zero or an input is not finite.
pub fn compute_wacc(inputs: &WaccInputs) -> Option<f64> {
    Wacc::default()
        .evaluate(inputs)
        .ok()
        .map(|breakdown| breakdown.rate)
}
