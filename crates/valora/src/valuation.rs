//! End-to-end valuation of company records.
//!
//! [`Valuator`] chains the WACC calculator, the DCF engine and the price
//! comparison for one record at a time. Every failure is local to the record:
//! it is stored as a [`SkipReason`] and the next record is valued as usual.

use crate::{
    Result, ValuationError,
    classify::{PriceComparison, Verdict, compare_to_price},
    dcf::{Dcf, DcfConfig, DcfInputs, DcfValuation, DiscountRate},
    record::CompanyRecord,
    traits::{ConfigurableModel, Model},
    wacc::{Wacc, WaccBreakdown, WaccConfig, WaccInputs},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Configuration for the full valuation chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// WACC calculator settings
    pub wacc: WaccConfig,
    /// DCF engine settings
    pub dcf: DcfConfig,
}

/// Why a company has no intrinsic value.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// A required field is absent or unusable
    #[display("insufficient data: {_0}")]
    InsufficientData(String),
    /// Total capital is zero, so there is no discount rate
    #[display("WACC unavailable")]
    WaccUnavailable,
    /// The DCF parameters would give a meaningless value
    #[display("invalid model parameters: {_0}")]
    InvalidModelParameters(String),
}

impl From<ValuationError> for SkipReason {
    fn from(err: ValuationError) -> Self {
        match err {
            ValuationError::MissingData(field) | ValuationError::MissingColumn(field) => {
                Self::InsufficientData(field)
            }
            ValuationError::UndefinedWacc => Self::WaccUnavailable,
            ValuationError::InvalidModelParameters(detail) => Self::InvalidModelParameters(detail),
            ValuationError::Polars(e) => Self::InsufficientData(e.to_string()),
        }
    }
}

/// Valuation of one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyValuation {
    /// Ticker symbol
    pub ticker: String,
    /// Company name
    pub name: Option<String>,
    /// Discount-rate breakdown, when computable
    pub wacc: Option<WaccBreakdown>,
    /// DCF projection, when computable
    pub dcf: Option<DcfValuation>,
    /// Intrinsic value against price, when computable
    pub comparison: Option<PriceComparison>,
    /// Set when the chain stopped before a comparison
    pub skipped: Option<SkipReason>,
}

impl CompanyValuation {
    fn empty(record: &CompanyRecord) -> Self {
        Self {
            ticker: record.ticker.clone(),
            name: record.name.clone(),
            wacc: None,
            dcf: None,
            comparison: None,
            skipped: None,
        }
    }

    /// The classification, if the company was valued.
    pub fn verdict(&self) -> Option<Verdict> {
        self.comparison.map(|c| c.verdict)
    }

    /// Intrinsic value per share at full precision.
    pub fn intrinsic_value(&self) -> Option<f64> {
        self.comparison.map(|c| c.intrinsic_value)
    }

    /// The rounded WACC, if computable.
    pub fn wacc_rate(&self) -> Option<f64> {
        self.wacc.map(|w| w.rate)
    }

    /// Whether the chain ran through to a price comparison.
    pub const fn is_valued(&self) -> bool {
        self.comparison.is_some()
    }
}

/// Counts over a batch of valuations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationSummary {
    /// Companies seen
    pub total: usize,
    /// Companies classified as undervalued
    pub undervalued: usize,
    /// Companies classified as overvalued
    pub overvalued: usize,
    /// Companies without a valuation
    pub skipped: usize,
}

impl ValuationSummary {
    /// Tally a batch.
    pub fn from_valuations(valuations: &[CompanyValuation]) -> Self {
        valuations
            .iter()
            .fold(Self::default(), |mut summary, valuation| {
                summary.total += 1;
                match valuation.verdict() {
                    Some(Verdict::Undervalued) => summary.undervalued += 1,
                    Some(Verdict::Overvalued) => summary.overvalued += 1,
                    None => summary.skipped += 1,
                }
                summary
            })
    }
}

/// Runs WACC, DCF and price comparison for company records.
#[derive(Debug, Clone, Default)]
pub struct Valuator {
    wacc: Wacc,
    dcf: Dcf,
}

impl Valuator {
    /// Create a valuator from configuration.
    pub fn new(config: ValuationConfig) -> Self {
        Self {
            wacc: Wacc::with_config(config.wacc),
            dcf: Dcf::with_config(config.dcf),
        }
    }

    /// The WACC calculator in use.
    pub const fn wacc(&self) -> &Wacc {
        &self.wacc
    }

    /// The DCF engine in use.
    pub const fn dcf(&self) -> &Dcf {
        &self.dcf
    }

    /// Value one company. Never fails; see [`CompanyValuation::skipped`].
    pub fn value(&self, record: &CompanyRecord) -> CompanyValuation {
        let span = tracing::debug_span!("value", ticker = %record.ticker);
        let _enter = span.enter();

        let mut valuation = CompanyValuation::empty(record);
        if let Err(err) = self.run(record, &mut valuation) {
            tracing::debug!(%err, "company skipped");
            valuation.skipped = Some(err.into());
        }
        valuation
    }

    /// Value every record, in order.
    pub fn value_all(&self, records: &[CompanyRecord]) -> Vec<CompanyValuation> {
        let valuations: Vec<_> = records.iter().map(|r| self.value(r)).collect();
        let summary = ValuationSummary::from_valuations(&valuations);
        tracing::info!(
            total = summary.total,
            undervalued = summary.undervalued,
            overvalued = summary.overvalued,
            skipped = summary.skipped,
            "valuation batch complete"
        );
        valuations
    }

    fn run(&self, record: &CompanyRecord, out: &mut CompanyValuation) -> Result<()> {
        let wacc = WaccInputs::from_record(record).and_then(|inputs| self.wacc.evaluate(&inputs));
        out.wacc = wacc.as_ref().ok().copied();

        let discount_rate = match self.dcf.config().discount_rate {
            DiscountRate::Fixed(rate) => rate,
            DiscountRate::Wacc => wacc?.rate,
        };

        let price = record.price.ok_or_else(|| ValuationError::missing("price"))?;
        let free_cash_flow = record
            .free_cash_flow
            .ok_or_else(|| ValuationError::missing("free cash flow"))?;
        let shares = record.shares_outstanding().ok_or_else(|| {
            ValuationError::missing("share count needs positive market cap and price")
        })?;

        let inputs = DcfInputs::from_config(
            free_cash_flow / shares,
            record.growth_rate,
            discount_rate,
            self.dcf.config(),
        );
        let dcf = self.dcf.evaluate(&inputs)?;

        out.comparison = Some(compare_to_price(dcf.intrinsic_value, price)?);
        out.dcf = Some(dcf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::Country, wacc::RiskTier};
    use approx::assert_relative_eq;

    /// Debt-free Swedish company, 20 000 shares at 50, FCF 4 per share.
    fn swedish() -> CompanyRecord {
        CompanyRecord {
            name: Some("Exempel AB".to_string()),
            market_cap: Some(1_000_000.0),
            total_debt: Some(0.0),
            cash: Some(0.0),
            beta: Some(1.0),
            free_cash_flow: Some(80_000.0),
            price: Some(50.0),
            country: Some(Country::Sweden),
            ..CompanyRecord::new("EXMP")
        }
    }

    #[test]
    fn test_full_chain() {
        let valuation = Valuator::default().value(&swedish());

        assert!(valuation.is_valued());
        assert!(valuation.skipped.is_none());
        assert_eq!(valuation.wacc_rate(), Some(0.08));
        assert_eq!(valuation.wacc.unwrap().risk_tier, RiskTier::Moderate);

        let expected = crate::dcf::intrinsic_value(4.0, 0.03, 0.08, 0.02, 5).unwrap();
        assert_relative_eq!(valuation.intrinsic_value().unwrap(), expected, epsilon = 1e-9);

        // 4 / 10 * 177.596... = 71.04 > 50
        assert_eq!(valuation.verdict(), Some(Verdict::Undervalued));
        let comparison = valuation.comparison.unwrap();
        assert_relative_eq!(comparison.price, 50.0);
        assert_relative_eq!(
            comparison.deviation_pct,
            (expected - 50.0) / 50.0 * 100.0,
            epsilon = 1e-9
        );
        assert_eq!(valuation.dcf.unwrap().years.len(), 5);
    }

    #[test]
    fn test_growth_override_is_used_when_in_range() {
        let record = CompanyRecord {
            growth_rate: Some(0.10),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert_relative_eq!(valuation.dcf.unwrap().inputs.growth_rate, 0.10);
    }

    #[test]
    fn test_growth_override_out_of_range_falls_back() {
        let record = CompanyRecord {
            growth_rate: Some(10.0),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert!(valuation.is_valued());
        assert_relative_eq!(valuation.dcf.unwrap().inputs.growth_rate, 0.03);
    }

    #[test]
    fn test_negative_fcf_is_valued_as_overvalued() {
        let record = CompanyRecord {
            free_cash_flow: Some(-80_000.0),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert!(valuation.intrinsic_value().unwrap() < 0.0);
        assert_eq!(valuation.verdict(), Some(Verdict::Overvalued));
    }

    #[test]
    fn test_zero_capital_skips_dcf() {
        let record = CompanyRecord {
            market_cap: Some(0.0),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert!(valuation.wacc.is_none());
        assert!(valuation.dcf.is_none());
        assert_eq!(valuation.skipped, Some(SkipReason::WaccUnavailable));
    }

    #[test]
    fn test_missing_fields_are_insufficient_data() {
        for record in [
            CompanyRecord {
                free_cash_flow: None,
                ..swedish()
            },
            CompanyRecord {
                price: None,
                ..swedish()
            },
            CompanyRecord {
                beta: None,
                ..swedish()
            },
        ] {
            let valuation = Valuator::default().value(&record);
            assert!(!valuation.is_valued());
            assert!(matches!(
                valuation.skipped,
                Some(SkipReason::InsufficientData(_))
            ));
        }
    }

    #[test]
    fn test_non_positive_price_keeps_wacc() {
        let record = CompanyRecord {
            price: Some(0.0),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert_eq!(valuation.wacc_rate(), Some(0.08));
        assert!(matches!(
            valuation.skipped,
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn test_non_finite_beta_is_insufficient_data() {
        let record = CompanyRecord {
            beta: Some(f64::NAN),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert!(valuation.wacc.is_none());
        assert!(!valuation.is_valued());
        assert!(matches!(
            valuation.skipped,
            Some(SkipReason::InsufficientData(_))
        ));
    }

    #[test]
    fn test_low_wacc_below_terminal_growth_is_invalid() {
        // Beta pushes cost of equity to 2.5% - 0.1 * 5.5% = 1.95% < 2%.
        let record = CompanyRecord {
            beta: Some(-0.1),
            ..swedish()
        };
        let valuation = Valuator::default().value(&record);
        assert!(valuation.wacc.is_some());
        assert!(matches!(
            valuation.skipped,
            Some(SkipReason::InvalidModelParameters(_))
        ));
    }

    #[test]
    fn test_fixed_discount_rate_ignores_wacc() {
        let config = ValuationConfig {
            dcf: DcfConfig {
                discount_rate: DiscountRate::Fixed(0.10),
                ..DcfConfig::default()
            },
            ..ValuationConfig::default()
        };
        let record = CompanyRecord {
            beta: None,
            ..swedish()
        };
        let valuation = Valuator::new(config).value(&record);

        assert!(valuation.wacc.is_none());
        assert_relative_eq!(valuation.dcf.as_ref().unwrap().inputs.discount_rate, 0.10);
        assert!(valuation.is_valued());
    }

    #[test]
    fn test_value_all_and_summary() {
        let records = vec![
            swedish(),
            CompanyRecord {
                free_cash_flow: Some(1_000.0),
                ..swedish()
            },
            CompanyRecord::new("EMPTY"),
        ];
        let valuations = Valuator::default().value_all(&records);
        assert_eq!(valuations.len(), 3);
        assert_eq!(valuations[2].ticker, "EMPTY");

        let summary = ValuationSummary::from_valuations(&valuations);
        assert_eq!(
            summary,
            ValuationSummary {
                total: 3,
                undervalued: 1,
                overvalued: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn test_skip_reason_from_error() {
        assert_eq!(
            SkipReason::from(ValuationError::UndefinedWacc),
            SkipReason::WaccUnavailable
        );
        assert_eq!(
            SkipReason::from(ValuationError::missing("price")).to_string(),
            "insufficient data: price"
        );
    }

    #[test]
    fn test_record_is_not_mutated() {
        let record = swedish();
        let before = record.clone();
        let _ = Valuator::default().value(&record);
        assert_eq!(record, before);
    }
}
