//! Two-stage discounted cash flow on a per-share basis.
//!
//! Free cash flow per share grows at a constant rate over an explicit
//! horizon, then at a terminal rate forever (Gordon growth). Both stages are
//! discounted at a single rate.

pub mod growth;

pub use growth::GrowthBounds;

use crate::{
    Result, ValuationError,
    traits::{ConfigurableModel, Model},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Longest explicit horizon accepted, in years.
pub const MAX_HORIZON_YEARS: u32 = 200;

/// Source of the rate used to discount projected cash flows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountRate {
    /// The company's WACC. An undefined WACC skips the DCF.
    #[default]
    Wacc,
    /// A constant rate applied to every company.
    Fixed(f64),
}

/// Configuration for the DCF engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcfConfig {
    /// Bounds and default for the explicit-horizon growth rate.
    pub growth: GrowthBounds,
    /// Perpetual growth after the horizon.
    pub terminal_growth: f64,
    /// Number of explicitly projected years.
    pub horizon_years: u32,
    /// Where the discount rate comes from.
    pub discount_rate: DiscountRate,
}

impl Default for DcfConfig {
    fn default() -> Self {
        Self {
            growth: GrowthBounds::default(),
            terminal_growth: 0.02,
            horizon_years: 5,
            discount_rate: DiscountRate::Wacc,
        }
    }
}

/// Inputs for one DCF evaluation. All rates are decimal fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfInputs {
    /// Current free cash flow per share; any sign
    pub fcf_per_share: f64,
    /// Growth over the explicit horizon
    pub growth_rate: f64,
    /// Rate used to discount every cash flow
    pub discount_rate: f64,
    /// Perpetual growth after the horizon; must be below `discount_rate`
    pub terminal_growth_rate: f64,
    /// Years in the explicit horizon
    pub horizon_years: u32,
}

impl DcfInputs {
    /// Assemble inputs from configuration.
    ///
    /// `growth` is sanitized against the configured bounds.
    pub fn from_config(
        fcf_per_share: f64,
        growth: Option<f64>,
        discount_rate: f64,
        config: &DcfConfig,
    ) -> Self {
        Self {
            fcf_per_share,
            growth_rate: config.growth.sanitize(growth),
            discount_rate,
            terminal_growth_rate: config.terminal_growth,
            horizon_years: config.horizon_years,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.horizon_years == 0 {
            return Err(ValuationError::InvalidModelParameters(
                "projection horizon must be at least one year".to_string(),
            ));
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ValuationError::InvalidModelParameters(format!(
                "projection horizon of {} years exceeds {MAX_HORIZON_YEARS}",
                self.horizon_years
            )));
        }
        // NaN on either side compares as None and is rejected.
        if self.discount_rate.partial_cmp(&self.terminal_growth_rate) != Some(Ordering::Greater) {
            return Err(ValuationError::InvalidModelParameters(format!(
                "discount rate {} must exceed terminal growth {}",
                self.discount_rate, self.terminal_growth_rate
            )));
        }
        if self.discount_rate <= -1.0 {
            return Err(ValuationError::InvalidModelParameters(format!(
                "discount rate {} must be above -100%",
                self.discount_rate
            )));
        }
        Ok(())
    }
}

/// One explicitly projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedYear {
    /// Year offset, starting at 1
    pub year: u32,
    /// Projected free cash flow per share
    pub cash_flow: f64,
    /// (1 + r)^year
    pub discount_factor: f64,
    /// cash_flow / discount_factor
    pub present_value: f64,
}

/// Result of a DCF evaluation, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfValuation {
    /// Inputs the valuation was computed from
    pub inputs: DcfInputs,
    /// Explicit horizon, year by year
    pub years: Vec<ProjectedYear>,
    /// Value at the end of the horizon of all later cash flows
    pub terminal_value: f64,
    /// Terminal value discounted to today
    pub discounted_terminal_value: f64,
    /// Sum of discounted cash flows plus discounted terminal value
    pub intrinsic_value: f64,
}

impl DcfValuation {
    /// Present value of the explicit horizon alone.
    pub fn explicit_value(&self) -> f64 {
        self.years.iter().map(|y| y.present_value).sum()
    }

    /// Share of intrinsic value that comes from the terminal value.
    ///
    /// `None` when intrinsic value is zero.
    pub fn terminal_share(&self) -> Option<f64> {
        let share = self.discounted_terminal_value / self.intrinsic_value;
        share.is_finite().then_some(share)
    }
}

/// DCF engine.
///
/// ```text
/// CF_t  = fcf * (1 + g)^t                      t = 1..N
/// PV_t  = CF_t / (1 + r)^t
/// TV    = CF_N * (1 + g_t) / (r - g_t)
/// value = sum(PV_t) + TV / (1 + r)^N
/// ```
///
/// Rejects `r <= g_t`, where the perpetuity diverges or flips sign.
///
/// `evaluate` works on the inputs alone. The configuration is applied when
/// inputs are built with [`DcfInputs::from_config`], which sanitizes growth
/// and fills in terminal growth and horizon.
#[derive(Debug, Clone, Default)]
pub struct Dcf {
    config: DcfConfig,
}

impl Model for Dcf {
    type Input = DcfInputs;
    type Output = DcfValuation;

    fn name(&self) -> &str {
        "dcf"
    }

    fn description(&self) -> &str {
        "Discounted cash flow - explicit growth horizon plus Gordon growth terminal value, per share"
    }

    fn evaluate(&self, input: &DcfInputs) -> Result<DcfValuation> {
        input.validate()?;

        let growth = 1.0 + input.growth_rate;
        let discount = 1.0 + input.discount_rate;

        let years: Vec<ProjectedYear> = (1..=input.horizon_years)
            .map(|year| {
                // Bounded by MAX_HORIZON_YEARS in validate.
                let t = year as i32;
                let cash_flow = input.fcf_per_share * growth.powi(t);
                let discount_factor = discount.powi(t);
                ProjectedYear {
                    year,
                    cash_flow,
                    discount_factor,
                    present_value: cash_flow / discount_factor,
                }
            })
            .collect();

        let last = years.last().copied().ok_or_else(|| {
            ValuationError::InvalidModelParameters("empty projection horizon".to_string())
        })?;
        let terminal_value = last.cash_flow * (1.0 + input.terminal_growth_rate)
            / (input.discount_rate - input.terminal_growth_rate);
        let discounted_terminal_value = terminal_value / last.discount_factor;

        let explicit: f64 = years.iter().map(|y| y.present_value).sum();

        Ok(DcfValuation {
            inputs: *input,
            years,
            terminal_value,
            discounted_terminal_value,
            intrinsic_value: explicit + discounted_terminal_value,
        })
    }
}

impl ConfigurableModel for Dcf {
    type Config = DcfConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

/// Intrinsic value per share.
///
/// # Errors
///
/// [`ValuationError::InvalidModelParameters`] when `discount_rate` does not
/// exceed `terminal_growth_rate`, when `horizon_years` is zero or above
/// [`MAX_HORIZON_YEARS`], or when the discount rate is at or below -100%.
pub fn intrinsic_value(
    fcf_per_share: f64,
    growth_rate: f64,
    discount_rate: f64,
    terminal_growth_rate: f64,
    horizon_years: u32,
) -> Result<f64> {
    let inputs = DcfInputs {
        fcf_per_share,
        growth_rate,
        discount_rate,
        terminal_growth_rate,
        horizon_years,
    };
    Dcf::default()
        .evaluate(&inputs)
        .map(|valuation| valuation.intrinsic_value)
}
