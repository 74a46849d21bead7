//! TOML configuration for the CLI.
//!
//! Every section is optional:
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [valuation.wacc]
//! credit_spread = 0.02
//!
//! [valuation.dcf]
//! terminal_growth = 0.025
//! horizon_years = 10
//! discount_rate = { fixed = 0.09 }
//!
//! [schema]
//! growth_unit = "fraction"
//!
//! [[markets]]
//! country = "Sweden"
//! risk_free_rate = 0.028
//! market_premium = 0.055
//! tax_rate = 0.206
//! ```

use crate::logging::LogFormat;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use valora::{Country, FrameSchema, MarketAssumptions, ValuationConfig};

/// Logging section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct LogConfig {
    pub(crate) level: String,
    pub(crate) format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Replacement market assumptions for one country.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MarketOverride {
    pub(crate) country: Country,
    pub(crate) risk_free_rate: f64,
    pub(crate) market_premium: f64,
    pub(crate) tax_rate: f64,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) log: LogConfig,
    pub(crate) valuation: ValuationConfig,
    pub(crate) schema: FrameSchema,
    pub(crate) markets: Vec<MarketOverride>,
}

impl AppConfig {
    /// Load from a file, or defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents)?;
        config.apply_market_overrides();
        Ok(config)
    }

    /// Register `[[markets]]` entries in the WACC country table.
    fn apply_market_overrides(&mut self) {
        for entry in &self.markets {
            self.valuation.wacc.markets.register(
                entry.country,
                MarketAssumptions::new(entry.risk_free_rate, entry.market_premium, entry.tax_rate),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use valora::{DiscountRate, RateUnit};

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.valuation.dcf.horizon_years, 5);
        assert_eq!(config.valuation.dcf.discount_rate, DiscountRate::Wacc);
        assert_eq!(config.schema, FrameSchema::default());
        assert!(config.markets.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::parse(
            r#"
            [log]
            level = "debug"
            format = "json"

            [valuation.wacc]
            credit_spread = 0.02

            [valuation.dcf]
            terminal_growth = 0.025
            horizon_years = 10
            discount_rate = { fixed = 0.09 }

            [valuation.dcf.growth]
            max = 0.2

            [schema]
            ticker = "Symbol"
            growth_unit = "fraction"

            [[markets]]
            country = "SE"
            risk_free_rate = 0.028
            market_premium = 0.06
            tax_rate = 0.206
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_relative_eq!(config.valuation.wacc.credit_spread, 0.02);
        assert_eq!(config.valuation.wacc.decimals, 4);
        assert_relative_eq!(config.valuation.dcf.terminal_growth, 0.025);
        assert_eq!(config.valuation.dcf.horizon_years, 10);
        assert_eq!(config.valuation.dcf.discount_rate, DiscountRate::Fixed(0.09));
        assert_relative_eq!(config.valuation.dcf.growth.max, 0.2);
        assert_relative_eq!(config.valuation.dcf.growth.default, 0.03);
        assert_eq!(config.schema.ticker, "Symbol");
        assert_eq!(config.schema.market_cap, "MarketCap");
        assert_eq!(config.schema.growth_unit, RateUnit::Fraction);

        let sweden = config.valuation.wacc.markets.get(Country::Sweden);
        assert_relative_eq!(sweden.risk_free_rate, 0.028);
        assert_relative_eq!(sweden.tax_rate, 0.206);
        // Untouched entries keep their defaults.
        assert_relative_eq!(
            config.valuation.wacc.markets.get(Country::Usa).risk_free_rate,
            0.045
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[log]\nlevel = \"warn\"").unwrap();
        file.flush().unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_load_errors_carry_path() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/valora.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/valora.toml"));

        assert!(AppConfig::parse("[log]\nlevel = 3").is_err());
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.valuation.wacc.markets.len(), Country::KNOWN.len());
    }
}
