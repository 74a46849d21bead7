//! Per-country market assumptions.
//!
//! The registry maps a [`Country`] to the risk-free rate, equity market
//! premium and default corporate tax rate used by the WACC calculator.
//! Countries without an entry resolve to the Nordic default.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Jurisdiction that selects a set of [`MarketAssumptions`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Country {
    /// Sweden
    Sweden,
    /// Norway
    Norway,
    /// Finland
    Finland,
    /// Denmark
    Denmark,
    /// United States
    #[display("USA")]
    Usa,
    /// Any country without its own entry
    Unknown,
}

impl Country {
    /// Every country with a dedicated entry in the default registry.
    pub const KNOWN: [Self; 5] = [
        Self::Sweden,
        Self::Norway,
        Self::Finland,
        Self::Denmark,
        Self::Usa,
    ];

    /// Parse a country name or ISO code, case-insensitively.
    ///
    /// Never fails: unrecognised input maps to [`Country::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sweden" | "se" | "swe" | "sverige" => Self::Sweden,
            "norway" | "no" | "nor" | "norge" => Self::Norway,
            "finland" | "fi" | "fin" | "suomi" => Self::Finland,
            "denmark" | "dk" | "dnk" | "danmark" => Self::Denmark,
            "usa" | "us" | "united states" | "united states of america" => Self::Usa,
            _ => Self::Unknown,
        }
    }
}

impl From<&str> for Country {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Country {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.to_string()
    }
}

/// Market-level inputs for one jurisdiction, all as decimal fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketAssumptions {
    /// Yield on long government bonds
    pub risk_free_rate: f64,
    /// Expected equity return above the risk-free rate
    pub market_premium: f64,
    /// Statutory corporate tax rate
    pub tax_rate: f64,
}

impl MarketAssumptions {
    /// Nordic default used for countries without their own entry.
    pub const NORDIC_DEFAULT: Self = Self::new(0.030, 0.055, 0.21);

    /// Create a new set of assumptions.
    pub const fn new(risk_free_rate: f64, market_premium: f64, tax_rate: f64) -> Self {
        Self {
            risk_free_rate,
            market_premium,
            tax_rate,
        }
    }
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self::NORDIC_DEFAULT
    }
}

/// Registry of market assumptions keyed by country.
#[derive(Debug, Clone)]
pub struct MarketRegistry {
    markets: HashMap<Country, MarketAssumptions>,
    fallback: MarketAssumptions,
}

impl MarketRegistry {
    /// Create a registry with no country entries.
    ///
    /// Every lookup resolves to [`MarketAssumptions::NORDIC_DEFAULT`].
    pub fn new() -> Self {
        Self {
            markets: HashMap::new(),
            fallback: MarketAssumptions::NORDIC_DEFAULT,
        }
    }

    /// Register the standard country table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Norway, Finland and Denmark use the Nordic premium.
        registry.register(Country::Sweden, MarketAssumptions::new(0.025, 0.055, 0.20));
        registry.register(Country::Norway, MarketAssumptions::new(0.030, 0.055, 0.22));
        registry.register(Country::Finland, MarketAssumptions::new(0.027, 0.055, 0.20));
        registry.register(Country::Denmark, MarketAssumptions::new(0.024, 0.055, 0.22));
        registry.register(Country::Usa, MarketAssumptions::new(0.045, 0.050, 0.21));

        registry
    }

    /// Register or replace the assumptions for a country.
    ///
    /// Registering [`Country::Unknown`] replaces the fallback entry.
    pub fn register(&mut self, country: Country, assumptions: MarketAssumptions) {
        if country == Country::Unknown {
            self.fallback = assumptions;
        } else {
            self.markets.insert(country, assumptions);
        }
    }

    /// Assumptions for a country, or the fallback when it has no entry.
    pub fn get(&self, country: Country) -> MarketAssumptions {
        self.markets.get(&country).copied().unwrap_or(self.fallback)
    }

    /// The entry used for countries without their own assumptions.
    pub const fn fallback(&self) -> MarketAssumptions {
        self.fallback
    }

    /// All country entries, sorted by country name, followed by the fallback.
    pub fn entries(&self) -> Vec<(Country, MarketAssumptions)> {
        let mut entries: Vec<_> = self.markets.iter().map(|(c, m)| (*c, *m)).collect();
        entries.sort_by_key(|(country, _)| country.to_string());
        entries.push((Country::Unknown, self.fallback));
        entries
    }

    /// Number of countries with their own entry.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no country has its own entry.
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Sweden", Country::Sweden)]
    #[case("sverige", Country::Sweden)]
    #[case(" SE ", Country::Sweden)]
    #[case("Norway", Country::Norway)]
    #[case("FI", Country::Finland)]
    #[case("Danmark", Country::Denmark)]
    #[case("United States", Country::Usa)]
    #[case("usa", Country::Usa)]
    #[case("Germany", Country::Unknown)]
    #[case("", Country::Unknown)]
    fn test_country_parse(#[case] raw: &str, #[case] expected: Country) {
        assert_eq!(Country::parse(raw), expected);
    }

    #[test]
    fn test_default_table() {
        let registry = MarketRegistry::with_defaults();
        assert_eq!(registry.len(), Country::KNOWN.len());

        let sweden = registry.get(Country::Sweden);
        assert_relative_eq!(sweden.risk_free_rate, 0.025);
        assert_relative_eq!(sweden.market_premium, 0.055);
        assert_relative_eq!(sweden.tax_rate, 0.20);

        let usa = registry.get(Country::Usa);
        assert_relative_eq!(usa.risk_free_rate, 0.045);
        assert_relative_eq!(usa.market_premium, 0.050);
        assert_relative_eq!(usa.tax_rate, 0.21);

        assert_relative_eq!(registry.get(Country::Norway).tax_rate, 0.22);
        assert_relative_eq!(registry.get(Country::Finland).risk_free_rate, 0.027);
        assert_relative_eq!(registry.get(Country::Denmark).risk_free_rate, 0.024);
    }

    #[test]
    fn test_unknown_country_uses_nordic_default() {
        let registry = MarketRegistry::with_defaults();
        assert_eq!(
            registry.get(Country::Unknown),
            MarketAssumptions::NORDIC_DEFAULT
        );
        assert_eq!(
            MarketRegistry::new().get(Country::Sweden),
            MarketAssumptions::NORDIC_DEFAULT
        );
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = MarketRegistry::with_defaults();
        let custom = MarketAssumptions::new(0.04, 0.06, 0.25);

        registry.register(Country::Sweden, custom);
        registry.register(Country::Unknown, custom);

        assert_eq!(registry.get(Country::Sweden), custom);
        assert_eq!(registry.fallback(), custom);
        assert_eq!(registry.len(), Country::KNOWN.len());
    }

    #[test]
    fn test_entries_sorted_with_fallback_last() {
        let entries = MarketRegistry::with_defaults().entries();
        let names: Vec<_> = entries.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(
            names,
            ["Denmark", "Finland", "Norway", "Sweden", "USA", "Unknown"]
        );
    }

    #[test]
    fn test_country_string_conversion_uses_display_names() {
        for country in Country::KNOWN {
            let name = String::from(country);
            assert_eq!(Country::from(name), country);
        }
        assert_eq!(String::from(Country::Usa), "USA");
    }
}
