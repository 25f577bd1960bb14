//! Currency registry.
//!
//! The registry is built once and never mutated afterwards, so it can be read
//! from any number of threads without locking.

use std::collections::HashSet;
use std::sync::Arc;

use monetra_shared::CurrencyCode;
use monetra_shared::config::RoundingMode;
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::error::CurrencyError;

/// Largest scale `Decimal` can represent.
const MAX_DECIMALS: u32 = 28;

static GLOBAL: Lazy<Arc<CurrencyRegistry>> = Lazy::new(|| Arc::new(CurrencyRegistry::standard()));

/// Static configuration for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConfig {
    /// Registry key.
    pub code: CurrencyCode,
    /// Display glyph, used for fiat formatting and stripped when parsing.
    pub symbol: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Fractional digits of the smallest unit. Drives all rounding.
    pub decimals: u32,
    /// Crypto (code-suffixed, crypto fee band) vs fiat (symbol-prefixed).
    pub is_crypto: bool,
    /// Inclusive lower bound.
    pub min_amount: Decimal,
    /// Inclusive upper bound.
    pub max_amount: Decimal,
}

impl CurrencyConfig {
    fn fiat(code: CurrencyCode, symbol: &'static str, name: &'static str) -> Self {
        Self {
            code,
            symbol,
            name,
            decimals: 2,
            is_crypto: false,
            min_amount: Decimal::from_parts(1, 0, 0, false, 2),
            max_amount: Decimal::from_parts(1_000_000, 0, 0, false, 0),
        }
    }

    fn crypto(
        code: CurrencyCode,
        symbol: &'static str,
        name: &'static str,
        decimals: u32,
        max_amount: u32,
    ) -> Self {
        Self {
            code,
            symbol,
            name,
            decimals,
            is_crypto: true,
            // One unit of the smallest denomination.
            min_amount: Decimal::from_parts(1, 0, 0, false, decimals),
            max_amount: Decimal::from_parts(max_amount, 0, 0, false, 0),
        }
    }
}

/// Authoritative mapping from currency code to configuration.
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    configs: Vec<CurrencyConfig>,
    rounding: RoundingStrategy,
}

impl CurrencyRegistry {
    /// Builds a registry after checking every config.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Configuration` if a code is duplicated, a
    /// minimum is negative or above its maximum, or `decimals` exceeds the
    /// scale `Decimal` supports.
    pub fn new(
        configs: Vec<CurrencyConfig>,
        rounding: RoundingStrategy,
    ) -> Result<Self, CurrencyError> {
        let mut seen = HashSet::new();
        for config in &configs {
            if !seen.insert(config.code) {
                return Err(CurrencyError::Configuration(format!(
                    "duplicate currency {}",
                    config.code
                )));
            }
            if config.min_amount.is_sign_negative() && !config.min_amount.is_zero() {
                return Err(CurrencyError::Configuration(format!(
                    "{} minimum {} is negative",
                    config.code, config.min_amount
                )));
            }
            if config.min_amount > config.max_amount {
                return Err(CurrencyError::Configuration(format!(
                    "{} minimum {} exceeds maximum {}",
                    config.code, config.min_amount, config.max_amount
                )));
            }
            if config.decimals > MAX_DECIMALS {
                return Err(CurrencyError::Configuration(format!(
                    "{} has {} decimals, at most {MAX_DECIMALS} are supported",
                    config.code, config.decimals
                )));
            }
        }
        Ok(Self { configs, rounding })
    }

    /// The built-in currency table with half-away-from-zero rounding.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            configs: standard_configs(),
            rounding: RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// The process-wide read-only registry.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL.as_ref()
    }

    /// Shared handle to the process-wide registry.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Returns a copy of this registry using another rounding strategy.
    #[must_use]
    pub fn with_rounding(mut self, rounding: RoundingStrategy) -> Self {
        self.rounding = rounding;
        self
    }

    /// Rounding strategy applied when rounding to currency precision.
    #[must_use]
    pub const fn rounding(&self) -> RoundingStrategy {
        self.rounding
    }

    /// Looks up the configuration for a code. Matching is case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::UnsupportedCurrency` if the code is not registered.
    pub fn get_config(&self, code: &str) -> Result<&CurrencyConfig, CurrencyError> {
        self.configs
            .iter()
            .find(|config| config.code.as_str() == code)
            .ok_or_else(|| CurrencyError::unsupported(code))
    }

    /// Returns true iff `code` is a registered key.
    #[must_use]
    pub fn is_valid_currency(&self, code: &str) -> bool {
        self.get_config(code).is_ok()
    }

    /// All configs, in declaration order.
    #[must_use]
    pub fn list_all(&self) -> &[CurrencyConfig] {
        &self.configs
    }

    /// Fiat configs, in declaration order.
    #[must_use]
    pub fn list_fiat(&self) -> Vec<&CurrencyConfig> {
        self.configs.iter().filter(|c| !c.is_crypto).collect()
    }

    /// Crypto configs, in declaration order.
    #[must_use]
    pub fn list_crypto(&self) -> Vec<&CurrencyConfig> {
        self.configs.iter().filter(|c| c.is_crypto).collect()
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Maps the configured rounding mode to a `Decimal` strategy.
#[must_use]
pub const fn rounding_strategy(mode: RoundingMode) -> RoundingStrategy {
    match mode {
        RoundingMode::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
        RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
    }
}

fn standard_configs() -> Vec<CurrencyConfig> {
    vec![
        CurrencyConfig::fiat(CurrencyCode::Usd, "$", "US Dollar"),
        CurrencyConfig::fiat(CurrencyCode::Eur, "€", "Euro"),
        CurrencyConfig::fiat(CurrencyCode::Gbp, "£", "British Pound"),
        CurrencyConfig::crypto(CurrencyCode::Btc, "₿", "Bitcoin", 8, 100),
        CurrencyConfig::crypto(CurrencyCode::Eth, "Ξ", "Ethereum", 18, 10_000),
        CurrencyConfig::crypto(CurrencyCode::Usdt, "₮", "Tether", 6, 1_000_000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("USD", "$", 2, false, dec!(0.01), dec!(1000000))]
    #[case("EUR", "€", 2, false, dec!(0.01), dec!(1000000))]
    #[case("GBP", "£", 2, false, dec!(0.01), dec!(1000000))]
    #[case("BTC", "₿", 8, true, dec!(0.00000001), dec!(100))]
    #[case("ETH", "Ξ", 18, true, dec!(0.000000000000000001), dec!(10000))]
    #[case("USDT", "₮", 6, true, dec!(0.000001), dec!(1000000))]
    fn test_standard_configs(
        #[case] code: &str,
        #[case] symbol: &str,
        #[case] decimals: u32,
        #[case] is_crypto: bool,
        #[case] min: Decimal,
        #[case] max: Decimal,
    ) {
        let config = CurrencyRegistry::global().get_config(code).unwrap();
        assert_eq!(config.code.as_str(), code);
        assert_eq!(config.symbol, symbol);
        assert_eq!(config.decimals, decimals);
        assert_eq!(config.is_crypto, is_crypto);
        assert_eq!(config.min_amount, min);
        assert_eq!(config.max_amount, max);
        assert!(config.min_amount <= config.max_amount);
    }

    #[test]
    fn test_unknown_code_is_unsupported() {
        let registry = CurrencyRegistry::standard();
        assert_eq!(
            registry.get_config("XYZ"),
            Err(CurrencyError::UnsupportedCurrency("XYZ".into()))
        );
        assert!(!registry.is_valid_currency("XYZ"));
        assert!(!registry.is_valid_currency("usd"));
        assert!(registry.is_valid_currency("USDT"));
    }

    #[test]
    fn test_listing_keeps_declaration_order() {
        let registry = CurrencyRegistry::standard();
        let all: Vec<_> = registry.list_all().iter().map(|c| c.code).collect();
        assert_eq!(all, CurrencyCode::ALL);

        let fiat: Vec<_> = registry.list_fiat().iter().map(|c| c.code.as_str()).collect();
        assert_eq!(fiat, ["USD", "EUR", "GBP"]);

        let crypto: Vec<_> = registry
            .list_crypto()
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(crypto, ["BTC", "ETH", "USDT"]);
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let mut config = CurrencyConfig::fiat(CurrencyCode::Usd, "$", "US Dollar");
        config.min_amount = dec!(10);
        config.max_amount = dec!(1);
        let result = CurrencyRegistry::new(vec![config], RoundingStrategy::MidpointAwayFromZero);
        assert!(matches!(result, Err(CurrencyError::Configuration(_))));
    }

    #[test]
    fn test_new_rejects_duplicates_and_oversized_scale() {
        let usd = CurrencyConfig::fiat(CurrencyCode::Usd, "$", "US Dollar");
        let result = CurrencyRegistry::new(
            vec![usd.clone(), usd.clone()],
            RoundingStrategy::MidpointAwayFromZero,
        );
        assert!(matches!(result, Err(CurrencyError::Configuration(_))));

        let mut wide = usd;
        wide.decimals = 29;
        let result = CurrencyRegistry::new(vec![wide], RoundingStrategy::MidpointAwayFromZero);
        assert!(matches!(result, Err(CurrencyError::Configuration(_))));
    }

    #[test]
    fn test_new_accepts_subset() {
        let registry = CurrencyRegistry::new(
            vec![CurrencyConfig::fiat(CurrencyCode::Eur, "€", "Euro")],
            RoundingStrategy::MidpointNearestEven,
        )
        .unwrap();
        assert!(registry.is_valid_currency("EUR"));
        assert!(!registry.is_valid_currency("USD"));
        assert_eq!(registry.rounding(), RoundingStrategy::MidpointNearestEven);
    }

    #[test]
    fn test_rounding_strategy_mapping() {
        assert_eq!(
            rounding_strategy(RoundingMode::HalfAwayFromZero),
            RoundingStrategy::MidpointAwayFromZero
        );
        assert_eq!(
            rounding_strategy(RoundingMode::HalfEven),
            RoundingStrategy::MidpointNearestEven
        );
    }
}
