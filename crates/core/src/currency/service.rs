//! Currency service for formatting, parsing and rounding.
//!
//! This module provides the main service interface for single-currency
//! operations. Validation and fees extend it in their own modules.

use std::sync::Arc;

use monetra_shared::config::CurrencySettings;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tracing::debug;

use super::amount::{IntoAmount, parse_decimal_saturating};
use super::error::CurrencyError;
use super::registry::{CurrencyConfig, CurrencyRegistry, rounding_strategy};

static GLOBAL: Lazy<CurrencyService> =
    Lazy::new(|| CurrencyService::new(CurrencyRegistry::shared()));

/// Default transaction fee: 2.5%.
pub const DEFAULT_FEE_PERCENTAGE: Decimal = Decimal::from_parts(25, 0, 0, false, 3);

/// Currency service over an immutable registry.
///
/// Rounding uses the registry's strategy, which is half away from zero
/// unless configured otherwise:
/// - Rounds 2.345 → 2.35
/// - Rounds -2.345 → -2.35
/// - Rounds 2.344 → 2.34
#[derive(Debug, Clone)]
pub struct CurrencyService {
    registry: Arc<CurrencyRegistry>,
    default_fee_percentage: Decimal,
}

impl CurrencyService {
    /// Creates a service with the default 2.5% fee.
    #[must_use]
    pub fn new(registry: Arc<CurrencyRegistry>) -> Self {
        Self {
            registry,
            default_fee_percentage: DEFAULT_FEE_PERCENTAGE,
        }
    }

    /// Builds a service over the standard registry from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Configuration` if the default fee percentage
    /// is negative.
    pub fn from_settings(settings: &CurrencySettings) -> Result<Self, CurrencyError> {
        let registry =
            CurrencyRegistry::standard().with_rounding(rounding_strategy(settings.rounding));
        Self::new(Arc::new(registry)).with_default_fee_percentage(settings.default_fee_percentage)
    }

    /// Replaces the fee percentage used by [`Self::transaction_fee`].
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Configuration` if `percentage` is negative.
    pub fn with_default_fee_percentage(
        mut self,
        percentage: Decimal,
    ) -> Result<Self, CurrencyError> {
        if percentage < Decimal::ZERO {
            return Err(CurrencyError::Configuration(format!(
                "fee percentage {percentage} is negative"
            )));
        }
        self.default_fee_percentage = percentage;
        Ok(self)
    }

    /// The process-wide service over the standard registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// The registry backing this service.
    #[must_use]
    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Shared handle to the registry backing this service.
    #[must_use]
    pub fn registry_handle(&self) -> Arc<CurrencyRegistry> {
        Arc::clone(&self.registry)
    }

    /// Fee percentage applied when none is given.
    #[must_use]
    pub const fn default_fee_percentage(&self) -> Decimal {
        self.default_fee_percentage
    }

    /// Formats an amount for display.
    ///
    /// Fiat is symbol-prefixed (`$12.50`), crypto is code-suffixed
    /// (`0.00010000 BTC`). Both always show exactly `decimals` fractional
    /// digits. No bounds are checked.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` for an unknown code and `InvalidAmount`
    /// if `amount` is not numeric.
    pub fn format(&self, amount: impl IntoAmount, currency: &str) -> Result<String, CurrencyError> {
        let config = self.registry.get_config(currency)?;
        let amount = amount.into_amount()?;
        Ok(self.render(amount, config))
    }

    /// Parses user input such as `"$1,234.56"` or `"0.5 BTC"`.
    ///
    /// The symbol, then the code, then all whitespace, then all commas are
    /// removed before the remainder is read as a decimal. Symbol and code are
    /// each removed once, at their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` for an unknown code, `InvalidAmount` if
    /// the remainder is not a decimal, and `AmountBelowMinimum` /
    /// `AmountExceedsMaximum` if the value is out of bounds.
    pub fn parse(&self, raw: &str, currency: &str) -> Result<Decimal, CurrencyError> {
        let config = self.registry.get_config(currency)?;

        let without_symbol = raw.replacen(config.symbol, "", 1);
        let without_code = without_symbol.replacen(config.code.as_str(), "", 1);
        let without_whitespace: String =
            without_code.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = without_whitespace.replace(',', "");

        // Numbers too large for `Decimal` saturate so they fail the bounds check.
        let amount =
            parse_decimal_saturating(&cleaned).map_err(|_| CurrencyError::invalid_amount(raw))?;

        if amount < config.min_amount {
            debug!(%amount, currency, minimum = %config.min_amount, "Parsed amount below minimum");
            return Err(CurrencyError::AmountBelowMinimum {
                amount,
                minimum: config.min_amount,
                currency: currency.to_string(),
            });
        }
        if amount > config.max_amount {
            debug!(%amount, currency, maximum = %config.max_amount, "Parsed amount above maximum");
            return Err(CurrencyError::AmountExceedsMaximum {
                amount,
                maximum: config.max_amount,
                currency: currency.to_string(),
            });
        }
        Ok(amount)
    }

    /// Rounds to the currency's precision using the registry strategy.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` for an unknown code.
    pub fn round(&self, amount: Decimal, currency: &str) -> Result<Decimal, CurrencyError> {
        let config = self.registry.get_config(currency)?;
        Ok(self.round_with(amount, config))
    }

    pub(crate) fn round_with(&self, amount: Decimal, config: &CurrencyConfig) -> Decimal {
        amount.round_dp_with_strategy(config.decimals, self.registry.rounding())
    }

    /// Fixed-point rendering padded to exactly `decimals` digits.
    pub(crate) fn render(&self, amount: Decimal, config: &CurrencyConfig) -> String {
        let fixed = pad_fraction(self.round_with(amount, config), config.decimals);
        if config.is_crypto {
            format!("{fixed} {}", config.code)
        } else {
            format!("{}{fixed}", config.symbol)
        }
    }
}

/// Appends zeros up to `decimals` fractional digits. Works on the text, since
/// `Decimal::rescale` stops short once the mantissa would exceed 96 bits.
fn pad_fraction(value: Decimal, decimals: u32) -> String {
    let mut text = value.to_string();
    let present = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    let missing = (decimals as usize).saturating_sub(present);
    if missing > 0 {
        if present == 0 {
            text.push('.');
        }
        text.extend(std::iter::repeat_n('0', missing));
    }
    text
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new(CurrencyRegistry::shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monetra_shared::config::RoundingMode;
    use rstest::rstest;
    use rust_decimal::RoundingStrategy;
    use rust_decimal_macros::dec;

    fn service() -> CurrencyService {
        CurrencyService::default()
    }

    #[rstest]
    #[case("1234.5", "USD", "$1234.50")]
    #[case("12.5", "EUR", "€12.50")]
    #[case("0", "GBP", "£0.00")]
    #[case("0.0001", "BTC", "0.00010000 BTC")]
    #[case("1", "ETH", "1.000000000000000000 ETH")]
    #[case("2.5", "USDT", "2.500000 USDT")]
    #[case("100000000000", "ETH", "100000000000.000000000000000000 ETH")]
    #[case("79228162514264337593543950335", "BTC", "79228162514264337593543950335.00000000 BTC")]
    fn test_format(#[case] amount: &str, #[case] currency: &str, #[case] expected: &str) {
        assert_eq!(service().format(amount, currency).unwrap(), expected);
    }

    #[test]
    fn test_format_accepts_numbers_and_decimals() {
        assert_eq!(service().format(12.5_f64, "USD").unwrap(), "$12.50");
        assert_eq!(service().format(7_i64, "USD").unwrap(), "$7.00");
        assert_eq!(service().format(dec!(1.005), "USD").unwrap(), "$1.01");
    }

    #[test]
    fn test_format_does_not_check_bounds() {
        assert_eq!(service().format(dec!(5000000), "USD").unwrap(), "$5000000.00");
        assert_eq!(service().format(dec!(-3), "USD").unwrap(), "$-3.00");
    }

    #[test]
    fn test_format_errors() {
        assert_eq!(
            service().format("1", "XYZ"),
            Err(CurrencyError::UnsupportedCurrency("XYZ".into()))
        );
        assert!(matches!(
            service().format("abc", "USD"),
            Err(CurrencyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_unsupported_currency_checked_before_amount() {
        assert!(matches!(
            service().format("abc", "XYZ"),
            Err(CurrencyError::UnsupportedCurrency(_))
        ));
        assert!(matches!(
            service().parse("abc", "XYZ"),
            Err(CurrencyError::UnsupportedCurrency(_))
        ));
    }

    #[rstest]
    #[case("$1,234.56", "USD", dec!(1234.56))]
    #[case("  1 000.5 ", "USD", dec!(1000.5))]
    #[case("€12", "EUR", dec!(12))]
    #[case("0.5 BTC", "BTC", dec!(0.5))]
    #[case("₿0.5", "BTC", dec!(0.5))]
    #[case("1,000 USDT", "USDT", dec!(1000))]
    #[case("1e-8", "BTC", dec!(0.00000001))]
    fn test_parse(#[case] raw: &str, #[case] currency: &str, #[case] expected: Decimal) {
        assert_eq!(service().parse(raw, currency).unwrap(), expected);
    }

    #[test]
    fn test_parse_below_minimum_carries_bound() {
        let err = service().parse("0.000000005", "BTC").unwrap_err();
        assert_eq!(
            err,
            CurrencyError::AmountBelowMinimum {
                amount: dec!(0.000000005),
                minimum: dec!(0.00000001),
                currency: "BTC".into(),
            }
        );
    }

    #[test]
    fn test_parse_above_maximum_carries_bound() {
        let err = service().parse("$1,000,000.01", "USD").unwrap_err();
        assert_eq!(
            err,
            CurrencyError::AmountExceedsMaximum {
                amount: dec!(1000000.01),
                maximum: dec!(1000000),
                currency: "USD".into(),
            }
        );
    }

    #[test]
    fn test_parse_bounds_are_inclusive() {
        assert_eq!(service().parse("0.01", "USD").unwrap(), dec!(0.01));
        assert_eq!(service().parse("1,000,000", "USD").unwrap(), dec!(1000000));
        assert_eq!(service().parse("100 BTC", "BTC").unwrap(), dec!(100));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            service().parse("twelve dollars", "USD"),
            Err(CurrencyError::InvalidAmount(_))
        ));
        assert!(matches!(
            service().parse("$", "USD"),
            Err(CurrencyError::InvalidAmount(_))
        ));
        // Symbol is stripped once only.
        assert!(matches!(
            service().parse("$$5", "USD"),
            Err(CurrencyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_rejects_digit_separators() {
        assert!(matches!(
            service().parse("1_000", "USD"),
            Err(CurrencyError::InvalidAmount(_))
        ));
    }

    #[rstest]
    #[case("100000000000000000000000000000000")]
    #[case("$1e40")]
    fn test_parse_beyond_decimal_range_exceeds_maximum(#[case] raw: &str) {
        assert_eq!(
            service().parse(raw, "USD").unwrap_err(),
            CurrencyError::AmountExceedsMaximum {
                amount: Decimal::MAX,
                maximum: dec!(1000000),
                currency: "USD".into(),
            }
        );
    }

    #[rstest]
    #[case("-100000000000000000000000000000000", Decimal::MIN)]
    #[case("1e-40 BTC", Decimal::new(1, 28))]
    fn test_parse_beyond_decimal_range_below_minimum(
        #[case] raw: &str,
        #[case] amount: Decimal,
    ) {
        assert_eq!(
            service().parse(raw, "BTC").unwrap_err(),
            CurrencyError::AmountBelowMinimum {
                amount,
                minimum: dec!(0.00000001),
                currency: "BTC".into(),
            }
        );
    }

    #[test]
    fn test_parse_negative_is_below_minimum() {
        assert!(matches!(
            service().parse("-5", "USD"),
            Err(CurrencyError::AmountBelowMinimum { .. })
        ));
    }

    #[rstest]
    #[case(dec!(2.345), "USD", dec!(2.35))]
    #[case(dec!(-2.345), "USD", dec!(-2.35))]
    #[case(dec!(2.344), "USD", dec!(2.34))]
    #[case(dec!(0.123456785), "BTC", dec!(0.12345679))]
    #[case(dec!(1.0000005), "USDT", dec!(1.000001))]
    fn test_round_half_away_from_zero(
        #[case] amount: Decimal,
        #[case] currency: &str,
        #[case] expected: Decimal,
    ) {
        assert_eq!(service().round(amount, currency).unwrap(), expected);
    }

    #[test]
    fn test_round_with_bankers_registry() {
        let registry =
            CurrencyRegistry::standard().with_rounding(RoundingStrategy::MidpointNearestEven);
        let service = CurrencyService::new(Arc::new(registry));
        assert_eq!(service.round(dec!(2.345), "USD").unwrap(), dec!(2.34));
        assert_eq!(service.round(dec!(2.355), "USD").unwrap(), dec!(2.36));
        assert_eq!(service.format(dec!(2.345), "USD").unwrap(), "$2.34");
    }

    #[test]
    fn test_round_unknown_currency() {
        assert!(matches!(
            service().round(dec!(1), "XYZ"),
            Err(CurrencyError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = CurrencySettings {
            default_fee_percentage: dec!(0.01),
            rounding: RoundingMode::HalfEven,
        };
        let service = CurrencyService::from_settings(&settings).unwrap();
        assert_eq!(service.default_fee_percentage(), dec!(0.01));
        assert_eq!(
            service.registry().rounding(),
            RoundingStrategy::MidpointNearestEven
        );

        let settings = CurrencySettings {
            default_fee_percentage: dec!(-0.01),
            rounding: RoundingMode::HalfAwayFromZero,
        };
        assert!(matches!(
            CurrencyService::from_settings(&settings),
            Err(CurrencyError::Configuration(_))
        ));
    }
}
