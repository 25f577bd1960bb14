//! Property-based tests for currency operations.
//!
//! - Round-trip: parse(format(x)) == round(x)
//! - Bounds enforcement
//! - Precision of formatted output
//! - Negative rejection
//! - Fee banding
//! - Identity conversion

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use monetra_shared::CurrencyCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::CurrencyConverter;
use super::error::CurrencyError;
use super::exchange::{RateProvider, StaticRateTable};
use super::fee::FeeBand;
use super::registry::{CurrencyConfig, CurrencyRegistry};
use super::service::CurrencyService;

fn config(code: CurrencyCode) -> &'static CurrencyConfig {
    CurrencyRegistry::global()
        .get_config(code.as_str())
        .expect("standard registry covers every code")
}

/// Strategy to pick any registered currency.
fn currency() -> impl Strategy<Value = CurrencyCode> {
    prop::sample::select(CurrencyCode::ALL.to_vec())
}

/// Strategy to generate an amount within the currency's bounds, with up to
/// three digits more precision than the currency supports.
fn in_bounds_amount() -> impl Strategy<Value = (CurrencyCode, Decimal)> {
    (currency(), 1i64..1_000_000_000_000i64, 0u32..=3).prop_map(|(code, units, extra)| {
        let config = config(code);
        let amount = Decimal::new(units, config.decimals + extra);
        (code, amount.min(config.max_amount).max(config.min_amount))
    })
}

/// Strategy to generate a magnitude in (0, 1e10) at any scale.
fn magnitude() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000_000i64, 2u32..=28).prop_map(|(units, scale)| Decimal::new(units, scale))
}

/// Strategy to generate any non-zero magnitude up to `i64::MAX`, including
/// values too wide to rescale to 18 places.
fn wide_magnitude() -> impl Strategy<Value = Decimal> {
    (1i64..=i64::MAX, 0u32..=28).prop_map(|(units, scale)| Decimal::new(units, scale))
}

/// Strategy to generate a fee percentage between 0 and 1.
fn fee_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 4))
}

/// Formatted output without the symbol prefix or code suffix.
fn numeric_part(formatted: &str, config: &CurrencyConfig) -> String {
    if config.is_crypto {
        formatted
            .trim_end_matches(config.code.as_str())
            .trim_end()
            .to_string()
    } else {
        formatted.trim_start_matches(config.symbol).to_string()
    }
}

struct CountingProvider {
    calls: AtomicUsize,
}

impl RateProvider for CountingProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StaticRateTable::mock().get_rate(from, to).await
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Formatting then parsing yields the amount rounded to currency precision.
    #[test]
    fn prop_format_parse_round_trip((code, amount) in in_bounds_amount()) {
        let service = CurrencyService::global();
        let formatted = service.format(amount, code.as_str()).unwrap();
        let parsed = service.parse(&formatted, code.as_str()).unwrap();
        prop_assert_eq!(parsed, service.round(amount, code.as_str()).unwrap());
    }

    /// Values strictly outside the bounds are rejected; the bounds themselves parse.
    #[test]
    fn prop_bounds_enforced(code in currency(), k in 1i64..1_000) {
        let service = CurrencyService::global();
        let config = config(code);
        let delta = Decimal::new(k, config.decimals + 1);

        let below = (config.min_amount - delta).to_string();
        let is_below = matches!(
            service.parse(&below, code.as_str()),
            Err(CurrencyError::AmountBelowMinimum { .. })
        );
        prop_assert!(is_below, "{} should be below minimum", below);

        let above = (config.max_amount + delta).to_string();
        let is_above = matches!(
            service.parse(&above, code.as_str()),
            Err(CurrencyError::AmountExceedsMaximum { .. })
        );
        prop_assert!(is_above, "{} should exceed maximum", above);

        prop_assert_eq!(
            service.parse(&config.min_amount.to_string(), code.as_str()).unwrap(),
            config.min_amount
        );
        prop_assert_eq!(
            service.parse(&config.max_amount.to_string(), code.as_str()).unwrap(),
            config.max_amount
        );
    }

    /// Formatted output always has exactly `decimals` fractional digits.
    #[test]
    fn prop_format_precision(code in currency(), amount in wide_magnitude(), negative in any::<bool>()) {
        let config = config(code);
        let amount = if negative { -amount } else { amount };
        let formatted = CurrencyService::global().format(amount, code.as_str()).unwrap();
        let numeric = numeric_part(&formatted, config);
        let fraction = numeric.split('.').nth(1).unwrap_or_default();
        prop_assert_eq!(fraction.len(), config.decimals as usize, "{}", formatted);
    }

    /// Rounding moves a value by at most half of the smallest unit.
    #[test]
    fn prop_round_within_half_unit(code in currency(), amount in magnitude()) {
        let config = config(code);
        let rounded = CurrencyService::global().round(amount, code.as_str()).unwrap();
        let half_unit = Decimal::new(5, config.decimals + 1);
        prop_assert!((rounded - amount).abs() <= half_unit);
    }

    /// Negative amounts are never valid, whatever their magnitude.
    #[test]
    fn prop_negative_rejected(code in currency(), amount in magnitude()) {
        let result = CurrencyService::global().validate(-amount, code.as_str());
        prop_assert!(!result.is_valid);
        prop_assert_eq!(result.error.as_deref(), Some("Amount cannot be negative"));
    }

    /// Fees always land inside the currency class band.
    #[test]
    fn prop_fee_within_band(
        code in currency(),
        amount in magnitude(),
        percentage in fee_percentage(),
    ) {
        let band = FeeBand::for_config(config(code));
        let fee = CurrencyService::global()
            .transaction_fee_with_percentage(amount, code.as_str(), percentage)
            .unwrap();
        prop_assert!(fee >= band.min && fee <= band.max, "fee {} outside band", fee);
    }

    /// Converting to the same currency returns the input without a rate lookup.
    #[test]
    fn prop_identity_conversion(code in currency(), amount in magnitude()) {
        let provider = Arc::new(CountingProvider { calls: AtomicUsize::new(0) });
        let converter = CurrencyConverter::new(CurrencyRegistry::shared(), Arc::clone(&provider));
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let result = runtime
            .block_on(converter.convert(amount, code.as_str(), code.as_str()))
            .unwrap();

        prop_assert_eq!(result, amount);
        prop_assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
