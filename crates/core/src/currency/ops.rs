//! Free-function entry points over the process-wide registry and service.
//!
//! These are the calls route handlers and payment adapters use directly.
//! Code that needs a custom registry or rate source should hold its own
//! [`CurrencyService`] / [`CurrencyConverter`] instead.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use super::amount::IntoAmount;
use super::conversion::CurrencyConverter;
use super::error::CurrencyError;
use super::exchange::StaticRateTable;
use super::registry::{CurrencyConfig, CurrencyRegistry};
use super::service::CurrencyService;
use super::validation::AmountValidation;

static CONVERTER: Lazy<CurrencyConverter<StaticRateTable>> = Lazy::new(|| {
    CurrencyConverter::new(CurrencyRegistry::shared(), Arc::new(StaticRateTable::mock()))
});

/// See [`CurrencyService::format`].
pub fn format_currency(amount: impl IntoAmount, currency: &str) -> Result<String, CurrencyError> {
    CurrencyService::global().format(amount, currency)
}

/// See [`CurrencyService::parse`].
pub fn parse_currency_amount(raw: &str, currency: &str) -> Result<Decimal, CurrencyError> {
    CurrencyService::global().parse(raw, currency)
}

/// See [`CurrencyService::validate`].
pub fn validate_amount(amount: impl IntoAmount, currency: &str) -> AmountValidation {
    CurrencyService::global().validate(amount, currency)
}

/// See [`CurrencyService::round`].
pub fn round_to_currency_precision(
    amount: Decimal,
    currency: &str,
) -> Result<Decimal, CurrencyError> {
    CurrencyService::global().round(amount, currency)
}

/// Fee at the default 2.5%. See [`CurrencyService::transaction_fee`].
pub fn calculate_transaction_fee(amount: Decimal, currency: &str) -> Result<Decimal, CurrencyError> {
    CurrencyService::global().transaction_fee(amount, currency)
}

/// See [`CurrencyService::transaction_fee_with_percentage`].
pub fn calculate_transaction_fee_with_percentage(
    amount: Decimal,
    currency: &str,
    fee_percentage: Decimal,
) -> Result<Decimal, CurrencyError> {
    CurrencyService::global().transaction_fee_with_percentage(amount, currency, fee_percentage)
}

/// Converts with the bundled placeholder rate table.
///
/// See [`CurrencyConverter::convert`].
pub async fn convert_currency(
    amount: Decimal,
    from: &str,
    to: &str,
) -> Result<Decimal, CurrencyError> {
    CONVERTER.convert(amount, from, to).await
}

/// Returns true iff `code` is a registered currency.
#[must_use]
pub fn is_valid_currency(code: &str) -> bool {
    CurrencyRegistry::global().is_valid_currency(code)
}

/// All registered currencies, in declaration order.
#[must_use]
pub fn get_supported_currencies() -> &'static [CurrencyConfig] {
    CurrencyRegistry::global().list_all()
}

/// Fiat currencies, in declaration order.
#[must_use]
pub fn get_fiat_currencies() -> Vec<&'static CurrencyConfig> {
    CurrencyRegistry::global().list_fiat()
}

/// Crypto currencies, in declaration order.
#[must_use]
pub fn get_crypto_currencies() -> Vec<&'static CurrencyConfig> {
    CurrencyRegistry::global().list_crypto()
}
