//! Multi-currency handling and exchange rates.
//!
//! Amounts are always `rust_decimal::Decimal`, never floats. Every operation
//! that accepts a currency code resolves it through the [`CurrencyRegistry`]
//! first and fails with [`CurrencyError::UnsupportedCurrency`] on a miss.

pub mod amount;
pub mod conversion;
pub mod error;
pub mod exchange;
pub mod fee;
pub mod money;
pub mod ops;
pub mod registry;
pub mod service;
pub mod validation;

#[cfg(test)]
mod props;

pub use amount::IntoAmount;
pub use conversion::CurrencyConverter;
pub use error::CurrencyError;
pub use exchange::{ExchangeRate, RateProvider, StaticRateTable};
pub use fee::FeeBand;
pub use money::Money;
pub use ops::{
    calculate_transaction_fee, calculate_transaction_fee_with_percentage, convert_currency,
    format_currency, get_crypto_currencies, get_fiat_currencies, get_supported_currencies,
    is_valid_currency, parse_currency_amount, round_to_currency_precision, validate_amount,
};
pub use registry::{CurrencyConfig, CurrencyRegistry};
pub use service::CurrencyService;
pub use validation::AmountValidation;
