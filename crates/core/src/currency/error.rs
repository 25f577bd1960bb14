//! Currency error types.

use monetra_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Currency-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The code is not a registered currency.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// The input cannot be read as a finite decimal.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Parsed amount is below the currency minimum.
    #[error("amount {amount} {currency} is below the minimum of {minimum}")]
    AmountBelowMinimum {
        /// Offending amount.
        amount: Decimal,
        /// Violated bound.
        minimum: Decimal,
        /// Currency code.
        currency: String,
    },

    /// Parsed amount is above the currency maximum.
    #[error("amount {amount} {currency} exceeds the maximum of {maximum}")]
    AmountExceedsMaximum {
        /// Offending amount.
        amount: Decimal,
        /// Violated bound.
        maximum: Decimal,
        /// Currency code.
        currency: String,
    },

    /// No exchange rate exists for the pair.
    #[error("exchange rate not available for {from}-{to}")]
    RateUnavailable {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },

    /// Arithmetic between two different currencies.
    #[error("currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Expected currency.
        expected: String,
        /// Actual currency.
        got: String,
    },

    /// Registry or service configuration is invalid.
    #[error("invalid currency configuration: {0}")]
    Configuration(String),
}

impl CurrencyError {
    /// Create an unsupported currency error.
    #[must_use]
    pub fn unsupported(code: impl Into<String>) -> Self {
        Self::UnsupportedCurrency(code.into())
    }

    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(input: impl Into<String>) -> Self {
        Self::InvalidAmount(input.into())
    }

    /// Create a rate unavailable error.
    #[must_use]
    pub fn rate_unavailable(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::RateUnavailable {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        let message = err.to_string();
        match err {
            CurrencyError::UnsupportedCurrency(_)
            | CurrencyError::InvalidAmount(_)
            | CurrencyError::AmountBelowMinimum { .. }
            | CurrencyError::AmountExceedsMaximum { .. } => Self::Validation(message),
            CurrencyError::CurrencyMismatch { .. } => Self::BusinessRule(message),
            CurrencyError::RateUnavailable { .. } => Self::ExternalService(message),
            CurrencyError::Configuration(_) => Self::Configuration(message),
        }
    }
}
