//! Money type pairing a decimal amount with its currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Arithmetic between two `Money` values checks currencies first; everything
//! else delegates to the bare-decimal operations of [`CurrencyService`].

use monetra_shared::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::conversion::CurrencyConverter;
use super::error::CurrencyError;
use super::exchange::RateProvider;
use super::service::CurrencyService;
use super::validation::AmountValidation;

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parses user input (symbols, codes and separators allowed) with bounds checks.
    ///
    /// # Errors
    ///
    /// See [`CurrencyService::parse`].
    pub fn parse(
        raw: &str,
        currency: CurrencyCode,
        service: &CurrencyService,
    ) -> Result<Self, CurrencyError> {
        let amount = service.parse(raw, currency.as_str())?;
        Ok(Self::new(amount, currency))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Adds two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` if currencies differ and `InvalidAmount`
    /// on overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or_else(|| CurrencyError::invalid_amount(format!("{self:?} + {other:?} overflows")))
    }

    /// Subtracts an amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` if currencies differ and `InvalidAmount`
    /// on overflow.
    pub fn checked_sub(self, other: Self) -> Result<Self, CurrencyError> {
        self.ensure_same_currency(other)?;
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or_else(|| CurrencyError::invalid_amount(format!("{self:?} - {other:?} overflows")))
    }

    /// Scales the amount by a factor, keeping the currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` on overflow.
    pub fn multiply(self, factor: Decimal) -> Result<Self, CurrencyError> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or_else(|| CurrencyError::invalid_amount(format!("{self:?} * {factor} overflows")))
    }

    /// Rounds to the currency's precision.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` if the service's registry lacks the currency.
    pub fn rounded(self, service: &CurrencyService) -> Result<Self, CurrencyError> {
        let amount = service.round(self.amount, self.currency.as_str())?;
        Ok(Self::new(amount, self.currency))
    }

    /// Formats for display, e.g. `$12.50` or `0.00010000 BTC`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` if the service's registry lacks the currency.
    pub fn format(&self, service: &CurrencyService) -> Result<String, CurrencyError> {
        service.format(self.amount, self.currency.as_str())
    }

    /// Non-failing validation against the currency's bounds.
    #[must_use]
    pub fn validate(&self, service: &CurrencyService) -> AmountValidation {
        service.validate(self.amount, self.currency.as_str())
    }

    /// Transaction fee at the service's default percentage.
    ///
    /// # Errors
    ///
    /// See [`CurrencyService::transaction_fee`].
    pub fn transaction_fee(&self, service: &CurrencyService) -> Result<Self, CurrencyError> {
        let fee = service.transaction_fee(self.amount, self.currency.as_str())?;
        Ok(Self::new(fee, self.currency))
    }

    /// Converts into `target`, rounded to the target's precision.
    ///
    /// # Errors
    ///
    /// See [`CurrencyConverter::convert_rounded`].
    pub async fn convert_to<P: RateProvider>(
        self,
        target: CurrencyCode,
        converter: &CurrencyConverter<P>,
    ) -> Result<Self, CurrencyError> {
        let amount = converter
            .convert_rounded(self.amount, self.currency.as_str(), target.as_str())
            .await?;
        Ok(Self::new(amount, target))
    }

    fn ensure_same_currency(self, other: Self) -> Result<(), CurrencyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CurrencyError::CurrencyMismatch {
                expected: self.currency.to_string(),
                got: other.currency.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.format(CurrencyService::global()) {
            Ok(formatted) => f.write_str(&formatted),
            Err(_) => write!(f, "{} {}", self.amount, self.currency),
        }
    }
}
