//! Transaction fee calculation.

use rust_decimal::Decimal;

use super::error::CurrencyError;
use super::registry::CurrencyConfig;
use super::service::CurrencyService;

/// Inclusive range a computed fee is clamped into.
///
/// Bands are flat per currency class: BTC and ETH share the crypto band
/// even though their unit values differ by orders of magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBand {
    /// Smallest fee charged.
    pub min: Decimal,
    /// Largest fee charged.
    pub max: Decimal,
}

impl FeeBand {
    /// Fiat band: 0.30 to 50.00.
    pub const FIAT: Self = Self {
        min: Decimal::from_parts(30, 0, 0, false, 2),
        max: Decimal::from_parts(5000, 0, 0, false, 2),
    };

    /// Crypto band: 0.0001 to 0.01 units.
    pub const CRYPTO: Self = Self {
        min: Decimal::from_parts(1, 0, 0, false, 4),
        max: Decimal::from_parts(1, 0, 0, false, 2),
    };

    /// Band for the currency's class.
    #[must_use]
    pub const fn for_config(config: &CurrencyConfig) -> Self {
        if config.is_crypto {
            Self::CRYPTO
        } else {
            Self::FIAT
        }
    }

    /// `max(min, min(fee, max))`
    #[must_use]
    pub fn clamp(&self, fee: Decimal) -> Decimal {
        fee.min(self.max).max(self.min)
    }
}

impl CurrencyService {
    /// Fee at the service's default percentage, clamped into the band.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` for an unknown code.
    pub fn transaction_fee(&self, amount: Decimal, currency: &str) -> Result<Decimal, CurrencyError> {
        self.transaction_fee_with_percentage(amount, currency, self.default_fee_percentage())
    }

    /// Fee at an explicit percentage (`0.025` is 2.5%), clamped into the band.
    /// The result is not rounded.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` for an unknown code and `InvalidAmount`
    /// if `amount * fee_percentage` overflows.
    pub fn transaction_fee_with_percentage(
        &self,
        amount: Decimal,
        currency: &str,
        fee_percentage: Decimal,
    ) -> Result<Decimal, CurrencyError> {
        let config = self.registry().get_config(currency)?;
        let raw_fee = amount.checked_mul(fee_percentage).ok_or_else(|| {
            CurrencyError::invalid_amount(format!("{amount} * {fee_percentage} overflows"))
        })?;
        Ok(FeeBand::for_config(config).clamp(raw_fee))
    }
}
