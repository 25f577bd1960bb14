//! Currency conversion logic.
//!
//! `convert` returns the raw product `amount * rate`. Rounding to the target
//! currency's precision is a separate, explicit step (`convert_rounded`, or
//! `CurrencyService::round`).

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::CurrencyError;
use super::exchange::RateProvider;
use super::registry::CurrencyRegistry;

/// Converts amounts between currencies using an injected rate source.
#[derive(Debug)]
pub struct CurrencyConverter<P: RateProvider> {
    registry: Arc<CurrencyRegistry>,
    provider: Arc<P>,
}

impl<P: RateProvider> Clone for CurrencyConverter<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: RateProvider> CurrencyConverter<P> {
    /// Creates a converter.
    #[must_use]
    pub fn new(registry: Arc<CurrencyRegistry>, provider: Arc<P>) -> Self {
        Self { registry, provider }
    }

    /// The rate source.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Converts `amount` from one currency to another.
    ///
    /// Identical currencies return `amount` untouched without consulting the
    /// provider. A target the registry does not list is still offered to
    /// the provider, which reports `RateUnavailable` if it cannot quote it.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` if `from` is not registered,
    /// `RateUnavailable` if no rate exists for the pair, and `InvalidAmount`
    /// if the product overflows.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, CurrencyError> {
        self.registry.get_config(from)?;

        if from == to {
            return Ok(amount);
        }

        let rate = match self.provider.get_rate(from, to).await {
            Ok(rate) => rate,
            Err(err) => {
                warn!(from, to, error = %err, "Exchange rate lookup failed");
                return Err(err);
            }
        };

        let converted = amount.checked_mul(rate).ok_or_else(|| {
            CurrencyError::invalid_amount(format!("{amount} {from} at {rate} overflows"))
        })?;
        debug!(%amount, from, to, %rate, %converted, "Converted amount");
        Ok(converted)
    }

    /// Converts and rounds to the target currency's precision with the
    /// registry's rounding strategy.
    ///
    /// # Errors
    ///
    /// As [`Self::convert`], plus `UnsupportedCurrency` if `to` is not
    /// registered.
    pub async fn convert_rounded(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, CurrencyError> {
        let target = self.registry.get_config(to)?;
        let converted = self.convert(amount, from, to).await?;
        Ok(converted.round_dp_with_strategy(target.decimals, self.registry.rounding()))
    }
}
