//! Exchange rate types and rate sources.

use std::collections::HashMap;
use std::future::Future;

use monetra_shared::config::RateSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub fn new(from_currency: impl Into<String>, to_currency: impl Into<String>, rate: Decimal) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rate,
        }
    }

    /// Lookup key, `"{from}-{to}"`.
    #[must_use]
    pub fn pair_key(&self) -> String {
        pair_key(&self.from_currency, &self.to_currency)
    }
}

fn pair_key(from: &str, to: &str) -> String {
    format!("{from}-{to}")
}

/// Source of exchange rates.
///
/// Implemented by live feeds outside this crate; [`StaticRateTable`] is the
/// bundled in-memory implementation. Retries and timeouts belong to the
/// implementation, not to callers in this crate.
pub trait RateProvider: Send + Sync {
    /// Rate for the ordered pair, so that `amount_from * rate = amount_to`.
    ///
    /// Fails with `CurrencyError::RateUnavailable` when the pair is unknown.
    fn get_rate(
        &self,
        from: &str,
        to: &str,
    ) -> impl Future<Output = Result<Decimal, CurrencyError>> + Send;
}

/// In-memory rate table keyed by `"{from}-{to}"`.
///
/// Only literal entries are used: no inverse or cross rates are derived.
#[derive(Debug, Clone, Default)]
pub struct StaticRateTable {
    rates: HashMap<String, ExchangeRate>,
}

impl StaticRateTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with placeholder rates for development.
    #[must_use]
    pub fn mock() -> Self {
        [
            ("USD", "EUR", Decimal::new(85, 2)),
            ("EUR", "USD", Decimal::new(118, 2)),
            ("USD", "GBP", Decimal::new(73, 2)),
            ("GBP", "USD", Decimal::new(137, 2)),
            ("USD", "BTC", Decimal::new(23, 6)),
            ("BTC", "USD", Decimal::new(43_000, 0)),
            ("USD", "ETH", Decimal::new(4, 4)),
            ("ETH", "USD", Decimal::new(2_500, 0)),
            ("USDT", "USD", Decimal::ONE),
            ("USD", "USDT", Decimal::ONE),
        ]
        .into_iter()
        .map(|(from, to, rate)| ExchangeRate::new(from, to, rate))
        .collect()
    }

    /// Builds a table from configuration: the mock rates (if enabled) with
    /// the configured overrides layered on top.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Configuration` if an override rate is not
    /// positive.
    pub fn from_settings(settings: &RateSettings) -> Result<Self, CurrencyError> {
        let mut table = if settings.include_mock_rates {
            Self::mock()
        } else {
            Self::new()
        };
        for entry in &settings.overrides {
            if entry.rate <= Decimal::ZERO {
                return Err(CurrencyError::Configuration(format!(
                    "rate for {}-{} must be positive, got {}",
                    entry.from, entry.to, entry.rate
                )));
            }
            table.insert(ExchangeRate::new(&entry.from, &entry.to, entry.rate));
        }
        Ok(table)
    }

    /// Adds a rate, returning the table.
    #[must_use]
    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.insert(rate);
        self
    }

    /// Adds or replaces a rate.
    pub fn insert(&mut self, rate: ExchangeRate) {
        self.rates.insert(rate.pair_key(), rate);
    }

    /// Literal lookup of a pair.
    #[must_use]
    pub fn lookup(&self, from: &str, to: &str) -> Option<Decimal> {
        self.rates.get(&pair_key(from, to)).map(|r| r.rate)
    }

    /// All rates, sorted by pair key.
    #[must_use]
    pub fn rates(&self) -> Vec<&ExchangeRate> {
        let mut rates: Vec<_> = self.rates.values().collect();
        rates.sort_by_key(|r| r.pair_key());
        rates
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<ExchangeRate> for StaticRateTable {
    fn from_iter<I: IntoIterator<Item = ExchangeRate>>(iter: I) -> Self {
        let mut table = Self::new();
        for rate in iter {
            table.insert(rate);
        }
        table
    }
}

impl RateProvider for StaticRateTable {
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
        self.lookup(from, to)
            .ok_or_else(|| CurrencyError::rate_unavailable(from, to))
    }
}
