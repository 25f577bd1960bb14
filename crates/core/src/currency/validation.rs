//! Non-failing amount validation for user-input boundaries.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::amount::IntoAmount;
use super::service::CurrencyService;

/// Outcome of [`CurrencyService::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountValidation {
    /// Whether the amount is acceptable.
    pub is_valid: bool,
    /// User-facing message when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Amount rounded to currency precision when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_amount: Option<Decimal>,
}

impl AmountValidation {
    fn valid(amount: Decimal) -> Self {
        Self {
            is_valid: true,
            error: None,
            parsed_amount: Some(amount),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
            parsed_amount: None,
        }
    }
}

impl CurrencyService {
    /// Validates an amount without ever failing.
    ///
    /// Checks run in order: registered currency, numeric amount, not
    /// negative, at least the minimum, at most the maximum. A valid amount
    /// is returned rounded to currency precision. Numeric text beyond the
    /// range of `Decimal` is reported against the bounds, not as malformed.
    pub fn validate(&self, amount: impl IntoAmount, currency: &str) -> AmountValidation {
        let Ok(config) = self.registry().get_config(currency) else {
            return AmountValidation::invalid(format!("Unsupported currency: {currency}"));
        };

        let Ok(amount) = amount.into_amount_saturating() else {
            return AmountValidation::invalid("Invalid amount format");
        };

        let rejection = if amount < Decimal::ZERO {
            Some("Amount cannot be negative".to_string())
        } else if amount < config.min_amount {
            Some(format!(
                "Minimum amount is {}",
                self.render(config.min_amount, config)
            ))
        } else if amount > config.max_amount {
            Some(format!(
                "Maximum amount is {}",
                self.render(config.max_amount, config)
            ))
        } else {
            None
        };

        match rejection {
            Some(message) => {
                debug!(%amount, currency, reason = %message, "Amount rejected");
                AmountValidation::invalid(message)
            }
            None => AmountValidation::valid(self.round_with(amount, config)),
        }
    }
}
