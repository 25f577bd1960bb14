//! Coercion of caller-supplied amounts into `Decimal`.
//!
//! Callers hand in decimals, strings or plain numbers; everything is turned
//! into a `Decimal` before any arithmetic happens.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use super::error::CurrencyError;

/// A value that can be read as a monetary amount.
pub trait IntoAmount {
    /// Converts into a finite `Decimal`.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidAmount` if the value is not numeric or
    /// not finite.
    fn into_amount(self) -> Result<Decimal, CurrencyError>;

    /// As [`Self::into_amount`], except numeric text beyond the range of
    /// `Decimal` saturates instead of failing. Only for values that feed a
    /// bounds check.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidAmount` if the value is not numeric.
    fn into_amount_saturating(self) -> Result<Decimal, CurrencyError>
    where
        Self: Sized,
    {
        self.into_amount()
    }
}

impl IntoAmount for Decimal {
    fn into_amount(self) -> Result<Decimal, CurrencyError> {
        Ok(self)
    }
}

impl IntoAmount for &Decimal {
    fn into_amount(self) -> Result<Decimal, CurrencyError> {
        Ok(*self)
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Result<Decimal, CurrencyError> {
        parse_decimal(self)
    }

    fn into_amount_saturating(self) -> Result<Decimal, CurrencyError> {
        parse_decimal_saturating(self)
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Result<Decimal, CurrencyError> {
        parse_decimal(self)
    }

    fn into_amount_saturating(self) -> Result<Decimal, CurrencyError> {
        parse_decimal_saturating(self)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<Decimal, CurrencyError> {
        parse_decimal(&self)
    }

    fn into_amount_saturating(self) -> Result<Decimal, CurrencyError> {
        parse_decimal_saturating(&self)
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Result<Decimal, CurrencyError> {
        Decimal::from_f64(self).ok_or_else(|| CurrencyError::invalid_amount(self.to_string()))
    }
}

macro_rules! integer_amount {
    ($($ty:ty),*) => {
        $(
            impl IntoAmount for $ty {
                fn into_amount(self) -> Result<Decimal, CurrencyError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

integer_amount!(i32, i64, u32, u64);

/// Parses plain decimal notation, falling back to scientific notation.
///
/// # Errors
///
/// Returns `CurrencyError::InvalidAmount` for anything else, including
/// `NaN` and `Infinity`.
pub fn parse_decimal(raw: &str) -> Result<Decimal, CurrencyError> {
    let trimmed = raw.trim();
    // `Decimal::from_str` skips underscores; digit separators are not accepted.
    if trimmed.is_empty() || trimmed.contains('_') {
        return Err(CurrencyError::invalid_amount(raw));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CurrencyError::invalid_amount(raw))
}

/// As [`parse_decimal`], but well-formed numbers outside the range of
/// `Decimal` saturate: too large becomes `Decimal::MAX` / `Decimal::MIN`,
/// too small becomes one unit at the maximum scale with the input's sign.
///
/// # Errors
///
/// Returns `CurrencyError::InvalidAmount` if `raw` is not a number.
pub fn parse_decimal_saturating(raw: &str) -> Result<Decimal, CurrencyError> {
    parse_decimal(raw).or_else(|err| saturate(raw.trim()).ok_or(err))
}

/// Integer digits in `Decimal::MAX`.
const MAX_INTEGER_DIGITS: i64 = 29;

fn saturate(text: &str) -> Option<Decimal> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], parse_exponent(&unsigned[at + 1..])?),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int_part.is_empty() && frac_part.is_empty()) || !is_digits(int_part) || !is_digits(frac_part)
    {
        return None;
    }

    // Position of the leading significant digit relative to the decimal point.
    let significant = int_part.trim_start_matches('0');
    let order = if significant.is_empty() {
        let fraction = frac_part.trim_start_matches('0');
        if fraction.is_empty() {
            return Some(Decimal::ZERO);
        }
        -i64::try_from(frac_part.len() - fraction.len()).ok()?
    } else {
        i64::try_from(significant.len()).ok()?
    };

    let order = order.saturating_add(exponent);
    if order >= MAX_INTEGER_DIGITS {
        Some(if negative { Decimal::MIN } else { Decimal::MAX })
    } else if order <= 0 {
        Some(Decimal::new(if negative { -1 } else { 1 }, Decimal::MAX_SCALE))
    } else {
        None
    }
}

fn parse_exponent(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !is_digits(digits) {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}
