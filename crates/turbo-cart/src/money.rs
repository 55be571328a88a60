//! Prices and display currencies.
//!
//! Uses an integer minor-unit representation to avoid floating-point
//! precision issues in totals. The cart itself is currency-agnostic; a
//! [`Currency`] only decides how an amount is rendered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

use crate::error::CartError;

/// Currencies the storefront can render amounts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
    MXN,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "EUR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::MXN => "MXN",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "€").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
            Currency::GBP => "\u{00a3}",
            Currency::MXN => "MX$",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Number of minor-unit digits.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Result<Self, CartError> {
        match code.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "GBP" => Ok(Currency::GBP),
            "MXN" => Ok(Currency::MXN),
            "JPY" => Ok(Currency::JPY),
            _ => Err(CartError::UnknownCurrency(code.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A non-negative unit price or total, in minor units (e.g. cents).
///
/// Arithmetic saturates at `u64::MAX` instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// The zero amount.
    pub const ZERO: Price = Price(0);

    /// Create a price from minor units.
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Amount in minor units.
    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Parse a decimal amount such as `"10.5"` with `decimals` fractional
    /// digits of precision.
    ///
    /// No rounding takes place: more fractional digits than `decimals` is an
    /// error, as is a sign, an empty string or an overflow.
    ///
    /// ```
    /// use turbo_cart::money::Price;
    /// assert_eq!(Price::parse("49.99", 2).unwrap().minor(), 4999);
    /// assert_eq!(Price::parse("7", 2).unwrap().minor(), 700);
    /// ```
    pub fn parse(input: &str, decimals: u32) -> Result<Self, CartError> {
        let invalid = || CartError::InvalidPrice(input.to_string());
        let trimmed = input.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) if !f.is_empty() => (w, f),
            Some(_) => return Err(invalid()),
            None => (trimmed, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }
        if fraction.len() > decimals as usize {
            return Err(invalid());
        }

        let scale = 10_u64.checked_pow(decimals).ok_or_else(invalid)?;
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        let fraction: u64 = if padded.is_empty() {
            0
        } else {
            padded.parse().map_err(|_| invalid())?
        };

        whole
            .checked_mul(scale)
            .and_then(|m| m.checked_add(fraction))
            .map(Price)
            .ok_or_else(invalid)
    }

    /// Price of `quantity` units.
    pub fn times(self, quantity: u32) -> Price {
        Price(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Saturating sum of two amounts.
    pub fn saturating_add(self, other: Price) -> Price {
        Price(self.0.saturating_add(other.0))
    }

    /// Format without a symbol (e.g., "49.99").
    pub fn display_amount(&self, currency: Currency) -> String {
        let places = currency.decimal_places();
        if places == 0 {
            return self.0.to_string();
        }
        let scale = 10_u64.pow(places);
        format!(
            "{}.{:0width$}",
            self.0 / scale,
            self.0 % scale,
            width = places as usize
        )
    }

    /// Format with the currency symbol (e.g., "€49.99").
    pub fn display(&self, currency: Currency) -> String {
        format!("{}{}", currency.symbol(), self.display_amount(currency))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Price::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Price::parse("10", 2).unwrap(), Price::from_minor(1000));
        assert_eq!(Price::parse("10.5", 2).unwrap(), Price::from_minor(1050));
        assert_eq!(Price::parse(" 0.05 ", 2).unwrap(), Price::from_minor(5));
        assert_eq!(Price::parse("120", 0).unwrap(), Price::from_minor(120));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-1", "+1", "1.", ".5", "1.234", "1,50", "abc", "1.2.3"] {
            assert!(Price::parse(bad, 2).is_err(), "accepted {:?}", bad);
        }
        assert!(Price::parse("1.5", 0).is_err());
        assert!(Price::parse("184467440737095516.16", 2).is_err());
    }

    #[test]
    fn test_display() {
        let p = Price::from_minor(4999);
        assert_eq!(p.display(Currency::EUR), "\u{20ac}49.99");
        assert_eq!(p.display(Currency::USD), "$49.99");
        assert_eq!(Price::from_minor(5).display_amount(Currency::EUR), "0.05");
        assert_eq!(Price::from_minor(100).display(Currency::JPY), "\u{00a5}100");
    }

    #[test]
    fn test_times_and_sum() {
        let p = Price::from_minor(250);
        assert_eq!(p.times(4), Price::from_minor(1000));
        assert_eq!(p.times(0), Price::ZERO);

        let total: Price = [p, p.times(2)].into_iter().sum();
        assert_eq!(total, Price::from_minor(750));
    }

    #[test]
    fn test_saturates() {
        let max = Price::from_minor(u64::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max.saturating_add(Price::from_minor(1)), max);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("EUR"), Ok(Currency::EUR));
        assert_eq!(Currency::from_code("usd"), Ok(Currency::USD));
        assert!(matches!(
            Currency::from_code("XYZ"),
            Err(CartError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_serializes_as_minor_units() {
        assert_eq!(serde_json::to_string(&Price::from_minor(1050)).unwrap(), "1050");
    }
}
