//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. It parses user input that may
//! carry a currency sign, thousands separators or an exponent, and it is persisted as a plain JSON
//! number. A JSON number holds an `f64`, so `Amount::stored` gives the value that a write followed
//! by a read produces.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Currency signs that are accepted, and discarded, at the front of an amount.
const CURRENCY_SIGNS: &[char] = &['$', '₹', '€', '£'];

/// The largest amount an expense may have. Whole units up to here, with cents, fit an `f64`
/// exactly, and any number of them can be summed without overflowing a `Decimal`.
const MAX_WHOLE_UNITS: i64 = 1_000_000_000_000;

/// Exponents past this cannot produce a `Decimal` other than zero or an overflow.
const MAX_EXPONENT: u32 = 56;

/// Represents a sum of money in currency units.
///
/// Equality and ordering are numeric, so `50` and `50.00` are equal.
///
/// # Examples
///
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("₹1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1250.5");
/// assert_eq!(amount.grouped(), "1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The largest amount an expense may have.
    pub fn max() -> Self {
        Self(Decimal::from(MAX_WHOLE_UNITS))
    }

    /// The value this amount has after being written as a JSON number and read back, or `None`
    /// if it cannot be written as one.
    pub fn stored(&self) -> Option<Amount> {
        let number = self.to_number()?;
        Decimal::from_str(&number.to_string()).ok().map(Amount)
    }

    /// The nearest `f64`. Parsing the decimal text rounds correctly, which `Decimal::to_f64` does
    /// not promise.
    fn to_number(&self) -> Option<f64> {
        f64::from_str(&self.0.to_string())
            .ok()
            .filter(|f| f.is_finite())
    }

    /// Formats with two decimals and thousands separators, e.g. `1,250.50`.
    pub fn grouped(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.abs().round_dp(2).to_f64().unwrap_or_default();
        format!("{sign}{}", format_num::format_num!(",.2", abs))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(AmountErrorKind);

enum AmountErrorKind {
    Empty,
    Exponent,
    OutOfRange,
    Decimal(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => write!(f, "Empty"),
            AmountErrorKind::Exponent => write!(f, "Exponent"),
            AmountErrorKind::OutOfRange => write!(f, "OutOfRange"),
            AmountErrorKind::Decimal(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => write!(f, "no amount was given"),
            AmountErrorKind::Exponent => write!(f, "the exponent is not a whole number"),
            AmountErrorKind::OutOfRange => write!(f, "the number is out of range"),
            AmountErrorKind::Decimal(e) => Display::fmt(e, f),
        }
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.0 {
            AmountErrorKind::Decimal(e) => Some(e),
            _ => None,
        }
    }
}

impl AmountError {
    /// True if the input was empty or only whitespace.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, AmountErrorKind::Empty)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError(AmountErrorKind::Empty));
        }

        // "-₹50" and "₹-50" are both accepted
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.trim_start_matches(CURRENCY_SIGNS);
        let without_commas = rest.replace(',', "");
        let signed = if negative {
            format!("-{without_commas}")
        } else {
            without_commas
        };

        parse_decimal(&signed).map(Amount)
    }
}

/// Parses plain decimal text, or a mantissa and exponent such as `1.5e3`.
fn parse_decimal(s: &str) -> Result<Decimal, AmountError> {
    let decimal =
        |s: &str| Decimal::from_str(s).map_err(|e| AmountError(AmountErrorKind::Decimal(e)));
    let Some((mantissa, exponent)) = s.split_once(|c: char| c == 'e' || c == 'E') else {
        return decimal(s);
    };
    let mut value = decimal(mantissa)?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| AmountError(AmountErrorKind::Exponent))?;
    if exponent.unsigned_abs() > MAX_EXPONENT {
        return Err(AmountError(AmountErrorKind::OutOfRange));
    }
    for _ in 0..exponent.unsigned_abs() {
        let next = if exponent > 0 {
            value.checked_mul(Decimal::TEN)
        } else {
            value.checked_div(Decimal::TEN)
        };
        value = next.ok_or(AmountError(AmountErrorKind::OutOfRange))?;
    }
    Ok(value)
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0.normalize(), f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Stored as a JSON number
        match self.to_number() {
            Some(f) => serializer.serialize_f64(f),
            None => Err(serde::ser::Error::custom(format!(
                "Amount {} cannot be represented as a number",
                self.0
            ))),
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a number or a numeric string")
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
        // The shortest decimal text for an f64 is the text it was written from
        Decimal::from_str(&v.to_string())
            .map(Amount)
            .map_err(E::custom)
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50"));
    }

    #[test]
    fn test_parse_with_currency_sign() {
        assert_eq!(Amount::from_str("₹50").unwrap().value(), dec("50"));
        assert_eq!(Amount::from_str("$12.25").unwrap().value(), dec("12.25"));
    }

    #[test]
    fn test_parse_negative_with_currency_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), dec("-50"));
        assert!(amount.is_negative());
    }

    #[test]
    fn test_parse_whitespace_and_commas() {
        let amount = Amount::from_str("  1,234,567.89  ").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_empty_string() {
        let e = Amount::from_str("   ").unwrap_err();
        assert!(e.is_empty());
    }

    #[test]
    fn test_parse_not_a_number() {
        let e = Amount::from_str("abc").unwrap_err();
        assert!(!e.is_empty());
        assert!(Amount::from_str("12x").is_err());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(
            Amount::from_str("50").unwrap(),
            Amount::from_str("50.00").unwrap()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::from_str("50.00").unwrap().to_string(), "50");
        assert_eq!(Amount::from_str("12.50").unwrap().to_string(), "12.5");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(Amount::from_str("1234.5").unwrap().grouped(), "1,234.50");
        assert_eq!(Amount::from_str("0.1").unwrap().grouped(), "0.10");
        assert_eq!(Amount::from_str("-60000").unwrap().grouped(), "-60,000.00");
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Amount::from_str("30.25").unwrap()).unwrap();
        assert_eq!(json, "30.25");
    }

    #[test]
    fn test_deserialize_number_forms() {
        let a: Amount = serde_json::from_str("50").unwrap();
        assert_eq!(a.value(), dec("50"));
        let b: Amount = serde_json::from_str("0.1").unwrap();
        assert_eq!(b.value(), dec("0.1"));
        let c: Amount = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(c.value(), dec("19.99"));
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        for s in ["0.1", "19.99", "50", "1234567.89", "0.01"] {
            let a = Amount::from_str(s).unwrap();
            let json = serde_json::to_string(&a).unwrap();
            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(a, back, "{s} did not round trip through {json}");
        }
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(Amount::from_str("1e3").unwrap().value(), dec("1000"));
        assert_eq!(Amount::from_str("2.5E-1").unwrap().value(), dec("0.25"));
        assert_eq!(Amount::from_str("$1.5e2").unwrap().value(), dec("150"));
        assert!(Amount::from_str("1e").is_err());
        assert!(Amount::from_str("1e1.5").is_err());
        assert!(Amount::from_str("e3").is_err());
    }

    #[test]
    fn test_parse_exponent_out_of_range() {
        assert!(Amount::from_str("1e29").is_err());
        assert!(Amount::from_str("1e1000").is_err());
        assert!(Amount::from_str("1e-1000").is_err());
    }

    #[test]
    fn test_stored_keeps_short_amounts() {
        for s in ["50", "0.1", "19.99", "1234567.89", "1000000000000"] {
            let a = Amount::from_str(s).unwrap();
            assert_eq!(a.stored(), Some(a), "{s}");
        }
    }

    #[test]
    fn test_stored_rounds_to_number_precision() {
        let a = Amount::from_str("0.12345678901234567891").unwrap();
        let stored = a.stored().unwrap();
        assert_eq!(stored.value(), dec("0.12345678901234568"));
        assert_eq!(stored.stored(), Some(stored));

        let json = serde_json::to_string(&stored).unwrap();
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn test_stored_at_max() {
        assert_eq!(Amount::max().stored(), Some(Amount::max()));
        let cents = Amount::from_str("999999999999.99").unwrap();
        assert_eq!(cents.stored(), Some(cents));
    }

    #[test]
    fn test_ordering() {
        assert!(Amount::from_str("30").unwrap() < Amount::from_str("50").unwrap());
    }
}
