//! # Money Module
//!
//! Provides the `Money` type for menu prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The remote menu sends prices as JSON numbers: 12.99                    │
//! │  As an f64 that is 12.9900000000000002131628...                         │
//! │                                                                         │
//! │  OUR SOLUTION: parse the decimal TEXT into integer cents                │
//! │    "12.99" → 1299 cents, exactly, every time                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lemon_core::money::Money;
//!
//! let price = Money::parse_decimal("12.99").unwrap();
//! assert_eq!(price.cents(), 1299);
//! assert_eq!(price.to_string(), "$12.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// How far an f64 amount may sit from a whole cent and still count as one.
const SUB_CENT_TOLERANCE: f64 = 1e-6;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use lemon_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Parses a non-negative decimal amount into cents.
    ///
    /// ## Accepted Forms
    /// ```text
    /// "12"      → 1200
    /// "12.5"    → 1250
    /// "12.99"   → 1299
    /// "12.990"  → 1299   (trailing zeros beyond cents are fine)
    /// "1.5e1"   → 1500   (exponent form)
    ///
    /// "-3"      → error (negative)
    /// "12.999"  → error (sub-cent precision)
    /// "1e-6"    → error (sub-cent precision, exponent form)
    /// "abc"     → error
    /// ```
    ///
    /// ## Why Text?
    /// Parsing the decimal digits avoids the f64 round trip. Exponent notation
    /// only shows up for very large or very small JSON numbers; those go
    /// through f64 and must land on a whole cent.
    pub fn parse_decimal(text: &str) -> CoreResult<Money> {
        let s = text.trim();
        let invalid = |reason: &str| CoreError::InvalidPrice {
            value: text.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if s.starts_with('-') {
            return Err(invalid("must not be negative"));
        }

        if s.contains(['e', 'E']) {
            let value: f64 = s.parse().map_err(|_| invalid("not a number"))?;
            if !value.is_finite() {
                return Err(invalid("not a finite number"));
            }
            let scaled = value * 100.0;
            let cents = scaled.round();
            if (scaled - cents).abs() > SUB_CENT_TOLERANCE {
                return Err(invalid("more than two decimal places"));
            }
            if cents > i64::MAX as f64 {
                return Err(invalid("too large"));
            }
            return Ok(Money(cents as i64));
        }

        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid("not a number"));
        }

        // Digits past the cent column must all be zero
        if fraction.len() > 2 && fraction[2..].chars().any(|c| c != '0') {
            return Err(invalid("more than two decimal places"));
        }

        let mut cents_text: String = fraction.chars().take(2).collect();
        while cents_text.len() < 2 {
            cents_text.push('0');
        }

        let whole: i64 = whole.parse().map_err(|_| invalid("too large"))?;
        let minor: i64 = cents_text.parse().map_err(|_| invalid("not a number"))?;

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("too large"))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as the menu prints it: `$12.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(Money::parse_decimal("12").unwrap().cents(), 1200);
        assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("12.99").unwrap().cents(), 1299);
        assert_eq!(Money::parse_decimal("12.990").unwrap().cents(), 1299);
        assert_eq!(Money::parse_decimal("0").unwrap().cents(), 0);
        assert_eq!(Money::parse_decimal(" 7.00 ").unwrap().cents(), 700);
        assert_eq!(Money::parse_decimal("1.5e1").unwrap().cents(), 1500);
    }

    #[test]
    fn test_parse_decimal_rejects() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("-3").is_err());
        assert!(Money::parse_decimal("12.999").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal(".5").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_decimal_exponent_form_needs_whole_cents() {
        assert_eq!(Money::parse_decimal("1.5e1").unwrap(), Money::from_cents(1500));
        assert_eq!(Money::parse_decimal("1.299E1").unwrap(), Money::from_cents(1299));

        let err = Money::parse_decimal("1e-6").unwrap_err();
        assert!(err.to_string().contains("more than two decimal places"));

        let err = Money::parse_decimal("1.2345e1").unwrap_err();
        assert!(err.to_string().contains("more than two decimal places"));
    }

    #[test]
    fn test_from_str_matches_parse() {
        let price: Money = "5.5".parse().unwrap();
        assert_eq!(price, Money::from_cents(550));
    }
}
