//! Money type for representing currency amounts
//!
//! Internally stores amounts as an exact decimal to avoid floating-point
//! rounding drift across repeated summation. The canonical string form of the
//! decimal is what gets persisted.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Represents a monetary amount as an exact decimal
///
/// Serialized transparently as the canonical decimal string, so amounts
/// survive round-trips through the data file without precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// A zero amount
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Parse a money amount from user input
    ///
    /// Strips thousands separators and a leading currency symbol, then parses
    /// the remainder as an exact decimal. Negative amounts are allowed
    /// (refunds); negative zero is normalized to plain zero.
    ///
    /// Accepts formats: "10.50", "-10.50", "$1,234.56", "-$10", "10"
    pub fn parse(input: &str) -> LedgerResult<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(LedgerError::InvalidAmount("amount required".into()));
        }

        let cleaned = s.replace(',', "");
        let cleaned = if let Some(rest) = cleaned.strip_prefix('$') {
            rest.to_string()
        } else if let Some(rest) = cleaned.strip_prefix("-$") {
            format!("-{}", rest)
        } else {
            cleaned
        };

        let mut value = Decimal::from_str(&cleaned)
            .map_err(|_| LedgerError::InvalidAmount(input.trim().to_string()))?;

        if value.is_zero() && value.is_sign_negative() {
            value.set_sign_positive(true);
        }

        Ok(Self(value))
    }

    /// The canonical string form used for storage and dedup keys
    ///
    /// `parse` is a fixed point over this form and preserves numeric value.
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Average of a total over `count` entries, rounded to two fraction
    /// digits; zero when `count` is zero
    pub fn average(total: Money, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money((total.0 / Decimal::from(count as u64)).round_dp(2))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

/// Fixed two-fraction-digit, thousands-grouped display form
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2);
        let plain = format!("{:.2}", rounded);
        let (sign, digits) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        // Split off ".NN" and group the integer digits in threes
        let (int_part, frac_part) = digits.split_at(digits.len() - 3);
        let mut grouped = String::new();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{}{}{}", sign, grouped, frac_part)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().canonical(), "10.50");
        assert_eq!(Money::parse("$10.50").unwrap().canonical(), "10.50");
        assert_eq!(Money::parse("-10.50").unwrap().canonical(), "-10.50");
        assert_eq!(Money::parse("-$10").unwrap().canonical(), "-10");
        assert_eq!(Money::parse("1,234.56").unwrap().canonical(), "1234.56");
        assert_eq!(Money::parse("  7.00 ").unwrap().canonical(), "7.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("   ").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12.3.4").is_err());
    }

    #[test]
    fn test_negative_zero_normalized() {
        let m = Money::parse("-0").unwrap();
        assert!(m.is_zero());
        assert!(!m.is_negative());
        assert!(!m.canonical().starts_with('-'));
    }

    #[test]
    fn test_canonical_fixed_point() {
        for s in ["12.50", "0.05", "-4.50", "1234.56", "19.50", "0"] {
            let once = Money::parse(s).unwrap().canonical();
            let twice = Money::parse(&once).unwrap().canonical();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_canonical_preserves_value() {
        let m = Money::parse("$1,234.56").unwrap();
        let reparsed = Money::parse(&m.canonical()).unwrap();
        assert_eq!(m, reparsed);
        assert_eq!(reparsed.0, dec!(1234.56));
    }

    #[test]
    fn test_display_grouped() {
        assert_eq!(Money::parse("1234567.891").unwrap().to_string(), "1,234,567.89");
        assert_eq!(Money::parse("12.5").unwrap().to_string(), "12.50");
        assert_eq!(Money::parse("-4.5").unwrap().to_string(), "-4.50");
        assert_eq!(Money::parse("0").unwrap().to_string(), "0.00");
        assert_eq!(Money::parse("999").unwrap().to_string(), "999.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::parse("12.50").unwrap();
        let b = Money::parse("7.00").unwrap();

        assert_eq!((a + b).canonical(), "19.50");
        assert_eq!((b - a).canonical(), "-5.50");
        assert_eq!((-a).canonical(), "-12.50");
    }

    #[test]
    fn test_repeated_summation_is_exact() {
        let total: Money = std::iter::repeat(Money::parse("0.10").unwrap())
            .take(1000)
            .sum();
        assert_eq!(total, Money::parse("100").unwrap());
    }

    #[test]
    fn test_average() {
        let total = Money::parse("19.50").unwrap();
        assert_eq!(Money::average(total, 2).canonical(), "9.75");
        assert_eq!(Money::average(total, 3).canonical(), "6.5");
        assert_eq!(Money::average(Money::zero(), 0), Money::zero());
    }

    #[test]
    fn test_serialization_is_canonical_string() {
        let m = Money::parse("12.50").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"12.50\"");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
