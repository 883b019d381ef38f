//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic, percentage allocation and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Currency symbol used by `Display`
pub const DEFAULT_CURRENCY: &str = "€";

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use moneymate::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.cents(), 1050);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The share of this amount given by `percentage` (25.0 = 25%), rounded
    /// half away from zero to the cent
    ///
    /// ```
    /// use moneymate::models::Money;
    /// let total = Money::from_cents(200_000);
    /// assert_eq!(total.percentage(12.5).cents(), 25_000);
    /// ```
    pub fn percentage(&self, percentage: f64) -> Self {
        Self(((self.0 as f64) * percentage / 100.0).round() as i64)
    }

    /// Fraction of `whole` this amount represents; 0.0 when `whole` is zero
    pub fn ratio_of(&self, whole: Money) -> f64 {
        if whole.0 == 0 {
            0.0
        } else {
            self.0 as f64 / whole.0 as f64
        }
    }

    /// Clamp into `[min, max]`
    pub fn clamp_between(self, min: Money, max: Money) -> Self {
        if max < min {
            return min;
        }
        Self(self.0.clamp(min.0, max.0))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "10,50", "-10.50", "€10.50", "10.50 €", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped.trim())
        } else {
            (false, s)
        };

        let s = s
            .trim_start_matches(['€', '$'])
            .trim_end_matches(['€', '$'])
            .trim();
        let normalized = s.replace(',', ".");

        if normalized.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let cents = if let Some((units_str, cents_str)) = normalized.split_once('.') {
            if cents_str.contains('.') {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let units: i64 = if units_str.is_empty() {
                0
            } else {
                units_str
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };

            if !cents_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            // Pad or truncate cents to 2 digits
            let cents: i64 = match cents_str.len() {
                0 => 0,
                1 => cents_str
                    .parse::<i64>()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                    * 10,
                _ => cents_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(cents))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        } else {
            normalized
                .parse::<i64>()
                .ok()
                .and_then(|units| units.checked_mul(100))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }

    /// Plain decimal form without a symbol ("10.50"), as used in exports
    pub fn to_decimal_string(&self) -> String {
        self.format_with_symbol("")
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol(DEFAULT_CURRENCY))
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

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "€10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "€0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-€10.50");
        assert_eq!(Money::from_cents(5).format_with_symbol("$"), "$0.05");
        assert_eq!(Money::from_cents(123456).to_decimal_string(), "1234.56");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("10,50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("€10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("10.50 €").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(Money::parse("99999999999999999").is_err());
        assert!(Money::parse("99999999999999999.99").is_err());
        assert!(Money::parse("-99999999999999999").is_err());
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_percentage_rounds_to_cent() {
        let total = Money::from_cents(100_000);
        assert_eq!(total.percentage(25.0).cents(), 25_000);
        assert_eq!(Money::from_cents(1_001).percentage(50.0).cents(), 501);
        assert_eq!(Money::from_cents(33_333).percentage(33.3).cents(), 11_100);
        assert_eq!(total.percentage(0.0), Money::zero());
    }

    #[test]
    fn test_ratio_of() {
        let spent = Money::from_cents(800);
        assert!((spent.ratio_of(Money::from_cents(1000)) - 0.8).abs() < f64::EPSILON);
        assert_eq!(spent.ratio_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_clamp_between() {
        let limit = Money::from_cents(1000);
        assert_eq!(Money::from_cents(1500).clamp_between(Money::zero(), limit), limit);
        assert_eq!(Money::from_cents(-5).clamp_between(Money::zero(), limit), Money::zero());
        assert_eq!(Money::from_cents(500).clamp_between(Money::zero(), limit).cents(), 500);
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![Money::from_cents(100), Money::from_cents(200)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 300);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
