//! # Money Module
//!
//! Provides the `Money` type for rupee amounts.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Reverse GST in floating point:                                         │
//! │    118 / 1.18 = 99.99999999999999  ❌ then toFixed(2) hides it          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    11800 * 10000 / 11800 = 10000 paise = ₹100.00, exactly               │
//! │    Every rounding step is explicit and half-up                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The web UI and the sheets speak rupees as plain numbers (`118.5`).
//! `Money` serializes to that shape and accepts numbers or numeric strings
//! on input, converting to paise at the boundary.
//!
//! ## Usage
//! ```rust
//! use stockbill_core::money::Money;
//!
//! let rate = Money::from_paise(11800); // ₹118.00
//! let total = rate + Money::from_rupees(2); // ₹120.00
//! assert_eq!(total.to_string(), "₹120.00");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `rate - amount` stay representable
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: rupees as JSON numbers, paise in memory
///
/// ## Where Money Flows
/// ```text
/// StockItem.sale_price ──► InvoiceLineItem.rate ──► taxable_from_inclusive
///                                                        │
///                                                        ▼
///                          InvoiceLineItem.amount ──► aggregate_totals
///                                                        │
///                                                        ▼
///                                 Invoice.total_amount ──► amount_in_words
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from input, `₹999999999999.99`.
    ///
    /// Anything bigger cannot be written in words on an invoice. Parsing and
    /// deserialization reject amounts past it in either direction.
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use stockbill_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Whether the amount is within `±Money::MAX`.
    #[inline]
    pub const fn in_range(&self) -> bool {
        self.0 >= -Money::MAX.0 && self.0 <= Money::MAX.0
    }

    /// Addition that reports overflow instead of wrapping.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Addition that stops at the `i64` bounds.
    #[inline]
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Half of this amount, rounded half-up to the paisa.
    ///
    /// Used for the CGST/SGST split: ₹18.01 of tax becomes ₹9.01 + ₹9.01,
    /// one paisa more than the tax itself. That drift is accepted.
    ///
    /// ## Example
    /// ```rust
    /// use stockbill_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(1800).half().paise(), 900);
    /// assert_eq!(Money::from_paise(1801).half().paise(), 901);
    /// ```
    pub fn half(&self) -> Money {
        Money::from_paise(div_round_half_up(self.0 as i128, 2) as i64)
    }

    /// Rounds to whole rupees, half-up (`₹117.50` → `118`).
    ///
    /// Invoices print the grand total in words from this value.
    pub fn round_to_rupees(&self) -> i64 {
        div_round_half_up(self.0 as i128, 100) as i64
    }

    /// Returns the amount as floating point rupees.
    ///
    /// ## Note
    /// For the wire format and display only. Never compute with it.
    #[inline]
    pub fn as_rupees_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Converts floating point rupees to Money, rounding to the nearest paisa.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn from_rupees_f64(rupees: f64) -> Option<Self> {
        if !rupees.is_finite() {
            return None;
        }
        let paise = (rupees * 100.0).round();
        if paise.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Money(paise as i64))
    }
}

/// Integer division rounding half away from zero.
///
/// For the non-negative amounts this crate deals in, that is plain
/// round-half-up, the convention for printed currency.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    if numerator >= 0 {
        (2 * numerator + denominator) / (2 * denominator)
    } else {
        -((2 * -numerator + denominator) / (2 * denominator))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal rupee string exactly, without going through floats.
///
/// Accepts an optional sign, digits, and an optional fraction. Fractions
/// longer than two digits are rounded half-up on the third digit.
///
/// ## Example
/// ```rust
/// use stockbill_core::money::Money;
///
/// let m: Money = "118.005".parse().unwrap();
/// assert_eq!(m.paise(), 11801);
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a number", s),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut frac_digits = fraction.bytes().map(|b| (b - b'0') as i64);
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().map(|d| d >= 5).unwrap_or(false);

        let paise = whole_value
            .checked_mul(100)
            .and_then(|p| p.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(invalid)?;

        let money = Money(if negative { -paise } else { paise });
        if !money.in_range() {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is out of range", s),
            });
        }
        Ok(money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way invoices print it: `₹1234.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_rupees_f64())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a rupee amount as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .filter(Money::in_range)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .filter(Money::in_range)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        let money = Money::from_rupees_f64(v).ok_or_else(|| E::custom("amount is not finite"))?;
        if !money.in_range() {
            return Err(E::custom("amount out of range"));
        }
        Ok(money)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
