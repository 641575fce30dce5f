//! # Money Module
//!
//! Provides the `Money` type for sale amounts.
//!
//! ## Integer Amounts Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices, discounts and totals are whole numbers of the minor unit.     │
//! │                                                                         │
//! │    price 600 × qty 5 − discount 50 = 2,950                              │
//! │                                                                         │
//! │  No currency symbol, no decimal point, no rounding. The only display   │
//! │  concession is a thousands separator.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookstore_core::money::Money;
//!
//! let price = Money::from_minor(1200);
//! let total = price.multiply_quantity(3) - Money::from_minor(200);
//! assert_eq!(total.minor(), 3400);
//! assert_eq!(total.to_string(), "3,400");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: a discount larger than the line amount yields a
///   negative total, which is stored as-is
/// - **Single field tuple struct**: zero-cost wrapper over the stored column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(800);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 2400);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with `,` every three digits (`-1,234,567`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

        if self.0 < 0 {
            grouped.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        f.pad(&grouped)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_minor(0).to_string(), "0");
        assert_eq!(Money::from_minor(600).to_string(), "600");
        assert_eq!(Money::from_minor(1100).to_string(), "1,100");
        assert_eq!(Money::from_minor(123_456_789).to_string(), "123,456,789");
        assert_eq!(Money::from_minor(-2950).to_string(), "-2,950");
        assert_eq!(Money::from_minor(-100).to_string(), "-100");
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:>8}", Money::from_minor(1100)), "   1,100");
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::from_minor(500);

        assert_eq!(price.multiply_quantity(3).minor(), 1500);
        assert_eq!((price - Money::from_minor(1000)).minor(), -500);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_minor(750)).unwrap();
        assert_eq!(json, "750");
    }
}
