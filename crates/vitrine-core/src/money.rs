//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The checkout applies a 5% PIX discount to the order total.             │
//! │  With floats, 200.00 × 0.95 can drift under repeated recomputation.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    20000 centavos × 9500 bps / 10000 = 19000 centavos, every time       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vitrine_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(1099); // R$ 10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                     // R$ 21.98
//! let total = price + Money::from_cents(500);  // R$ 15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos, BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for discount deltas
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::money::Money;
    ///
    /// let price = Money::from_reais(10, 99); // R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_reais(reais: i64, centavos: i64) -> Self {
        if reais < 0 {
            Money(reais * 100 - centavos)
        } else {
            Money(reais * 100 + centavos)
        }
    }

    /// Returns the value in centavos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-real portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // R$ 2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // R$ 8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates a percentage of this value, given in basis points.
    ///
    /// 1 basis point = 0.01% = 1/10000, so 500 bps = 5%.
    ///
    /// ## Implementation
    /// Integer math with half-up rounding: `(amount * bps + 5000) / 10000`.
    /// The intermediate product uses i128 to prevent overflow on large
    /// amounts.
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::money::Money;
    ///
    /// let total = Money::from_cents(20000); // R$ 200.00
    /// let discount = total.percentage_of(500); // 5%
    /// assert_eq!(discount.cents(), 1000); // R$ 10.00
    /// ```
    pub fn percentage_of(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(part as i64)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (500 = 5%)
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::money::Money;
    ///
    /// let total = Money::from_cents(20000); // R$ 200.00
    /// let discounted = total.apply_percentage_discount(500); // 5% off
    /// assert_eq!(discounted.cents(), 19000); // R$ 190.00
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        *self - self.percentage_of(discount_bps)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money the way the storefront renders it
/// ("R$ 10.99"). The order message composer relies on this format being
/// stable: the composed message must reproduce byte-for-byte.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {}.{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        assert_eq!(money.reais(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_reais() {
        let money = Money::from_reais(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_reais(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "R$ 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 99].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 449);
    }

    #[test]
    fn test_percentage_of_exact() {
        // R$ 200.00 at 5% = R$ 10.00
        let total = Money::from_cents(20000);
        assert_eq!(total.percentage_of(500).cents(), 1000);
    }

    #[test]
    fn test_percentage_of_rounds_half_up() {
        // 9999 centavos at 5% = 499.95 → 500
        let total = Money::from_cents(9999);
        assert_eq!(total.percentage_of(500).cents(), 500);

        // 101 centavos at 5% = 5.05 → 5
        let total = Money::from_cents(101);
        assert_eq!(total.percentage_of(500).cents(), 5);
    }

    #[test]
    fn test_percentage_discount() {
        let total = Money::from_cents(20000); // R$ 200.00
        let discounted = total.apply_percentage_discount(500); // 5%
        assert_eq!(discounted.cents(), 19000); // R$ 190.00
    }

    /// The discount must reproduce exactly under repeated computation.
    /// This is what integer centavos buy us over floating point.
    #[test]
    fn test_discount_is_stable_under_recomputation() {
        let total = Money::from_cents(14999);
        let first = total.apply_percentage_discount(500);
        for _ in 0..100 {
            assert_eq!(total.apply_percentage_discount(500), first);
        }
        assert_eq!(first + total.percentage_of(500), total);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.cents(), 897);
    }
}
