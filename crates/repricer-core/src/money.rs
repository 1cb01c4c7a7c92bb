//! # Money Module
//!
//! Provides the `Money` type and the wire helpers every pricing handler uses.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  STOREFRONT API  ──"34.13"──►  parse_price  ──► Money(34.13)            │
//! │                                                    │                    │
//! │                                            rules / compare_at           │
//! │                                                    │                    │
//! │  STOREFRONT API  ◄──"34.99"──  format_price ◄── Money(34.99)            │
//! │                                                                         │
//! │  Parsing NEVER fails: garbage, NaN, negatives → Money(0)                │
//! │  Formatting ALWAYS has two decimals, half away from zero                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Float?
//! The platform hands prices over as decimal text and tier rounding works on
//! the integer part, so an `f64` carries the value between parse and format.
//! Every value the engine returns is snapped to whole cents first, which keeps
//! equality checks and the write tolerance honest.
//!
//! ## Usage
//! ```rust
//! use repricer_core::money::{format_price, parse_price, should_update};
//!
//! let stored = parse_price("34.95");
//! assert_eq!(format_price(stored), "34.95");
//! assert!(!should_update(stored, parse_price("34.9500005")));
//! assert_eq!(parse_price("not a price").amount(), 0.0);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::PRICE_TOLERANCE;

/// Tolerance used when taking the integer part of a price.
///
/// `7.0 / 0.2` is `34.99999999999999` in binary; without the nudge it would
/// floor to 34 instead of 35.
pub(crate) const FLOOR_EPSILON: f64 = 1e-9;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in major units (e.g. `34.95`).
///
/// ## Design Decisions
/// - **f64**: arithmetic happens on fractional ratios (`price / compareAt`)
/// - **Always finite**: constructors replace NaN and infinities with zero
/// - **Serde as text**: serializes to the two-decimal wire string and accepts
///   either text or numbers on the way in
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Money(f64);

impl Money {
    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0.0)
    }

    /// Creates a Money value from an amount in major units.
    ///
    /// Non-finite amounts become zero so `NaN` never leaves the engine.
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::money::Money;
    ///
    /// assert_eq!(Money::new(10.5).amount(), 10.5);
    /// assert_eq!(Money::new(f64::NAN).amount(), 0.0);
    /// ```
    #[inline]
    pub fn new(amount: f64) -> Self {
        if amount.is_finite() {
            Money(amount)
        } else {
            Money::zero()
        }
    }

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(3499), Money::new(34.99));
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(cents as f64 / 100.0)
    }

    /// Returns the amount in major units.
    #[inline]
    pub const fn amount(&self) -> f64 {
        self.0
    }

    /// Returns the amount in whole cents, rounding half away from zero.
    #[inline]
    pub fn cents(&self) -> i64 {
        (self.0 * 100.0).round() as i64
    }

    /// Snaps the amount to the nearest cent (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::money::Money;
    ///
    /// assert_eq!(Money::new(0.125).rounded(), Money::new(0.13));
    /// ```
    #[inline]
    pub fn rounded(&self) -> Self {
        let snapped = (self.0 * 100.0).round() / 100.0;
        // -0.0 would format as "-0.00"
        if snapped == 0.0 {
            Money::zero()
        } else {
            Money::new(snapped)
        }
    }

    /// Returns the integer part of the amount (`floor`, with float tolerance).
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::money::Money;
    ///
    /// assert_eq!(Money::new(34.13).whole_units(), 34.0);
    /// assert_eq!(Money::new(34.999_999_999_9).whole_units(), 35.0);
    /// ```
    #[inline]
    pub fn whole_units(&self) -> f64 {
        (self.0 + FLOOR_EPSILON).floor()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Returns true if `self` is above `other` by more than the write tolerance.
    #[inline]
    pub fn clears(&self, other: Money) -> bool {
        self.0 > other.0 + PRICE_TOLERANCE
    }
}

// =============================================================================
// Wire Helpers
// =============================================================================

/// Parses a decimal price string from the storefront API.
///
/// Never fails: text that is not a finite number yields `0`, and so do
/// negative amounts. Callers treat `0` as "skip this record".
///
/// ## Example
/// ```rust
/// use repricer_core::money::parse_price;
///
/// assert_eq!(parse_price(" 34.95 ").amount(), 34.95);
/// assert_eq!(parse_price("").amount(), 0.0);
/// assert_eq!(parse_price("NaN").amount(), 0.0);
/// assert_eq!(parse_price("-4.00").amount(), 0.0);
/// ```
pub fn parse_price(text: &str) -> Money {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Money(value),
        _ => Money::zero(),
    }
}

/// Formats a price for the storefront API: rounded to the cent, two decimals.
///
/// ## Example
/// ```rust
/// use repricer_core::money::{format_price, Money};
///
/// assert_eq!(format_price(Money::new(7.0)), "7.00");
/// assert_eq!(format_price(Money::new(174.750_000_000_01)), "174.75");
/// ```
pub fn format_price(value: Money) -> String {
    format!("{:.2}", value.rounded().0)
}

/// Decides whether a stored value is far enough from the target to write.
///
/// The sole gate for issuing a write: converged data produces no updates on
/// a second pass.
///
/// ## Example
/// ```rust
/// use repricer_core::money::{should_update, Money};
///
/// assert!(!should_update(Money::new(34.95), Money::new(34.950_000_5)));
/// assert!(should_update(Money::new(34.95), Money::new(35.00)));
/// ```
pub fn should_update(current: Money, target: Money) -> bool {
    (current.0 - target.0).abs() > PRICE_TOLERANCE
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the wire format (`"34.95"`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_price(*self))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money::new(self.0 + other.0)
    }
}

impl Add<f64> for Money {
    type Output = Self;

    #[inline]
    fn add(self, amount: f64) -> Self {
        Money::new(self.0 + amount)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money::new(self.0 - other.0)
    }
}

impl Mul<f64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: f64) -> Self {
        Money::new(self.0 * factor)
    }
}

/// Division by zero yields zero rather than infinity.
impl Div<f64> for Money {
    type Output = Self;

    #[inline]
    fn div(self, divisor: f64) -> Self {
        Money::new(self.0 / divisor)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_price(*self))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal price as text or number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        Ok(parse_price(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Ok(if value > 0.0 { Money::new(value) } else { Money::zero() })
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        self.visit_f64(value as f64)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        self.visit_f64(value as f64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
