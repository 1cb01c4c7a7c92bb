//! # Price Rules
//!
//! Endings, rounding modes and the two rounding algorithms.
//!
//! ## The Two Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FORCE CENTS (keep the integer, replace the cents)                      │
//! │    34.13  ── .99 ──►  34.99                                             │
//! │    34.13  ── no-cents ──►  34.00                                        │
//! │                                                                         │
//! │  ROUND TIERS (lift the integer to the top of its block, then cents)     │
//! │    block grows ×10 with every extra integer digit:                      │
//! │                                                                         │
//! │    digits │ block (seed 5) │ example                                    │
//! │    ───────┼────────────────┼────────────────────────                    │
//! │      1    │   (none)       │  7.20   →    7.95                          │
//! │      2    │      5         │  32.95  →   34.95   (30..34)               │
//! │      3    │     50         │  377.95 →  399.95   (350..399)             │
//! │      4    │    500         │  3232.95 → 3499.95  (3000..3499)           │
//! │      5    │   5000         │  32329   → 34999.95 (30000..34999)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;
use crate::{DEFAULT_BLOCK_SIZE, MAX_DISCOUNT_PERCENT, MIN_DISCOUNT_PERCENT};

// =============================================================================
// Ending
// =============================================================================

/// The fractional suffix a merchant wants every price to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Ending {
    /// `.95`
    #[default]
    #[serde(rename = "0.95")]
    NinetyFive,

    /// `.99`
    #[serde(rename = "0.99")]
    NinetyNine,

    /// Drop the cents entirely (`34.00`). Only meaningful for force cents.
    #[serde(rename = "no-cents")]
    NoCents,
}

impl Ending {
    /// Numeric value of the suffix.
    #[inline]
    pub const fn fraction(&self) -> f64 {
        match self {
            Ending::NinetyFive => 0.95,
            Ending::NinetyNine => 0.99,
            Ending::NoCents => 0.0,
        }
    }

    /// Wire name, as the admin UI sends it.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Ending::NinetyFive => "0.95",
            Ending::NinetyNine => "0.99",
            Ending::NoCents => "no-cents",
        }
    }

    /// The ending tier rounding actually applies.
    ///
    /// Tier rounding has no whole-number variant; `no-cents` falls back to
    /// `.95`, the same substitution the price screen makes before it calls
    /// the tier handler.
    #[inline]
    pub const fn for_tiers(self) -> Ending {
        match self {
            Ending::NoCents => Ending::NinetyFive,
            other => other,
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ending {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0.95" | ".95" => Ok(Ending::NinetyFive),
            "0.99" | ".99" => Ok(Ending::NinetyNine),
            "no-cents" | "0.00" | ".00" => Ok(Ending::NoCents),
            other => Err(ValidationError::not_allowed(
                "ending",
                other,
                &["0.95", "0.99", "no-cents"],
            )),
        }
    }
}

// =============================================================================
// Rounding Mode
// =============================================================================

/// Which rounding policy a pass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum RoundingMode {
    /// Pass-through (snapped to the cent only).
    #[default]
    None,

    /// Keep the integer part, replace the cents.
    ForceCents,

    /// Lift the integer part to the top of its digit-scaled block.
    RoundTiers,
}

impl RoundingMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::None => "none",
            RoundingMode::ForceCents => "force-cents",
            RoundingMode::RoundTiers => "round-tiers",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RoundingMode::None),
            "force-cents" => Ok(RoundingMode::ForceCents),
            "round-tiers" => Ok(RoundingMode::RoundTiers),
            other => Err(ValidationError::not_allowed(
                "rounding",
                other,
                &["none", "force-cents", "round-tiers"],
            )),
        }
    }
}

// =============================================================================
// Block Size
// =============================================================================

/// Tier granularity seed for two-digit prices (conventionally 5 or 10).
///
/// Scaled by `10^(digits - 2)` for longer prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BlockSize(u32);

impl BlockSize {
    /// Creates a block size; zero is rejected.
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::rules::BlockSize;
    ///
    /// assert_eq!(BlockSize::new(10).unwrap().get(), 10);
    /// assert!(BlockSize::new(0).is_err());
    /// ```
    pub fn new(size: u32) -> ValidationResult<Self> {
        if size == 0 {
            return Err(ValidationError::MustBePositive {
                field: "blockSize".to_string(),
            });
        }
        Ok(BlockSize(size))
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        BlockSize(DEFAULT_BLOCK_SIZE)
    }
}

// =============================================================================
// Discount Percent
// =============================================================================

/// Campaign discount in percent, always within `[1, 95]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DiscountPercent(f64);

impl DiscountPercent {
    /// Creates a discount, rejecting anything outside `[1, 95]`.
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::rules::DiscountPercent;
    ///
    /// assert!(DiscountPercent::new(80.0).is_ok());
    /// assert!(DiscountPercent::new(100.0).is_err());
    /// ```
    pub fn new(percent: f64) -> ValidationResult<Self> {
        if !percent.is_finite() || !(MIN_DISCOUNT_PERCENT..=MAX_DISCOUNT_PERCENT).contains(&percent)
        {
            return Err(ValidationError::OutOfRange {
                field: "discountPercent".to_string(),
                min: MIN_DISCOUNT_PERCENT,
                max: MAX_DISCOUNT_PERCENT,
            });
        }
        Ok(DiscountPercent(percent))
    }

    /// Clamps any number into range; non-finite input counts as `0` (→ 1%).
    pub fn clamped(percent: f64) -> Self {
        let percent = if percent.is_finite() { percent } else { 0.0 };
        DiscountPercent(percent.clamp(MIN_DISCOUNT_PERCENT, MAX_DISCOUNT_PERCENT))
    }

    #[inline]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// A rounding mode together with its ending and block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PricingPolicy {
    pub rounding: RoundingMode,
    pub ending: Ending,
    pub block_size: BlockSize,
}

impl PricingPolicy {
    pub fn new(rounding: RoundingMode, ending: Ending, block_size: BlockSize) -> Self {
        PricingPolicy {
            rounding,
            ending,
            block_size,
        }
    }

    /// Force-cents policy with the given ending.
    pub fn force_cents(ending: Ending) -> Self {
        PricingPolicy::new(RoundingMode::ForceCents, ending, BlockSize::default())
    }

    /// Tier policy with the given ending and block seed.
    pub fn round_tiers(ending: Ending, block_size: BlockSize) -> Self {
        PricingPolicy::new(RoundingMode::RoundTiers, ending, block_size)
    }

    /// Rounds a value under this policy.
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::money::Money;
    /// use repricer_core::rules::{BlockSize, Ending, PricingPolicy};
    ///
    /// let tiers = PricingPolicy::round_tiers(Ending::NinetyFive, BlockSize::default());
    /// assert_eq!(tiers.apply(Money::new(37.95)), Money::new(39.95));
    ///
    /// let cents = PricingPolicy::force_cents(Ending::NinetyNine);
    /// assert_eq!(cents.apply(Money::new(34.13)), Money::new(34.99));
    /// ```
    pub fn apply(&self, value: Money) -> Money {
        match self.rounding {
            RoundingMode::None => value.rounded(),
            RoundingMode::ForceCents => force_cents(value, self.ending),
            RoundingMode::RoundTiers => {
                round_to_tier_top_by_digits(value, self.ending, self.block_size)
            }
        }
    }

    /// True for the force-cents flavour that drops the cents.
    #[inline]
    pub fn drops_cents(&self) -> bool {
        self.rounding == RoundingMode::ForceCents && self.ending == Ending::NoCents
    }
}

// =============================================================================
// Rounding Algorithms
// =============================================================================

/// Keeps the integer part of `price` and replaces the cents with `ending`.
///
/// `floor(price) + ending`; with [`Ending::NoCents`] this is
/// [`strip_cents`]. Always returns the computed value, even when it equals
/// the input; skipping no-op writes is [`should_update`]'s job.
///
/// [`should_update`]: crate::money::should_update
///
/// ## Example
/// ```rust
/// use repricer_core::money::Money;
/// use repricer_core::rules::{force_cents, Ending};
///
/// assert_eq!(force_cents(Money::new(34.13), Ending::NinetyNine), Money::new(34.99));
/// assert_eq!(force_cents(Money::new(34.13), Ending::NoCents), Money::new(34.0));
/// ```
pub fn force_cents(price: Money, ending: Ending) -> Money {
    match ending {
        Ending::NoCents => strip_cents(price),
        _ => Money::new(price.whole_units() + ending.fraction()).rounded(),
    }
}

/// Drops the fractional part: `floor(price)`.
#[inline]
pub fn strip_cents(price: Money) -> Money {
    Money::new(price.whole_units())
}

/// Number of decimal digits in `n` (`0` has one digit).
///
/// ## Example
/// ```rust
/// use repricer_core::rules::count_int_digits;
///
/// assert_eq!(count_int_digits(0), 1);
/// assert_eq!(count_int_digits(99), 2);
/// assert_eq!(count_int_digits(3232), 4);
/// ```
#[inline]
pub fn count_int_digits(n: u64) -> u32 {
    if n < 10 {
        1
    } else {
        n.ilog10() + 1
    }
}

/// Rounds the integer part of `price` up to the last integer of its block,
/// then appends the ending.
///
/// ## Algorithm
/// 1. `int = floor(price)`; one-digit prices skip tiering: `int + ending`
/// 2. `block = blockSize × 10^(digits - 2)`
/// 3. `top = int - (int mod block) + block - 1`
/// 4. result = `top + ending`
///
/// Non-positive prices come back unchanged. [`Ending::NoCents`] is applied
/// as `.95` (see [`Ending::for_tiers`]).
///
/// ## Example
/// ```rust
/// use repricer_core::money::Money;
/// use repricer_core::rules::{round_to_tier_top_by_digits, BlockSize, Ending};
///
/// let five = BlockSize::default();
/// let round = |p: f64| round_to_tier_top_by_digits(Money::new(p), Ending::NinetyFive, five);
///
/// assert_eq!(round(32.95), Money::new(34.95));
/// assert_eq!(round(332.95), Money::new(349.95));
/// assert_eq!(round(3232.95), Money::new(3499.95));
/// ```
pub fn round_to_tier_top_by_digits(price: Money, ending: Ending, block_size: BlockSize) -> Money {
    if !price.is_positive() {
        return price;
    }

    let fraction = ending.for_tiers().fraction();
    let whole = price.whole_units();
    let int_part = whole as u64;
    let digits = count_int_digits(int_part);

    if digits <= 1 {
        return Money::new(whole + fraction).rounded();
    }

    let scale_pow = digits.saturating_sub(2);
    let scaled_block = 10u64
        .checked_pow(scale_pow)
        .and_then(|scale| scale.checked_mul(u64::from(block_size.get())));

    // Blocks wider than u64 cannot be tiered
    let Some(scaled_block) = scaled_block else {
        return Money::new(whole + fraction).rounded();
    };

    let base = int_part - (int_part % scaled_block);
    let mut top = base.saturating_add(scaled_block - 1);

    if top < int_part {
        top = base.saturating_add(2 * scaled_block - 1);
    }

    Money::new(top as f64 + fraction).rounded()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers(price: f64, block: u32) -> Money {
        round_to_tier_top_by_digits(
            Money::new(price),
            Ending::NinetyFive,
            BlockSize::new(block).unwrap(),
        )
    }

    #[test]
    fn test_force_cents_scenarios() {
        assert_eq!(force_cents(Money::new(34.13), Ending::NinetyNine), Money::new(34.99));
        assert_eq!(force_cents(Money::new(34.13), Ending::NinetyFive), Money::new(34.95));
        assert_eq!(force_cents(Money::new(34.99), Ending::NinetyFive), Money::new(34.95));
        assert_eq!(force_cents(Money::new(0.40), Ending::NinetyNine), Money::new(0.99));
    }

    #[test]
    fn test_force_cents_ending_property() {
        for cents in (1..200_000).step_by(7) {
            let price = Money::from_cents(cents);
            for (ending, suffix) in [(Ending::NinetyFive, 95), (Ending::NinetyNine, 99)] {
                let result = force_cents(price, ending);
                assert_eq!(result.cents() % 100, suffix, "price {price}");
                assert_eq!(result.whole_units(), price.whole_units(), "price {price}");
            }
        }
    }

    #[test]
    fn test_strip_cents() {
        assert_eq!(strip_cents(Money::new(34.13)), Money::new(34.0));
        assert_eq!(strip_cents(Money::new(34.0)), Money::new(34.0));
        assert_eq!(force_cents(Money::new(0.5), Ending::NoCents), Money::zero());
    }

    #[test]
    fn test_tier_scenarios_block_five() {
        assert_eq!(tiers(32.95, 5), Money::new(34.95));
        assert_eq!(tiers(37.95, 5), Money::new(39.95));
        assert_eq!(tiers(332.95, 5), Money::new(349.95));
        assert_eq!(tiers(377.95, 5), Money::new(399.95));
        assert_eq!(tiers(3232.95, 5), Money::new(3499.95));
    }

    #[test]
    fn test_tier_scenarios_block_ten() {
        assert_eq!(tiers(30.0, 10), Money::new(39.95));
        assert_eq!(tiers(45.10, 10), Money::new(49.95));
        assert_eq!(tiers(301.0, 10), Money::new(399.95));
        assert_eq!(tiers(4100.0, 10), Money::new(4999.95));
    }

    #[test]
    fn test_tier_five_plus_digits() {
        assert_eq!(tiers(32329.5, 5), Money::new(34999.95));
        assert_eq!(tiers(37000.0, 5), Money::new(39999.95));
        assert_eq!(tiers(123_456.0, 5), Money::new(149_999.95));
        assert_eq!(tiers(1_234_567.0, 10), Money::new(1_999_999.95));
    }

    #[test]
    fn test_tier_single_digit_skips_tiering() {
        assert_eq!(tiers(7.20, 5), Money::new(7.95));
        assert_eq!(tiers(0.5, 5), Money::new(0.95));
        assert_eq!(tiers(9.99, 10), Money::new(9.95));
    }

    #[test]
    fn test_tier_block_boundaries() {
        assert_eq!(tiers(34.99, 5), Money::new(34.95));
        assert_eq!(tiers(35.0, 5), Money::new(39.95));
        assert_eq!(tiers(99.95, 5), Money::new(99.95));
        assert_eq!(tiers(100.0, 5), Money::new(149.95));
    }

    #[test]
    fn test_tier_non_positive_passthrough() {
        assert_eq!(tiers(0.0, 5), Money::zero());
        assert_eq!(
            round_to_tier_top_by_digits(Money::new(-3.0), Ending::NinetyFive, BlockSize::default()),
            Money::new(-3.0)
        );
    }

    #[test]
    fn test_tier_no_cents_uses_ninety_five() {
        let result =
            round_to_tier_top_by_digits(Money::new(32.0), Ending::NoCents, BlockSize::default());
        assert_eq!(result, Money::new(34.95));
    }

    #[test]
    fn test_tier_oversized_block_falls_back_to_ending() {
        let huge = BlockSize::new(u32::MAX).unwrap();
        let price = Money::new(1_000_000_000_000_000.0);
        let result = round_to_tier_top_by_digits(price, Ending::NinetyNine, huge);
        assert!(result >= price);
    }

    #[test]
    fn test_tier_monotonic_and_on_block_top() {
        for cents in (1_000..2_000_000).step_by(13) {
            let price = Money::from_cents(cents);
            for block in [5u32, 10] {
                let result = tiers(price.amount(), block);
                let int_part = price.whole_units() as u64;
                let top = result.whole_units() as u64;
                let scaled = u64::from(block) * 10u64.pow(count_int_digits(int_part) - 2);

                assert!(top >= int_part, "price {price}");
                assert!(top - int_part < scaled, "price {price}");
                assert_eq!((top + 1) % scaled, 0, "price {price}");
                assert_eq!(result.cents() % 100, 95, "price {price}");
            }
        }
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let policies = [
            PricingPolicy::force_cents(Ending::NinetyFive),
            PricingPolicy::force_cents(Ending::NinetyNine),
            PricingPolicy::force_cents(Ending::NoCents),
            PricingPolicy::round_tiers(Ending::NinetyFive, BlockSize::default()),
            PricingPolicy::round_tiers(Ending::NinetyNine, BlockSize::new(10).unwrap()),
            PricingPolicy::default(),
        ];
        for cents in (1..500_000).step_by(37) {
            let price = Money::from_cents(cents);
            for policy in &policies {
                let once = policy.apply(price);
                assert_eq!(policy.apply(once), once, "{policy:?} at {price}");
            }
        }
    }

    #[test]
    fn test_ending_parsing() {
        assert_eq!("0.95".parse::<Ending>().unwrap(), Ending::NinetyFive);
        assert_eq!(".99".parse::<Ending>().unwrap(), Ending::NinetyNine);
        assert_eq!("no-cents".parse::<Ending>().unwrap(), Ending::NoCents);
        assert_eq!("0.00".parse::<Ending>().unwrap(), Ending::NoCents);
        assert!("0.50".parse::<Ending>().is_err());
    }

    #[test]
    fn test_rounding_mode_parsing() {
        assert_eq!("none".parse::<RoundingMode>().unwrap(), RoundingMode::None);
        assert_eq!("Force-Cents".parse::<RoundingMode>().unwrap(), RoundingMode::ForceCents);
        assert_eq!("round-tiers".parse::<RoundingMode>().unwrap(), RoundingMode::RoundTiers);
        assert!("ceil".parse::<RoundingMode>().is_err());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Ending::NoCents).unwrap(), "\"no-cents\"");
        assert_eq!(serde_json::to_string(&Ending::NinetyNine).unwrap(), "\"0.99\"");
        assert_eq!(
            serde_json::to_string(&RoundingMode::RoundTiers).unwrap(),
            "\"round-tiers\""
        );
    }

    #[test]
    fn test_discount_percent_bounds() {
        assert!(DiscountPercent::new(1.0).is_ok());
        assert!(DiscountPercent::new(95.0).is_ok());
        assert!(DiscountPercent::new(0.5).is_err());
        assert!(DiscountPercent::new(f64::NAN).is_err());

        assert_eq!(DiscountPercent::clamped(120.0).get(), 95.0);
        assert_eq!(DiscountPercent::clamped(-4.0).get(), 1.0);
        assert_eq!(DiscountPercent::clamped(f64::NAN).get(), 1.0);
        assert_eq!(DiscountPercent::clamped(37.5).get(), 37.5);
    }
}
