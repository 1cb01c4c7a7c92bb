//! # Compare-at Derivation
//!
//! Works out the "was" price shown next to a rounded price.
//!
//! ## Two Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICE PASSES (force cents / round tiers)                               │
//! │                                                                         │
//! │  compareAt absent or ≤ 0 ──────────────────► None (never invent one)    │
//! │  compareAt ≤ price, or price ≤ 0 ──────────► synthesize above target    │
//! │  otherwise:                                                             │
//! │     ratio = price / compareAt          e.g. 34.13 / 68.26 = 0.5         │
//! │     raw   = target / ratio             e.g. 34.99 / 0.5  = 69.98        │
//! │     round raw under the same policy    e.g. 69.99                       │
//! │                                                                         │
//! │  COLLECTION DISCOUNT (always stamps a compare-at)                       │
//! │                                                                         │
//! │     raw = price / (1 - D/100)          e.g. 34.95 / 0.2  = 174.75       │
//! │     round raw under the campaign policy                                 │
//! │                                                                         │
//! │  EVERY produced compare-at is at least one cent above its price.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::rules::{DiscountPercent, PricingPolicy, RoundingMode};

// =============================================================================
// Price Passes
// =============================================================================

/// Derives a compare-at consistent with a newly rounded price.
///
/// Returns `None` when the variant has no positive compare-at today.
/// Otherwise the result always clears `target_price` by more than the write
/// tolerance.
///
/// ## Example
/// ```rust
/// use repricer_core::compare_at::compute_compare_at_target;
/// use repricer_core::money::Money;
/// use repricer_core::rules::{Ending, PricingPolicy};
///
/// let policy = PricingPolicy::force_cents(Ending::NinetyNine);
/// let target = policy.apply(Money::new(34.13));
///
/// // Half-price relationship survives the rounding
/// let compare_at = compute_compare_at_target(
///     Money::new(34.13),
///     Some(Money::new(68.26)),
///     target,
///     &policy,
/// );
/// assert_eq!(compare_at, Some(Money::new(69.99)));
///
/// // No compare-at today, none tomorrow
/// assert_eq!(compute_compare_at_target(Money::new(34.13), None, target, &policy), None);
/// ```
pub fn compute_compare_at_target(
    current_price: Money,
    current_compare_at: Option<Money>,
    target_price: Money,
    policy: &PricingPolicy,
) -> Option<Money> {
    let current_compare_at = current_compare_at.filter(Money::is_positive)?;

    if !current_compare_at.clears(current_price) || !current_price.is_positive() {
        return Some(synthesize_above(target_price, policy));
    }

    let ratio = current_price.amount() / current_compare_at.amount();
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }

    let candidate = policy.apply(target_price / ratio);
    let corrections = correction_ladder(policy)
        .iter()
        .map(|bump| policy.apply(target_price + *bump));

    Some(first_clearing(
        target_price,
        std::iter::once(candidate).chain(corrections),
    ))
}

/// Builds a compare-at strictly above `target` when the stored relationship
/// is unusable (compare-at at or below price, or no price at all).
fn synthesize_above(target: Money, policy: &PricingPolicy) -> Money {
    let candidates = synthesis_ladder(policy)
        .iter()
        .map(|bump| policy.apply(target + *bump));

    first_clearing(target, candidates)
}

/// Bumps tried, in order, when synthesizing from a degenerate relationship.
fn synthesis_ladder(policy: &PricingPolicy) -> &'static [f64] {
    match policy.rounding {
        RoundingMode::RoundTiers => &[2.0, 5.0],
        RoundingMode::ForceCents | RoundingMode::None => &[1.0, 2.0],
    }
}

/// Bumps tried when the ratio-preserving candidate lands on the price.
fn correction_ladder(policy: &PricingPolicy) -> &'static [f64] {
    match policy.rounding {
        RoundingMode::RoundTiers => &[5.0],
        RoundingMode::ForceCents if !policy.drops_cents() => &[2.0],
        RoundingMode::ForceCents | RoundingMode::None => &[1.0],
    }
}

/// First candidate that clears `floor`, else one whole unit above it.
fn first_clearing(floor: Money, candidates: impl IntoIterator<Item = Money>) -> Money {
    candidates
        .into_iter()
        .find(|candidate| candidate.clears(floor))
        .unwrap_or_else(|| (floor + 1.0).rounded())
}

// =============================================================================
// Collection Discount
// =============================================================================

/// Raw compare-at implied by a discount: `price / (1 - D/100)`.
///
/// A discount of 100% or more has no finite answer; `price + 1` stands in.
///
/// ## Example
/// ```rust
/// use repricer_core::compare_at::compare_at_from_discount;
/// use repricer_core::money::Money;
///
/// let raw = compare_at_from_discount(Money::new(100.0), 20.0);
/// assert!((raw.amount() - 125.0).abs() < 1e-9);
///
/// assert_eq!(compare_at_from_discount(Money::new(10.0), 100.0), Money::new(11.0));
/// ```
pub fn compare_at_from_discount(price: Money, discount_percent: f64) -> Money {
    let denominator = 1.0 - discount_percent / 100.0;
    if !denominator.is_finite() || denominator <= 0.0 {
        return price + 1.0;
    }
    price / denominator
}

/// Rounded compare-at for a discount campaign.
///
/// Unlike [`compute_compare_at_target`] this always produces a value, even
/// for variants that never had a compare-at.
///
/// ## Example
/// ```rust
/// use repricer_core::compare_at::discount_compare_at_target;
/// use repricer_core::money::{format_price, Money};
/// use repricer_core::rules::{DiscountPercent, PricingPolicy};
///
/// let eighty = DiscountPercent::new(80.0).unwrap();
/// let target = discount_compare_at_target(Money::new(34.95), eighty, &PricingPolicy::default());
/// assert_eq!(format_price(target), "174.75");
/// ```
pub fn discount_compare_at_target(
    price: Money,
    discount: DiscountPercent,
    policy: &PricingPolicy,
) -> Money {
    let candidate = policy.apply(compare_at_from_discount(price, discount.get()));
    if candidate.clears(price) {
        return candidate;
    }

    let bumped = policy.apply(price + 2.0);
    let one_up = (price + 1.0).rounded();
    if bumped > one_up {
        bumped
    } else {
        one_up
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
