//! # Variant Planning
//!
//! Decides, one variant at a time, what a pass should write.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  VariantSnapshot (as read from the storefront)                          │
//! │       │                                                                 │
//! │       ├── id / product / price missing ─────► Skip(MissingField)        │
//! │       ├── parse_price(price) == 0 ──────────► Skip(NonPositivePrice)    │
//! │       │                                                                 │
//! │       ▼  targets from rules + compare_at                                │
//! │  should_update(current, target) for each field                          │
//! │       │                                                                 │
//! │       ├── nothing differs ──────────────────► Skip(AlreadyConverged)    │
//! │       └── otherwise ────────────────────────► Update(VariantUpdate)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Planning never fails. A record that cannot be priced is skipped and the
//! pass moves on.

use serde::{Deserialize, Serialize};

use crate::compare_at::{compute_compare_at_target, discount_compare_at_target};
use crate::money::{parse_price, should_update, Money};
use crate::rules::{DiscountPercent, PricingPolicy};
use crate::types::{ResolvedPass, SkipReason};

// =============================================================================
// Snapshot and Update
// =============================================================================

/// A variant as the storefront reports it. Prices stay as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSnapshot {
    pub variant_id: Option<String>,
    pub product_id: Option<String>,
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
}

/// Fields to write for one variant. `None` means "leave as is".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantUpdate {
    pub product_id: String,
    pub variant_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
}

/// Outcome of planning one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantDecision {
    Skip(SkipReason),
    Update(VariantUpdate),
}

impl VariantDecision {
    pub fn as_update(&self) -> Option<&VariantUpdate> {
        match self {
            VariantDecision::Update(update) => Some(update),
            VariantDecision::Skip(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            VariantDecision::Skip(reason) => Some(*reason),
            VariantDecision::Update(_) => None,
        }
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Plans one variant under a resolved pass.
pub fn plan_variant(pass: &ResolvedPass, snapshot: &VariantSnapshot) -> VariantDecision {
    match pass {
        ResolvedPass::CollectionDiscount {
            discount, policy, ..
        } => plan_collection_discount(snapshot, *discount, policy),
        ResolvedPass::ForceCents { .. } | ResolvedPass::RoundTiers { .. } => {
            plan_price_rounding(snapshot, &pass.policy())
        }
    }
}

/// Plans a force-cents or round-tiers write.
///
/// An update always carries the target price. The compare-at is included
/// only when the variant already had one and it moves.
///
/// ## Example
/// ```rust
/// use repricer_core::money::Money;
/// use repricer_core::plan::{plan_price_rounding, VariantSnapshot};
/// use repricer_core::rules::{Ending, PricingPolicy};
///
/// let snapshot = VariantSnapshot {
///     variant_id: Some("gid://shopify/ProductVariant/1".to_string()),
///     product_id: Some("gid://shopify/Product/1".to_string()),
///     price: Some("34.13".to_string()),
///     compare_at_price: Some("68.26".to_string()),
/// };
///
/// let decision = plan_price_rounding(&snapshot, &PricingPolicy::force_cents(Ending::NinetyNine));
/// let update = decision.as_update().unwrap();
/// assert_eq!(update.price, Some(Money::new(34.99)));
/// assert_eq!(update.compare_at_price, Some(Money::new(69.99)));
/// ```
pub fn plan_price_rounding(snapshot: &VariantSnapshot, policy: &PricingPolicy) -> VariantDecision {
    let Some((variant_id, product_id, price_text)) = required_fields(snapshot) else {
        return VariantDecision::Skip(SkipReason::MissingField);
    };

    let current_price = parse_price(price_text);
    if !current_price.is_positive() {
        return VariantDecision::Skip(SkipReason::NonPositivePrice);
    }

    let target_price = policy.apply(current_price);
    let current_compare_at = snapshot.compare_at_price.as_deref().map(parse_price);
    let target_compare_at =
        compute_compare_at_target(current_price, current_compare_at, target_price, policy);

    let compare_at_price = match (current_compare_at, target_compare_at) {
        (Some(current), Some(target)) if should_update(current, target) => Some(target),
        _ => None,
    };

    if !should_update(current_price, target_price) && compare_at_price.is_none() {
        return VariantDecision::Skip(SkipReason::AlreadyConverged);
    }

    VariantDecision::Update(VariantUpdate {
        product_id: product_id.to_string(),
        variant_id: variant_id.to_string(),
        price: Some(target_price),
        compare_at_price,
    })
}

/// Plans a collection-discount write. Only the compare-at is ever written.
pub fn plan_collection_discount(
    snapshot: &VariantSnapshot,
    discount: DiscountPercent,
    policy: &PricingPolicy,
) -> VariantDecision {
    let Some((variant_id, product_id, price_text)) = required_fields(snapshot) else {
        return VariantDecision::Skip(SkipReason::MissingField);
    };

    let price = parse_price(price_text);
    if !price.is_positive() {
        return VariantDecision::Skip(SkipReason::NonPositivePrice);
    }

    let target = discount_compare_at_target(price, discount, policy);
    let needs_write = match snapshot.compare_at_price.as_deref() {
        Some(current) => should_update(parse_price(current), target),
        None => true,
    };

    if !needs_write {
        return VariantDecision::Skip(SkipReason::AlreadyConverged);
    }

    VariantDecision::Update(VariantUpdate {
        product_id: product_id.to_string(),
        variant_id: variant_id.to_string(),
        price: None,
        compare_at_price: Some(target),
    })
}

/// Variant id, product id and price, each present and non-empty.
fn required_fields(snapshot: &VariantSnapshot) -> Option<(&str, &str, &str)> {
    fn present(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|value| !value.is_empty())
    }

    Some((
        present(&snapshot.variant_id)?,
        present(&snapshot.product_id)?,
        present(&snapshot.price)?,
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================
