//! # Request Normalization
//!
//! Turns the loosely typed fields of a [`PassRequest`](crate::types::PassRequest)
//! into policy values.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field            Accepted                     Fallback                 │
//! │  ───────────────  ───────────────────────────  ─────────────────────   │
//! │  ending (cents)   0.95 | 0.99 | no-cents       0.95                     │
//! │  ending (tiers)   0.95 | 0.99                  0.95                     │
//! │  rounding         none | force-cents | tiers   none                     │
//! │  blockSize        JSON number >= 1 (floored)   5                        │
//! │  discountPercent  number or numeric text       clamp to [1, 95]         │
//! │  collectionId     non-blank text               ERROR (Required)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything except the collection id has a safe default, so these
//! functions only fail where no default exists.

use crate::error::ValidationError;
use crate::rules::{BlockSize, DiscountPercent, Ending, RoundingMode};
use crate::types::NumberOrText;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Endings
// =============================================================================

/// Ending for a force-cents pass; unknown values fall back to `.95`.
pub fn normalize_force_cents_ending(raw: Option<&str>) -> Ending {
    raw.and_then(|value| value.parse::<Ending>().ok())
        .unwrap_or_default()
}

/// Ending for tier and discount passes, where `no-cents` is not offered.
///
/// ## Example
/// ```rust
/// use repricer_core::rules::Ending;
/// use repricer_core::validation::normalize_tier_ending;
///
/// assert_eq!(normalize_tier_ending(Some("0.99")), Ending::NinetyNine);
/// assert_eq!(normalize_tier_ending(Some("no-cents")), Ending::NinetyFive);
/// assert_eq!(normalize_tier_ending(None), Ending::NinetyFive);
/// ```
pub fn normalize_tier_ending(raw: Option<&str>) -> Ending {
    normalize_force_cents_ending(raw).for_tiers()
}

// =============================================================================
// Rounding and Block Size
// =============================================================================

pub fn normalize_rounding(raw: Option<&str>) -> RoundingMode {
    raw.and_then(|value| value.parse::<RoundingMode>().ok())
        .unwrap_or_default()
}

/// Block size from a request.
///
/// Only a JSON number counts; it is floored, and anything below 1 (or text)
/// yields the default of 5.
pub fn normalize_block_size(raw: Option<&NumberOrText>) -> BlockSize {
    match raw {
        Some(NumberOrText::Number(size)) if size.is_finite() && *size >= 1.0 => {
            let floored = size.floor().min(f64::from(u32::MAX)) as u32;
            BlockSize::new(floored).unwrap_or_default()
        }
        _ => BlockSize::default(),
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Discount percent from a request, clamped into `[1, 95]`.
///
/// Numeric text is accepted. Missing or unparseable values count as `0`,
/// which clamps to the 1% floor.
///
/// ## Example
/// ```rust
/// use repricer_core::types::NumberOrText;
/// use repricer_core::validation::normalize_discount_percent;
///
/// let text = NumberOrText::Text(" 30 ".to_string());
/// assert_eq!(normalize_discount_percent(Some(&text)).get(), 30.0);
/// assert_eq!(normalize_discount_percent(Some(&NumberOrText::Number(120.0))).get(), 95.0);
/// assert_eq!(normalize_discount_percent(None).get(), 1.0);
/// ```
pub fn normalize_discount_percent(raw: Option<&NumberOrText>) -> DiscountPercent {
    let percent = match raw {
        Some(NumberOrText::Number(value)) => *value,
        Some(NumberOrText::Text(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };
    DiscountPercent::clamped(percent)
}

// =============================================================================
// Collection
// =============================================================================

/// Collection id for a discount campaign. Required; surrounding blanks are
/// trimmed.
pub fn validate_collection_id(raw: Option<&str>) -> ValidationResult<String> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ValidationError::Required {
            field: "collectionId".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
