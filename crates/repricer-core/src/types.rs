//! # Pass Types
//!
//! Request, summary and report types shared by every pricing pass.
//!
//! ## Pass Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PassRequest (JSON body from the admin UI, loosely typed)              │
//! │       │                                                                 │
//! │       ▼  resolve(mode): defaults, clamps, required fields              │
//! │  ResolvedPass { ForceCents | RoundTiers | CollectionDiscount }         │
//! │       │                                                                 │
//! │       ▼  plan_variant() once per variant (see plan.rs)                  │
//! │  VariantDecision ──► caller writes ──► PassSummary (updated/skipped)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PassReport (JSON response body)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counters live in [`PassSummary`], owned by whoever drives the pass. The
//! engine keeps no tallies of its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::rules::{BlockSize, DiscountPercent, Ending, PricingPolicy, RoundingMode};
use crate::validation::{
    normalize_block_size, normalize_discount_percent, normalize_force_cents_ending,
    normalize_rounding, normalize_tier_ending, validate_collection_id, ValidationResult,
};

// =============================================================================
// Pass Mode
// =============================================================================

/// The three bulk pricing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum PassMode {
    /// Replace the cents of every variant price.
    ForceCents,

    /// Lift every variant price to the top of its tier.
    RoundTiers,

    /// Stamp a compare-at on every variant of one collection.
    CollectionDiscount,
}

impl PassMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PassMode::ForceCents => "force-cents",
            PassMode::RoundTiers => "round-tiers",
            PassMode::CollectionDiscount => "collection-discount",
        }
    }
}

impl fmt::Display for PassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "force-cents" => Ok(PassMode::ForceCents),
            "round-tiers" => Ok(PassMode::RoundTiers),
            "collection-discount" => Ok(PassMode::CollectionDiscount),
            other => Err(ValidationError::not_allowed(
                "mode",
                other,
                &["force-cents", "round-tiers", "collection-discount"],
            )),
        }
    }
}

// =============================================================================
// Skip Reason
// =============================================================================

/// Why a variant produced no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SkipReason {
    /// Variant id, product id or price missing from the record.
    MissingField,

    /// Price parsed to zero (malformed, zero or negative).
    NonPositivePrice,

    /// Stored values already match the targets.
    AlreadyConverged,
}

impl SkipReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingField => "missing-field",
            SkipReason::NonPositivePrice => "non-positive-price",
            SkipReason::AlreadyConverged => "already-converged",
        }
    }
}

// =============================================================================
// Pass Request
// =============================================================================

/// A field the UI may send either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Request body posted by the admin UI to start a pass.
///
/// Every field is optional and loosely typed; [`PassRequest::resolve`]
/// applies the same defaults the handlers always applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PassRequest {
    /// `"0.95"`, `"0.99"` or (force cents only) `"no-cents"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub ending: Option<String>,

    /// Tier seed; only a positive JSON number is honoured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub block_size: Option<NumberOrText>,

    /// Discount campaigns only: `"none"`, `"force-cents"` or `"round-tiers"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub rounding: Option<String>,

    /// Discount campaigns only: percent, clamped to `[1, 95]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub discount_percent: Option<NumberOrText>,

    /// Discount campaigns only: the collection GID. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub collection_id: Option<String>,
}

impl PassRequest {
    /// Normalizes the request for the given mode.
    ///
    /// ## Rules
    /// - force cents: ending `0.99` / `no-cents`, else `0.95`
    /// - round tiers: ending `0.99`, else `0.95`; block size default 5
    /// - collection discount: collection id required; discount clamped;
    ///   rounding falls back to `none`
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::rules::Ending;
    /// use repricer_core::types::{PassMode, PassRequest, ResolvedPass};
    ///
    /// let request = PassRequest {
    ///     ending: Some("no-cents".to_string()),
    ///     ..Default::default()
    /// };
    /// let pass = request.resolve(PassMode::ForceCents).unwrap();
    /// assert_eq!(pass, ResolvedPass::ForceCents { ending: Ending::NoCents });
    ///
    /// assert!(PassRequest::default().resolve(PassMode::CollectionDiscount).is_err());
    /// ```
    pub fn resolve(&self, mode: PassMode) -> ValidationResult<ResolvedPass> {
        let pass = match mode {
            PassMode::ForceCents => ResolvedPass::ForceCents {
                ending: normalize_force_cents_ending(self.ending.as_deref()),
            },
            PassMode::RoundTiers => ResolvedPass::RoundTiers {
                ending: normalize_tier_ending(self.ending.as_deref()),
                block_size: normalize_block_size(self.block_size.as_ref()),
            },
            PassMode::CollectionDiscount => ResolvedPass::CollectionDiscount {
                collection_id: validate_collection_id(self.collection_id.as_deref())?,
                discount: normalize_discount_percent(self.discount_percent.as_ref()),
                policy: PricingPolicy::new(
                    normalize_rounding(self.rounding.as_deref()),
                    normalize_tier_ending(self.ending.as_deref()),
                    normalize_block_size(self.block_size.as_ref()),
                ),
            },
        };
        Ok(pass)
    }
}

// =============================================================================
// Resolved Pass
// =============================================================================

/// A fully normalized pass, ready to plan variants against.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPass {
    ForceCents {
        ending: Ending,
    },
    RoundTiers {
        ending: Ending,
        block_size: BlockSize,
    },
    CollectionDiscount {
        collection_id: String,
        discount: DiscountPercent,
        policy: PricingPolicy,
    },
}

impl ResolvedPass {
    pub fn mode(&self) -> PassMode {
        match self {
            ResolvedPass::ForceCents { .. } => PassMode::ForceCents,
            ResolvedPass::RoundTiers { .. } => PassMode::RoundTiers,
            ResolvedPass::CollectionDiscount { .. } => PassMode::CollectionDiscount,
        }
    }

    /// The rounding policy this pass applies.
    pub fn policy(&self) -> PricingPolicy {
        match self {
            ResolvedPass::ForceCents { ending } => PricingPolicy::force_cents(*ending),
            ResolvedPass::RoundTiers { ending, block_size } => {
                PricingPolicy::round_tiers(*ending, *block_size)
            }
            ResolvedPass::CollectionDiscount { policy, .. } => *policy,
        }
    }
}

// =============================================================================
// Pass Summary
// =============================================================================

/// Running tallies for one pass, accumulated by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PassSummary {
    pub updated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

impl PassSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a variant that needed no write.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Counts the outcome of one write.
    ///
    /// An empty `user_errors` list is a success. Otherwise the variant is
    /// counted as skipped and the messages are kept for the report.
    ///
    /// ## Example
    /// ```rust
    /// use repricer_core::types::PassSummary;
    ///
    /// let mut summary = PassSummary::new();
    /// summary.record_write("gid://shopify/ProductVariant/1", &[]);
    /// summary.record_write(
    ///     "gid://shopify/ProductVariant/2",
    ///     &["Price must be positive".to_string(), "".to_string()],
    /// );
    ///
    /// assert_eq!(summary.updated, 1);
    /// assert_eq!(summary.skipped, 1);
    /// assert_eq!(
    ///     summary.errors,
    ///     vec!["Variant gid://shopify/ProductVariant/2: Price must be positive".to_string()]
    /// );
    /// ```
    pub fn record_write(&mut self, variant_id: &str, user_errors: &[String]) {
        if user_errors.is_empty() {
            self.updated += 1;
            return;
        }

        let messages: Vec<&str> = user_errors
            .iter()
            .map(String::as_str)
            .filter(|message| !message.is_empty())
            .collect();
        self.errors
            .push(format!("Variant {}: {}", variant_id, messages.join(", ")));
        self.skipped += 1;
    }
}

// =============================================================================
// Pass Report
// =============================================================================

/// Response body returned to the admin UI when a pass finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PassReport {
    pub ok: bool,
    pub mode: PassMode,
    pub ending: Ending,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub rounding: Option<RoundingMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub block_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub discount_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub collection_id: Option<String>,

    pub updated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

impl PassReport {
    /// Builds the report for a finished pass.
    pub fn new(pass: &ResolvedPass, summary: PassSummary) -> Self {
        let mut report = PassReport {
            ok: true,
            mode: pass.mode(),
            ending: pass.policy().ending,
            rounding: None,
            block_size: None,
            discount_percent: None,
            collection_id: None,
            updated: summary.updated,
            skipped: summary.skipped,
            errors: summary.errors,
        };

        match pass {
            ResolvedPass::ForceCents { .. } => {}
            ResolvedPass::RoundTiers { block_size, .. } => {
                report.block_size = Some(block_size.get());
            }
            ResolvedPass::CollectionDiscount {
                collection_id,
                discount,
                policy,
            } => {
                report.rounding = Some(policy.rounding);
                report.block_size = Some(policy.block_size.get());
                report.discount_percent = Some(discount.get());
                report.collection_id = Some(collection_id.clone());
            }
        }

        report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> PassRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_pass_mode_parsing() {
        assert_eq!("force-cents".parse::<PassMode>().unwrap(), PassMode::ForceCents);
        assert_eq!("ROUND-TIERS".parse::<PassMode>().unwrap(), PassMode::RoundTiers);
        assert_eq!(
            "collection-discount".parse::<PassMode>().unwrap(),
            PassMode::CollectionDiscount
        );
        assert!("discount".parse::<PassMode>().is_err());
    }

    #[test]
    fn test_force_cents_request_defaults() {
        let pass = PassRequest::default().resolve(PassMode::ForceCents).unwrap();
        assert_eq!(pass, ResolvedPass::ForceCents { ending: Ending::NinetyFive });

        let pass = request(r#"{"ending":"0.99"}"#).resolve(PassMode::ForceCents).unwrap();
        assert_eq!(pass, ResolvedPass::ForceCents { ending: Ending::NinetyNine });

        let pass = request(r#"{"ending":"0.42"}"#).resolve(PassMode::ForceCents).unwrap();
        assert_eq!(pass, ResolvedPass::ForceCents { ending: Ending::NinetyFive });
    }

    #[test]
    fn test_round_tiers_request() {
        let pass = request(r#"{"ending":"no-cents","blockSize":10.7}"#)
            .resolve(PassMode::RoundTiers)
            .unwrap();
        assert_eq!(
            pass,
            ResolvedPass::RoundTiers {
                ending: Ending::NinetyFive,
                block_size: BlockSize::new(10).unwrap(),
            }
        );

        let pass = request(r#"{"blockSize":"10"}"#)
            .resolve(PassMode::RoundTiers)
            .unwrap();
        assert_eq!(pass.policy().block_size, BlockSize::default());
    }

    #[test]
    fn test_collection_discount_request() {
        let pass = request(
            r#"{"collectionId":"gid://shopify/Collection/7","discountPercent":"80",
                "rounding":"force-cents","ending":"0.99","blockSize":5}"#,
        )
        .resolve(PassMode::CollectionDiscount)
        .unwrap();

        assert_eq!(pass.mode(), PassMode::CollectionDiscount);
        let policy = pass.policy();
        assert_eq!(policy.rounding, RoundingMode::ForceCents);
        assert_eq!(policy.ending, Ending::NinetyNine);
        match pass {
            ResolvedPass::CollectionDiscount {
                collection_id,
                discount,
                ..
            } => {
                assert_eq!(collection_id, "gid://shopify/Collection/7");
                assert_eq!(discount.get(), 80.0);
            }
            other => panic!("unexpected pass {other:?}"),
        }
    }

    #[test]
    fn test_collection_discount_requires_collection() {
        let err = request(r#"{"collectionId":"  ","discountPercent":20}"#)
            .resolve(PassMode::CollectionDiscount)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "collectionId".to_string()
            }
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = PassSummary::new();
        summary.record_skip();
        summary.record_write("v1", &[]);
        summary.record_write("v2", &["a".to_string(), "b".to_string()]);

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.errors, vec!["Variant v2: a, b".to_string()]);
    }

    #[test]
    fn test_report_shape_per_mode() {
        let summary = PassSummary {
            updated: 3,
            skipped: 1,
            errors: vec![],
        };

        let force = PassReport::new(
            &ResolvedPass::ForceCents {
                ending: Ending::NoCents,
            },
            summary.clone(),
        );
        let json = serde_json::to_value(&force).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ok": true,
                "mode": "force-cents",
                "ending": "no-cents",
                "updated": 3,
                "skipped": 1,
                "errors": []
            })
        );

        let discount = request(r#"{"collectionId":"c1","discountPercent":150}"#)
            .resolve(PassMode::CollectionDiscount)
            .unwrap();
        let json = serde_json::to_value(PassReport::new(&discount, summary)).unwrap();
        assert_eq!(json["mode"], "collection-discount");
        assert_eq!(json["rounding"], "none");
        assert_eq!(json["blockSize"], 5);
        assert_eq!(json["discountPercent"], 95.0);
        assert_eq!(json["collectionId"], "c1");
    }
}
