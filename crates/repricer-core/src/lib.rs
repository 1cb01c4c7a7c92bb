//! # repricer-core: Pure Price Rules for Storefront Repricing
//!
//! This crate is the **heart** of the repricer. It decides what a variant's
//! price and compare-at price should become under a merchant's rounding
//! policy, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Repricer Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Admin UI (embedded storefront app)              │   │
//! │  │    Product prices ──► Collection discount ──► Result banner     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ POST (PassRequest)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Request handlers / repricer-cli                    │   │
//! │  │    paginate variants, send productVariantsBulkUpdate            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ one call per variant                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ repricer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   rules   │  │ compare_at │  │   plan    │  │   │
//! │  │   │  parse    │  │ endings   │  │  ratio     │  │ decisions │  │   │
//! │  │   │  format   │  │ tiers     │  │  discount  │  │ per item  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STATE • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type, wire parsing/formatting, write tolerance
//! - [`rules`] - Endings, rounding modes, block sizes, tier rounding
//! - [`compare_at`] - Compare-at derivation (ratio and discount flows)
//! - [`plan`] - Per-variant update decisions
//! - [`types`] - Pass requests, summaries and reports
//! - [`validation`] - Request normalization
//! - [`error`] - Validation error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no I/O
//! 2. **Never Abort a Batch**: malformed prices degrade to `0`, never panic
//! 3. **Idempotent Writes**: a converged variant produces no update
//! 4. **Compare-at Above Price**: every produced compare-at clears the price
//!
//! ## Example Usage
//!
//! ```rust
//! use repricer_core::money::{format_price, parse_price};
//! use repricer_core::rules::{round_to_tier_top_by_digits, BlockSize, Ending};
//!
//! let price = parse_price("377.95");
//! let target = round_to_tier_top_by_digits(price, Ending::NinetyFive, BlockSize::default());
//!
//! // 3 digits → block of 50 → 350..399 → 399.95
//! assert_eq!(format_price(target), "399.95");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compare_at;
pub mod error;
pub mod money;
pub mod plan;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::{format_price, parse_price, should_update, Money};
pub use plan::{VariantDecision, VariantSnapshot, VariantUpdate};
pub use rules::{BlockSize, DiscountPercent, Ending, PricingPolicy, RoundingMode};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Two values closer than this are the same price; no write is issued.
pub const PRICE_TOLERANCE: f64 = 0.0001;

/// Block size used when a request does not carry a positive one.
pub const DEFAULT_BLOCK_SIZE: u32 = 5;

/// Smallest discount a collection campaign may request.
pub const MIN_DISCOUNT_PERCENT: f64 = 1.0;

/// Largest discount a collection campaign may request.
///
/// ## Business Reason
/// Keeps `price / (1 - D)` finite and the compare-at believable.
pub const MAX_DISCOUNT_PERCENT: f64 = 95.0;
