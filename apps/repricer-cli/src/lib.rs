//! # Repricer CLI
//!
//! Offline planner for storefront pricing passes.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Planner Modules                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  cli / config  │  │     input      │  │  runner                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • flags        │  │ • page parsing │  │ • plan every variant       ││
//! │  │ • repricer.toml│  │ • snapshots    │  │ • mutation variables       ││
//! │  │ • REPRICER_*   │  │                │  │ • output envelope          ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │                 repricer-core decides every price                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `REPRICER_CONFIG` - Config file path
//! - `REPRICER_MODE` - force-cents | round-tiers | collection-discount
//! - `REPRICER_ENDING` - 0.95 | 0.99 | no-cents
//! - `REPRICER_BLOCK_SIZE` - Tier block seed (default: 5)
//! - `REPRICER_ROUNDING` - Discount rounding (default: none)
//! - `REPRICER_DISCOUNT_PERCENT` - Discount percent, 1-95
//! - `REPRICER_COLLECTION_ID` - Collection GID for discount campaigns
//! - `RUST_LOG` - Log filter (default: info)

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod runner;

// Re-exports
pub use cli::Cli;
pub use config::RepricerConfig;
pub use error::{CliError, CliResult};
pub use runner::{PassOutcome, PlanEnvelope};

use repricer_core::ResolvedPass;
use tracing::info_span;
use uuid::Uuid;

use crate::input::{CollectionData, VariantsData};

/// Runs one planning pass end to end and writes the plan.
pub fn run(cli: &Cli) -> CliResult<PlanEnvelope> {
    let run_id = Uuid::new_v4();
    let span = info_span!("run", %run_id);
    let _guard = span.enter();

    let mut config = RepricerConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let pass = config.to_request().resolve(config.mode()?)?;

    let snapshots = match &pass {
        ResolvedPass::CollectionDiscount { collection_id, .. } => {
            let pages = input::load_pages::<CollectionData>(&cli.input)?;
            input::collection_snapshots(&pages, collection_id)
        }
        ResolvedPass::ForceCents { .. } | ResolvedPass::RoundTiers { .. } => {
            let pages = input::load_pages::<VariantsData>(&cli.input)?;
            input::variant_snapshots(&pages)
        }
    };

    let outcome = runner::run_pass(&pass, &snapshots);
    let envelope = PlanEnvelope::new(run_id, outcome);
    runner::write_envelope(&envelope, cli.output.as_deref(), config.output.pretty)?;

    Ok(envelope)
}
