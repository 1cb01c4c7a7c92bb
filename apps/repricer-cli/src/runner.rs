//! # Pass Runner
//!
//! Drives one pass over a list of snapshots and packages the result.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  snapshots ──► plan_variant() ──┬── Skip ────► summary.record_skip()    │
//! │                                 │                                       │
//! │                                 └── Update ──► BulkUpdateInput          │
//! │                                                summary.record_write()   │
//! │                                                                         │
//! │  PassReport + mutations ──► PlanEnvelope { runId, generatedAt, ... }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each planned update becomes its own `productVariantsBulkUpdate`
//! variables object with a single variant, so one rejected write never
//! takes its neighbours down with it.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use repricer_core::plan::plan_variant;
use repricer_core::{
    Money, PassReport, PassSummary, ResolvedPass, VariantDecision, VariantSnapshot, VariantUpdate,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CliError, CliResult};

// =============================================================================
// Mutation Variables
// =============================================================================

/// Variables for one `productVariantsBulkUpdate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateInput {
    pub product_id: String,
    pub variants: Vec<VariantInput>,
}

/// One entry of `ProductVariantsBulkInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
}

impl From<&VariantUpdate> for BulkUpdateInput {
    fn from(update: &VariantUpdate) -> Self {
        BulkUpdateInput {
            product_id: update.product_id.clone(),
            variants: vec![VariantInput {
                id: update.variant_id.clone(),
                price: update.price,
                compare_at_price: update.compare_at_price,
            }],
        }
    }
}

// =============================================================================
// Running a Pass
// =============================================================================

/// Report and mutations for one planned pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    pub report: PassReport,
    pub mutations: Vec<BulkUpdateInput>,
}

/// Plans every snapshot under `pass`.
///
/// Planned writes are counted as updated; the caller that actually sends
/// them is the one that learns about rejections.
pub fn run_pass(pass: &ResolvedPass, snapshots: &[VariantSnapshot]) -> PassOutcome {
    let mut summary = PassSummary::new();
    let mut mutations = Vec::new();

    for snapshot in snapshots {
        match plan_variant(pass, snapshot) {
            VariantDecision::Skip(reason) => {
                debug!(
                    variant_id = snapshot.variant_id.as_deref().unwrap_or("<none>"),
                    reason = reason.as_str(),
                    "Skipping variant"
                );
                summary.record_skip();
            }
            VariantDecision::Update(update) => {
                debug!(
                    variant_id = %update.variant_id,
                    price = ?update.price.map(|p| p.to_string()),
                    compare_at = ?update.compare_at_price.map(|p| p.to_string()),
                    "Planned update"
                );
                summary.record_write(&update.variant_id, &[]);
                mutations.push(BulkUpdateInput::from(&update));
            }
        }
    }

    info!(
        mode = %pass.mode(),
        variants = snapshots.len(),
        updated = summary.updated,
        skipped = summary.skipped,
        "Pass planned"
    );

    PassOutcome {
        report: PassReport::new(pass, summary),
        mutations,
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// What the planner writes: run metadata, the report and the mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEnvelope {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub report: PassReport,
    pub mutations: Vec<BulkUpdateInput>,
}

impl PlanEnvelope {
    pub fn new(run_id: Uuid, outcome: PassOutcome) -> Self {
        PlanEnvelope {
            run_id,
            generated_at: Utc::now(),
            report: outcome.report,
            mutations: outcome.mutations,
        }
    }

    pub fn to_json(&self, pretty: bool) -> CliResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Writes the envelope to `output`, or to stdout when no path is given.
pub fn write_envelope(envelope: &PlanEnvelope, output: Option<&Path>, pretty: bool) -> CliResult<()> {
    let json = envelope.to_json(pretty)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n")).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), mutations = envelope.mutations.len(), "Plan written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").map_err(CliError::Stdout)?;
        }
    }

    Ok(())
}
