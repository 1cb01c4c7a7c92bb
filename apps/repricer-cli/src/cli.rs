//! Command-line arguments for the `repricer` binary.

use std::path::PathBuf;

use clap::Parser;
use repricer_core::PassMode;

use crate::config::RepricerConfig;

/// Plan a storefront pricing pass from exported GraphQL pages.
#[derive(Debug, Clone, Parser)]
#[command(name = "repricer", version, about)]
pub struct Cli {
    /// Exported GraphQL page(s): one response object or an array of them
    #[arg(short, long)]
    pub input: PathBuf,

    /// Config file (defaults to the platform config dir's repricer.toml)
    #[arg(short, long, env = "REPRICER_CONFIG")]
    pub config: Option<PathBuf>,

    /// force-cents | round-tiers | collection-discount
    #[arg(short, long)]
    pub mode: Option<PassMode>,

    /// 0.95 | 0.99 | no-cents
    #[arg(long)]
    pub ending: Option<String>,

    /// Tier block seed for two-digit prices
    #[arg(long)]
    pub block_size: Option<f64>,

    /// Collection discount rounding: none | force-cents | round-tiers
    #[arg(long)]
    pub rounding: Option<String>,

    /// Collection discount percent (1-95)
    #[arg(long = "discount")]
    pub discount_percent: Option<f64>,

    /// Collection GID for a discount campaign
    #[arg(long)]
    pub collection_id: Option<String>,

    /// Write the plan here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the plan JSON
    #[arg(long)]
    pub pretty: bool,

    /// Debug logging for the planner
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Applies flags on top of file and environment settings.
    pub fn apply_to(&self, config: &mut RepricerConfig) {
        if let Some(mode) = self.mode {
            config.pass.mode = Some(mode);
        }
        if let Some(ref ending) = self.ending {
            config.pass.ending = Some(ending.clone());
        }
        if let Some(size) = self.block_size {
            config.pass.block_size = Some(size);
        }
        if let Some(ref rounding) = self.rounding {
            config.pass.rounding = Some(rounding.clone());
        }
        if let Some(percent) = self.discount_percent {
            config.pass.discount_percent = Some(percent);
        }
        if let Some(ref id) = self.collection_id {
            config.pass.collection_id = Some(id.clone());
        }
        if self.pretty {
            config.output.pretty = true;
        }
    }
}
