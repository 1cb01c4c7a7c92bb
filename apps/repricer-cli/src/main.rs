//! # Repricer
//!
//! Plans a force-cents, round-tiers or collection-discount pass from
//! exported GraphQL pages. The plan goes to stdout (or `--output`); logs go
//! to stderr.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use repricer_cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let envelope = repricer_cli::run(&cli).context("planning pass failed")?;

    info!(
        run_id = %envelope.run_id,
        updated = envelope.report.updated,
        skipped = envelope.report.skipped,
        "Done"
    );
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `--verbose` - Debug for the planner when `RUST_LOG` is unset
/// - Default: INFO level
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,repricer_cli=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
