//! # Planner Configuration
//!
//! Configuration for a planning run.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     repricer --mode round-tiers --block-size 10                        │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     REPRICER_MODE=force-cents                                          │
//! │     REPRICER_ENDING=0.99                                               │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/repricer/repricer.toml (Linux)                           │
//! │     ~/Library/Application Support/com.repricer.repricer/ (macOS)       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     ending 0.95, block size 5, rounding none                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # repricer.toml
//! [pass]
//! mode = "collection-discount"   # force-cents | round-tiers | collection-discount
//! ending = "0.95"                # 0.95 | 0.99 | no-cents
//! block_size = 5
//! rounding = "round-tiers"       # none | force-cents | round-tiers
//! discount_percent = 30
//! collection_id = "gid://shopify/Collection/123"
//!
//! [output]
//! pretty = true
//! ```
//!
//! Unlike the admin UI request body, a config file is checked strictly:
//! a typo in `ending` is an error, not a silent `.95`.

use std::path::{Path, PathBuf};

use repricer_core::{BlockSize, DiscountPercent, Ending, NumberOrText, PassMode, PassRequest, RoundingMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// Default config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "repricer.toml";

// =============================================================================
// Config Sections
// =============================================================================

/// `[pass]` section: which pass to run and its policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PassMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Pretty-print the plan JSON.
    #[serde(default)]
    pub pretty: bool,
}

/// Complete planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepricerConfig {
    #[serde(default)]
    pub pass: PassSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

impl RepricerConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`repricer.toml`)
    /// 3. Environment variables
    ///
    /// An explicit path must exist. The default path is optional.
    /// Command-line flags and [`validate`](Self::validate) come after this.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(path = %path.display(), "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(path = %path.display(), "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `REPRICER_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("REPRICER_MODE") {
            match mode.parse::<PassMode>() {
                Ok(parsed) => {
                    debug!(mode = %parsed, "Overriding pass mode from environment");
                    self.pass.mode = Some(parsed);
                }
                Err(e) => warn!(error = %e, "Ignoring REPRICER_MODE"),
            }
        }

        if let Some(ending) = lookup("REPRICER_ENDING") {
            self.pass.ending = Some(ending);
        }

        if let Some(size) = lookup("REPRICER_BLOCK_SIZE") {
            match size.trim().parse::<f64>() {
                Ok(parsed) => self.pass.block_size = Some(parsed),
                Err(_) => warn!(value = %size, "Ignoring non-numeric REPRICER_BLOCK_SIZE"),
            }
        }

        if let Some(rounding) = lookup("REPRICER_ROUNDING") {
            self.pass.rounding = Some(rounding);
        }

        if let Some(percent) = lookup("REPRICER_DISCOUNT_PERCENT") {
            match percent.trim().parse::<f64>() {
                Ok(parsed) => self.pass.discount_percent = Some(parsed),
                Err(_) => warn!(value = %percent, "Ignoring non-numeric REPRICER_DISCOUNT_PERCENT"),
            }
        }

        if let Some(id) = lookup("REPRICER_COLLECTION_ID") {
            debug!(collection_id = %id, "Overriding collection from environment");
            self.pass.collection_id = Some(id);
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        let mode = self.mode()?;

        if let Some(ref ending) = self.pass.ending {
            let parsed = ending.parse::<Ending>()?;
            if parsed == Ending::NoCents && mode != PassMode::ForceCents {
                return Err(CliError::InvalidConfig(format!(
                    "ending no-cents is only available for force-cents, not {}",
                    mode
                )));
            }
        }

        if let Some(ref rounding) = self.pass.rounding {
            rounding.parse::<RoundingMode>()?;
        }

        if let Some(size) = self.pass.block_size {
            if !size.is_finite() || size.fract() != 0.0 || size < 0.0 || size > f64::from(u32::MAX) {
                return Err(CliError::InvalidConfig(format!(
                    "block_size must be a whole number, got {}",
                    size
                )));
            }
            BlockSize::new(size as u32)?;
        }

        if let Some(percent) = self.pass.discount_percent {
            DiscountPercent::new(percent)?;
        }

        Ok(())
    }

    /// Returns the configured pass mode.
    pub fn mode(&self) -> CliResult<PassMode> {
        self.pass.mode.ok_or_else(|| {
            CliError::InvalidConfig("pass mode is required (--mode or [pass] mode)".into())
        })
    }

    /// Builds the request body the admin UI would have posted.
    pub fn to_request(&self) -> PassRequest {
        PassRequest {
            ending: self.pass.ending.clone(),
            block_size: self.pass.block_size.map(NumberOrText::Number),
            rounding: self.pass.rounding.clone(),
            discount_percent: self.pass.discount_percent.map(NumberOrText::Number),
            collection_id: self.pass.collection_id.clone(),
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "repricer", "repricer")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
