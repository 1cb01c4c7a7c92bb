//! # CLI Error Types
//!
//! Error types for the planner binary.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Planner Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Input       │  │       Output            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  ConfigParse    │  │  Read           │  │  Write                  │ │
//! │  │  InvalidConfig  │  │  InvalidPage    │  │  Encode                 │ │
//! │  │  Validation     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-variant problems are never errors: they become skips in the report.

use std::path::PathBuf;

use repricer_core::ValidationError;
use thiserror::Error;

/// Result type alias for planner operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Config file is not valid TOML for [`RepricerConfig`](crate::config::RepricerConfig).
    #[error("Failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config values that cannot drive a pass.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pass request rejected by the engine's normalization rules.
    #[error("Invalid pass request: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Export is not a GraphQL response page (or list of pages).
    #[error("Invalid GraphQL page in {}: {source}", .path.display())]
    InvalidPage {
        path: PathBuf,
        source: serde_json::Error,
    },

    // =========================================================================
    // Output Errors
    // =========================================================================
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write plan to stdout: {0}")]
    Stdout(#[source] std::io::Error),

    #[error("Failed to encode plan: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: CliError = ValidationError::Required {
            field: "collectionId".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid pass request: collectionId is required");
    }

    #[test]
    fn test_read_error_names_path() {
        let err = CliError::Read {
            path: PathBuf::from("pages.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to read pages.json: missing");
    }
}
