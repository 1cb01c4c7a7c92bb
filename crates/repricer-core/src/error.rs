//! # Error Types
//!
//! Error types for repricer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  repricer-core errors (this file)                                      │
//! │  └── ValidationError  - Request values that cannot be normalized       │
//! │                                                                         │
//! │  repricer-cli errors (separate crate)                                  │
//! │  └── CliError         - Config, input and output failures              │
//! │                                                                         │
//! │  The engine itself has NO error type: malformed prices become 0,       │
//! │  impossible compare-ats become "no change".                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by strict parsers (`FromStr` on the policy enums) and by the
/// request rules that have no safe default, such as a missing collection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}, got '{value}'")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

impl ValidationError {
    pub(crate) fn not_allowed(field: &str, value: &str, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "collectionId".to_string(),
        };
        assert_eq!(err.to_string(), "collectionId is required");

        let err = ValidationError::OutOfRange {
            field: "discountPercent".to_string(),
            min: 1.0,
            max: 95.0,
        };
        assert_eq!(err.to_string(), "discountPercent must be between 1 and 95");
    }

    #[test]
    fn test_not_allowed_lists_choices() {
        let err = ValidationError::not_allowed("ending", "0.50", &["0.95", "0.99"]);
        assert_eq!(
            err.to_string(),
            "ending must be one of: [\"0.95\", \"0.99\"], got '0.50'"
        );
    }
}
