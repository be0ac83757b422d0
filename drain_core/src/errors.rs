//! # Error Types
//!
//! Structured error types for drain_core. Errors carry enough context for a
//! caller (human, UI or LLM) to understand which input was rejected and why.
//!
//! Most of the engine degrades gracefully instead of failing: an unmet
//! hydraulic constraint falls back to the largest catalog diameter and an
//! unmatched rate lookup falls back to a default unit price. Errors are
//! reserved for inputs that would make the arithmetic meaningless.
//!
//! ## Example
//!
//! ```rust
//! use drain_core::errors::{DrainError, DrainResult};
//!
//! fn validate_pipes(num_pipes: usize) -> DrainResult<()> {
//!     if num_pipes == 0 {
//!         return Err(DrainError::invalid_input(
//!             "num_pipes",
//!             "0",
//!             "At least one pipe segment is required",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for drain_core operations
pub type DrainResult<T> = Result<T, DrainError>;

/// Structured error type for drainage design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DrainError {
    /// An input value is invalid (out of range, degenerate, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An aggregate was requested over a network with no pipe segments
    #[error("Network has no pipe segments")]
    EmptyNetwork,

    /// Design configuration could not be read or is inconsistent
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DrainError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DrainError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        DrainError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DrainError::InvalidInput { .. } => "INVALID_INPUT",
            DrainError::EmptyNetwork => "EMPTY_NETWORK",
            DrainError::ConfigError { .. } => "CONFIG_ERROR",
            DrainError::SerializationError { .. } => "SERIALIZATION_ERROR",
            DrainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for DrainError {
    fn from(err: serde_json::Error) -> Self {
        DrainError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DrainError::invalid_input("area_ha", "-5.0", "Area must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: DrainError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DrainError::EmptyNetwork.error_code(), "EMPTY_NETWORK");
        assert_eq!(DrainError::config("bad table").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: DrainError = serde_json::from_str::<f64>("not a number").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
