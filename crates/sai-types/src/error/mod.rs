//! Typed error definitions for the SAI adapter.
//!
//! This module provides a structured error hierarchy with specific error types
//! for the two conditions that are allowed to surface to the caller as hard
//! failures: malformed input and missing configuration. Upstream HTTP failures
//! are never raised; they are folded into a completion result by the
//! translation layer.
//!
//! All errors are designed to be:
//!
//! - **Serializable** for API responses via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod config;
mod input;

pub use config::ConfigError;
pub use input::InputError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all adapter errors.
///
/// Use this when you need a single error type that can represent
/// any hard failure of the adapter.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum SaiError {
    /// Wraps an input validation error
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A worker task backing an async entry point failed
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Standard Result type using SaiError.
pub type Result<T> = std::result::Result<T, SaiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = SaiError::Input(InputError::MalformedMessage {
            index: 2,
            message: "missing role".to_string(),
        });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Input"));
        assert!(json.contains("missing role"));

        let deserialized: SaiError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingCredentials;
        let msg = format!("{}", err);
        assert!(msg.contains("SAI_KEY"));
        assert!(msg.contains("SAI_COOKIE"));
    }
}
