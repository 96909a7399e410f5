//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating the adapter configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Required template id is not configured
    #[error("SAI_TEMPLATE_ID is not configured")]
    MissingTemplateId,

    /// Neither credential scheme is configured
    #[error("At least one of SAI_KEY or SAI_COOKIE must be configured")]
    MissingCredentials,

    /// A configured value failed validation
    #[error("Config validation error for {field}: {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// A secret file could not be read
    #[error("Secret file error at {path}: {message}")]
    SecretFile {
        /// Filesystem path of the secret file
        path: String,
        /// Description of the read failure
        message: String,
    },
}

impl ConfigError {
    /// Create a secret file error from an IO error.
    pub fn from_io_error(path: &str, e: &std::io::Error) -> Self {
        Self::SecretFile { path: path.to_string(), message: e.to_string() }
    }
}
