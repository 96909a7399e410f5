//! Input validation errors.
//!
//! These are the only failures surfaced to the caller before anything is
//! sent upstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while validating inbound chat messages.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum InputError {
    /// The message list is empty
    #[error("messages must be a non-empty list")]
    EmptyMessages,

    /// The inbound payload is not a list of messages
    #[error("messages must be a list, got {found}")]
    NotASequence {
        /// JSON type actually found
        found: String,
    },

    /// A message is missing a required field or has an invalid shape
    #[error("message {index} is malformed: {message}")]
    MalformedMessage {
        /// Zero-based position of the offending message
        index: usize,
        /// Description of what is missing or invalid
        message: String,
    },
}
