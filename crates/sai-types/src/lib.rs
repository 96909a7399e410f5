//! # SAI Types
//!
//! Data model and error definitions for the SAI chat-completion adapter.
//!
//! This crate provides the foundational type system for the adapter:
//!
//! - **`error`** - Typed error hierarchy for input validation and configuration
//! - **`messages`** - Inbound chat messages and the upstream execute payload
//! - **`response`** - Completion results, usage accounting and stream chunks
//!
//! All types are designed to be:
//! - **Serializable** via serde for API boundaries
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod messages;
pub mod response;

// Re-export error types for convenience
pub use error::{ConfigError, InputError, Result, SaiError};

// Re-export core model types
pub use messages::{ChatMessage, ExecuteInputs, ExecuteRequest, UpstreamChatMessage};
pub use response::{CompletionResult, FinishReason, StreamChunk, UsageHeaders};
