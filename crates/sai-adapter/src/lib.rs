//! # SAI Adapter
//!
//! Exposes the proprietary SAI template-execution HTTP API through an
//! OpenAI-style chat-completion interface.
//!
//! The pipeline for one request:
//!
//! ```text
//! normalize -> resolve credential -> upstream engine (one call,
//!     optional key->cookie fallback) -> translate -> [chunk stream]
//! ```
//!
//! Upstream failures never surface as errors: they are folded into a
//! well-formed [`sai_types::CompletionResult`] carrying a diagnostic body,
//! so the hosting framework always receives a completion object. Only
//! malformed input and missing configuration are hard failures.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod normalize;
pub mod provider;
pub mod streaming;
pub mod translate;
pub mod upstream;

pub use config::SaiConfig;
pub use credentials::{Credential, CredentialKind};
pub use provider::SaiProvider;
pub use upstream::RequestOutcome;

// Re-export the shared type crate for downstream convenience.
pub use sai_types as types;
