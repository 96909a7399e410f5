//! Completion results, usage accounting and streaming chunk types.

use serde::{Deserialize, Serialize};

/// Reason the completion finished, in OpenAI vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    /// Upstream produced a complete response.
    Stop,
    /// The context exceeded the model limit.
    Length,
    /// Any other upstream or connectivity failure.
    Error,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Length => write!(f, "length"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Usage and timing data extracted from one upstream call.
///
/// Computed once per successful call from the SAI response headers;
/// zero-filled (with `model = "unknown"`) on any failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageHeaders {
    /// Tokens in the input prompt (`prompttokens` header, 0 if missing).
    pub prompt_tokens: u32,
    /// Tokens in the generated completion (`completiontokens` header, 0 if missing).
    pub completion_tokens: u32,
    /// Total tokens used (prompt + completion).
    pub total_tokens: u32,
    /// Model that served the request (`model` header, "unknown" if missing).
    pub model: String,
    /// Wall-clock latency of the upstream call in seconds.
    pub response_time: f64,
    /// HTTP status code of the upstream response.
    pub status_code: u16,
    /// Completion tokens divided by response time.
    pub tokens_per_second: f64,
}

impl Default for UsageHeaders {
    fn default() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            model: "unknown".to_string(),
            response_time: 0.0,
            status_code: 0,
            tokens_per_second: 0.0,
        }
    }
}

/// The final, externally visible unit of work: one resolved completion.
///
/// Upstream failures are carried here as a diagnostic `text` with
/// `finish_reason = error | length`, never as a raised error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResult {
    /// Response body on success, human-readable diagnostic on failure.
    pub text: String,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// Usage accounting for the request.
    pub usage: UsageHeaders,
}

/// One slice of an emulated streaming response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamChunk {
    /// Slice of the completion text.
    pub text: String,
    /// Zero-based sequence index.
    pub index: usize,
    /// True only for the last slice.
    pub is_final: bool,
    /// Carried only on the final chunk, absent otherwise.
    pub finish_reason: Option<FinishReason>,
    /// Full usage payload, attached to every chunk.
    pub usage: UsageHeaders,
}
