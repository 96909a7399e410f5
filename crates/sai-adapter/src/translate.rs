//! Outcome → completion translation.
//!
//! Every [`RequestOutcome`] maps deterministically onto a well-formed
//! [`CompletionResult`]; upstream failures become diagnostic bodies with
//! `finish_reason = error | length`, never raised errors.

use crate::credentials::CredentialKind;
use crate::normalize::preview;
use crate::upstream::RequestOutcome;
use sai_types::{CompletionResult, FinishReason, UsageHeaders};
use tracing::{error, info};

/// Request-scoped facts the diagnostics cite.
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext {
    /// Number of history messages sent upstream.
    pub message_count: usize,
    /// Credential kind of the attempt that produced the outcome.
    pub credential_kind: CredentialKind,
}

/// Map an outcome onto the completion the host framework receives.
pub fn translate(
    outcome: RequestOutcome,
    ctx: &TranslationContext,
    request_id: &str,
) -> CompletionResult {
    match outcome {
        RequestOutcome::Success { body, headers } => {
            info!(
                "✅ [SERVER → CLIENT] [{}] Response ready | Status: {} | ⏱️ Latency: {:.2}s | Length: {} chars | Tokens: {} → {} (total: {}) | Speed: {:.1} tok/s | Model: {} | Preview: {:?}",
                request_id,
                headers.status_code,
                headers.response_time,
                body.chars().count(),
                headers.prompt_tokens,
                headers.completion_tokens,
                headers.total_tokens,
                headers.tokens_per_second,
                headers.model,
                preview(&body, 120)
            );
            CompletionResult { text: body, finish_reason: FinishReason::Stop, usage: headers }
        },
        RequestOutcome::Unauthorized => {
            error!(
                "❌ [SAI → SERVER] [{}] Authentication rejected | Auth: {}",
                request_id, ctx.credential_kind
            );
            CompletionResult {
                text: unauthorized_diagnostic(ctx.credential_kind),
                finish_reason: FinishReason::Error,
                usage: UsageHeaders::default(),
            }
        },
        RequestOutcome::TooLong => {
            error!(
                "❌ [SAI → SERVER] [{}] Context too long | History messages: {} | The client must trim the history",
                request_id, ctx.message_count
            );
            CompletionResult {
                text: too_long_diagnostic(ctx.message_count),
                finish_reason: FinishReason::Length,
                usage: UsageHeaders::default(),
            }
        },
        RequestOutcome::ServerError => {
            error!("❌ [SAI → SERVER] [{}] Unhandled HTTP 500 from SAI", request_id);
            CompletionResult {
                text: SERVER_ERROR_DIAGNOSTIC.to_string(),
                finish_reason: FinishReason::Error,
                usage: UsageHeaders::default(),
            }
        },
        RequestOutcome::RateLimited | RequestOutcome::NoResponse => {
            error!("❌ [SERVER → CLIENT] [{}] No response obtained from SAI", request_id);
            CompletionResult {
                text: NO_RESPONSE_DIAGNOSTIC.to_string(),
                finish_reason: FinishReason::Error,
                usage: UsageHeaders::default(),
            }
        },
    }
}

fn unauthorized_diagnostic(kind: CredentialKind) -> String {
    format!(
        "❌ **Authentication rejected (HTTP 401)**\n\n\
         The SAI service rejected the {kind} used for this request.\n\
         **Suggested actions:**\n\
         1. Verify the {kind} value is current\n\
         2. Rotate the credential and update the configuration\n\
         3. Contact the SAI template administrator if access was revoked"
    )
}

fn too_long_diagnostic(message_count: usize) -> String {
    format!(
        "⚠️ **Context too long**\n\n\
         The conversation history exceeds the model limit ({message_count} messages).\n\
         **Suggested actions:**\n\
         1. Reduce the number of messages in the history\n\
         2. Start a new conversation\n\
         3. Summarize the previous context into a shorter message"
    )
}

const SERVER_ERROR_DIAGNOSTIC: &str = "❌ **SAI internal server error (HTTP 500)**\n\n\
    The SAI server hit an unexpected error while processing the request.\n\
    **Possible causes:**\n\
    1. Internal model or service failure\n\
    2. Template misconfiguration\n\
    3. Temporary server problem\n\n\
    Please retry. If the problem persists, contact the administrator.";

const NO_RESPONSE_DIAGNOSTIC: &str = "❌ **SAI connection error**\n\n\
    No response could be obtained from the SAI server.\n\
    **Possible causes:**\n\
    1. Network or connectivity problems\n\
    2. Invalid authentication credentials\n\
    3. SAI service temporarily unavailable\n\n\
    Please try again in a few moments.";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ctx(kind: CredentialKind) -> TranslationContext {
        TranslationContext { message_count: 7, credential_kind: kind }
    }

    fn success_usage() -> UsageHeaders {
        UsageHeaders {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5,
            model: "sai-large".to_string(),
            response_time: 0.4,
            status_code: 200,
            tokens_per_second: 5.0,
        }
    }

    #[test]
    fn test_success_passes_body_verbatim() {
        let outcome = RequestOutcome::Success {
            body: "hi there".to_string(),
            headers: success_usage(),
        };
        let result = translate(outcome, &ctx(CredentialKind::Key), "t");

        assert_eq!(result.text, "hi there");
        assert_eq!(result.finish_reason, FinishReason::Stop);
        assert_eq!(result.usage.total_tokens, 5);
        assert_eq!(result.usage.model, "sai-large");
    }

    #[test]
    fn test_unauthorized_names_credential_kind() {
        let result = translate(RequestOutcome::Unauthorized, &ctx(CredentialKind::Key), "t");
        assert_eq!(result.finish_reason, FinishReason::Error);
        assert!(result.text.contains("API Key"));
        assert_eq!(result.usage, UsageHeaders::default());

        let result = translate(RequestOutcome::Unauthorized, &ctx(CredentialKind::Cookie), "t");
        assert!(result.text.contains("Cookie"));
    }

    #[test]
    fn test_too_long_cites_message_count() {
        let result = translate(RequestOutcome::TooLong, &ctx(CredentialKind::Key), "t");
        assert_eq!(result.finish_reason, FinishReason::Length);
        assert!(result.text.contains("7 messages"));
        assert!(result.text.contains("history"));
    }

    #[test]
    fn test_server_error_is_generic_error() {
        let result = translate(RequestOutcome::ServerError, &ctx(CredentialKind::Key), "t");
        assert_eq!(result.finish_reason, FinishReason::Error);
        assert!(result.text.contains("HTTP 500"));
    }

    #[test]
    fn test_no_response_and_rate_limited_share_connectivity_diagnostic() {
        let a = translate(RequestOutcome::NoResponse, &ctx(CredentialKind::Key), "t");
        let b = translate(RequestOutcome::RateLimited, &ctx(CredentialKind::Key), "t");
        assert_eq!(a.text, b.text);
        assert_eq!(a.finish_reason, FinishReason::Error);
        assert!(a.text.contains("connection error"));
    }

    #[test]
    fn test_failures_have_zero_usage() {
        for outcome in [
            RequestOutcome::Unauthorized,
            RequestOutcome::TooLong,
            RequestOutcome::ServerError,
            RequestOutcome::RateLimited,
            RequestOutcome::NoResponse,
        ] {
            let result = translate(outcome, &ctx(CredentialKind::Key), "t");
            assert_eq!(result.usage, UsageHeaders::default());
        }
    }
}
