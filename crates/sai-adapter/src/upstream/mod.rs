//! Upstream request engine.
//!
//! Builds the execute payload, issues one blocking POST with exactly one
//! auth header, classifies the HTTP outcome into [`RequestOutcome`] and runs
//! the key → cookie fallback policy. No transport error crosses this
//! boundary; everything folds into the outcome taxonomy.

mod executor;

pub(crate) use executor::send_attempt;

use crate::config::SaiConfig;
use crate::credentials::{Credential, CredentialKind};
use crate::normalize::NormalizedConversation;
use sai_types::{ConfigError, ExecuteInputs, ExecuteRequest, SaiError, UsageHeaders};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Exact upstream body marking the 429 that is eligible for cookie fallback.
pub const RATE_LIMIT_BODY_MARKER: &str = "Test template usage limit exceeded";

/// Case-insensitive 500 body markers for an oversized prompt.
pub const PROMPT_TOO_LONG_MARKERS: [&str; 2] = ["prompt is too long", "openaicompatible"];

/// Classified result of one upstream attempt chain.
///
/// This is the contract between the engine and everything downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// 2xx response with body and usage headers.
    Success {
        /// Response body, verbatim.
        body: String,
        /// Usage extracted from the response headers.
        headers: UsageHeaders,
    },
    /// 401, credential rejected. Terminal for the attempt chain.
    Unauthorized,
    /// 500 with a prompt-too-long marker in the body.
    TooLong,
    /// Any other 500.
    ServerError,
    /// 429 with the usage-limit marker. Eligible for one cookie fallback.
    RateLimited,
    /// Any other non-2xx status, timeout or transport failure.
    NoResponse,
}

/// Blocking engine sharing the process-wide connection pool.
#[derive(Clone)]
pub struct UpstreamEngine {
    client: reqwest::blocking::Client,
    config: Arc<SaiConfig>,
}

impl UpstreamEngine {
    /// Build the engine and its pooled HTTP client.
    ///
    /// TLS verification is disabled: the SAI service runs inside the
    /// corporate network with a private CA.
    pub fn new(config: Arc<SaiConfig>) -> Result<Self, SaiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(20)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| {
                SaiError::Config(ConfigError::ValidationError {
                    field: "http_client".to_string(),
                    message: e.to_string(),
                })
            })?;
        Ok(Self { client, config })
    }

    /// Execute one logical upstream call with the fallback policy applied.
    ///
    /// Returns the outcome together with the kind of the credential that
    /// produced it. The fallback fires exactly once: a 429 with the
    /// usage-limit marker on a Key attempt retries with the default cookie
    /// when one is configured. The fallback attempt never re-falls-back.
    pub fn execute(
        &self,
        request_id: &str,
        conversation: &NormalizedConversation,
        credential: &Credential,
    ) -> (RequestOutcome, CredentialKind) {
        let url = format!(
            "{}/api/templates/{}/execute",
            self.config.base_url.trim_end_matches('/'),
            self.config.template_id
        );
        let payload = ExecuteRequest {
            inputs: ExecuteInputs {
                system: conversation.system_prompt.clone(),
                user: conversation.user_prompt.clone(),
            },
            chat_messages: if conversation.messages.is_empty() {
                None
            } else {
                Some(conversation.messages.clone())
            },
        };

        info!(
            "📤 [SERVER → SAI] [{}] Preparing request | System: {} chars | User: {} chars | History: {} messages | Template: {}",
            request_id,
            conversation.system_prompt.chars().count(),
            conversation.user_prompt.chars().count(),
            conversation.messages.len(),
            self.config.template_id
        );
        if self.config.verbose_logging {
            debug!("[{}] Full payload: {:?}", request_id, payload);
        }

        let kind = credential.kind();
        let outcome = send_attempt(&self.client, &self.config, request_id, &url, &payload, credential);

        if outcome == RequestOutcome::RateLimited && kind == CredentialKind::Key {
            return match self.config.cookie.clone() {
                Some(cookie) => {
                    info!(
                        "🔄 [{}] Retrying with Cookie after 429 '{}' on API Key | Switching auth: API Key → Cookie",
                        request_id, RATE_LIMIT_BODY_MARKER
                    );
                    let fallback = Credential::Cookie(cookie);
                    let retried = send_attempt(
                        &self.client,
                        &self.config,
                        request_id,
                        &url,
                        &payload,
                        &fallback,
                    );
                    (retried, CredentialKind::Cookie)
                },
                None => {
                    error!(
                        "❌ [{}] 429 usage limit with API Key but no SAI_COOKIE configured for fallback",
                        request_id
                    );
                    (outcome, kind)
                },
            };
        }

        (outcome, kind)
    }
}
