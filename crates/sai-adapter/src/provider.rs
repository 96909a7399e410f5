//! Provider entry points for the host framework.
//!
//! Three calls: a fully blocking completion, an async wrapper that offloads
//! the blocking pipeline to a worker task, and a streaming call that resolves
//! the completion first and then re-slices it. No additional concurrency;
//! within one request the Key attempt always precedes any Cookie fallback.

use crate::config::SaiConfig;
use crate::credentials;
use crate::normalize;
use crate::streaming;
use crate::translate::{self, TranslationContext};
use crate::upstream::UpstreamEngine;
use futures::Stream;
use sai_types::{ChatMessage, CompletionResult, SaiError, StreamChunk};
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

/// The SAI chat-completion provider.
///
/// Holds the immutable config and the process-wide connection pool; cheap to
/// clone and safe to share across concurrent requests.
#[derive(Clone)]
pub struct SaiProvider {
    config: Arc<SaiConfig>,
    engine: UpstreamEngine,
}

impl SaiProvider {
    /// Build a provider from a validated configuration.
    pub fn new(config: SaiConfig) -> Result<Self, SaiError> {
        config.validate()?;
        let config = Arc::new(config);
        let engine = UpstreamEngine::new(config.clone())?;
        tracing::info!("✅ SAI provider initialized | Template: {}", config.template_id);
        Ok(Self { config, engine })
    }

    /// Build a provider from the process environment.
    pub fn from_env() -> Result<Self, SaiError> {
        Self::new(SaiConfig::from_env()?)
    }

    /// The active configuration.
    pub fn config(&self) -> &SaiConfig {
        &self.config
    }

    /// Synchronous completion. Blocking end-to-end: normalize, resolve the
    /// credential, one (or two) sequential HTTP calls, translate.
    ///
    /// `params` is the open-ended metadata bag from the host framework; it
    /// may carry a caller-supplied credential.
    pub fn completion(
        &self,
        messages: Vec<ChatMessage>,
        params: &Value,
    ) -> Result<CompletionResult, SaiError> {
        let request_id = new_request_id();
        let conversation = normalize::normalize(messages, &request_id)?;

        let caller = credentials::caller_credential(params);
        let credential = credentials::resolve(caller.as_deref(), &self.config)?;

        let (outcome, kind_used) = self.engine.execute(&request_id, &conversation, &credential);
        let ctx = TranslationContext {
            message_count: conversation.messages.len(),
            credential_kind: kind_used,
        };
        Ok(translate::translate(outcome, &ctx, &request_id))
    }

    /// Async completion. Offloads the blocking pipeline to a worker task and
    /// awaits it; performs no concurrency of its own.
    pub async fn acompletion(
        &self,
        messages: Vec<ChatMessage>,
        params: Value,
    ) -> Result<CompletionResult, SaiError> {
        let provider = self.clone();
        tokio::task::spawn_blocking(move || provider.completion(messages, &params))
            .await
            .map_err(|e| SaiError::Internal(format!("completion worker failed: {}", e)))?
    }

    /// Streaming completion. Resolves the full completion, then re-exposes
    /// it as an ordered chunk sequence.
    pub async fn astreaming(
        &self,
        messages: Vec<ChatMessage>,
        params: Value,
    ) -> Result<Pin<Box<dyn Stream<Item = StreamChunk> + Send>>, SaiError> {
        let result = self.acompletion(messages, params).await?;
        Ok(streaming::chunk_stream(result, self.config.chunk_size))
    }
}

/// Short request id used in every log line of one request.
fn new_request_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
