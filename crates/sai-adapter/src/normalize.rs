//! Inbound message normalization.
//!
//! Validates the message list, unwraps IDE-plugin-wrapped content, separates
//! a leading system message and converts the rest into the upstream history
//! schema with stable numeric ids.

use chrono::Utc;
use sai_types::{ChatMessage, InputError, SaiError, UpstreamChatMessage};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Fixed prefix the IDE integration layer puts in front of the user's text.
const PLUGIN_PREFIX: &str = "Determine if the following context is required \
to solve the task in the user's input in the chat session: \"";

/// Marker following the quoted original text in a plugin-wrapped message.
const PLUGIN_CONTEXT_MARKER: &str = "\"\nContext:";

/// Conservative size estimate: roughly 4 characters per token.
const ESTIMATED_CHARS_PER_TOKEN: usize = 4;

/// Context-size ceiling above which the oversize warning is emitted.
const MAX_CONTEXT_TOKENS: usize = 128_000;

/// A conversation reduced to the shape the upstream engine consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedConversation {
    /// Content of a leading system message, empty if there was none.
    pub system_prompt: String,
    /// Content of the last inbound message (after plugin unwrapping).
    pub user_prompt: String,
    /// Remaining messages in upstream schema, original order preserved.
    pub messages: Vec<UpstreamChatMessage>,
}

/// Parse a raw JSON value into a message list.
///
/// This is the boundary where loosely shaped framework input becomes typed:
/// a non-array payload or an element without a `role`/`content` string pair
/// is an [`InputError`].
pub fn parse_messages(value: &Value) -> Result<Vec<ChatMessage>, SaiError> {
    let items = value.as_array().ok_or_else(|| {
        SaiError::Input(InputError::NotASequence { found: json_type_name(value).to_string() })
    })?;

    let mut messages = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let role = item.get("role").and_then(Value::as_str).ok_or_else(|| {
            SaiError::Input(InputError::MalformedMessage {
                index,
                message: "missing or non-string 'role'".to_string(),
            })
        })?;
        let content = item.get("content").and_then(Value::as_str).ok_or_else(|| {
            SaiError::Input(InputError::MalformedMessage {
                index,
                message: "missing or non-string 'content'".to_string(),
            })
        })?;
        messages.push(ChatMessage::new(role, content));
    }
    Ok(messages)
}

/// Detect a plugin-wrapped message and extract the original user text.
///
/// Returns `None` when the content is not wrapped. Applying this to already
/// unwrapped content is a no-op.
pub fn unwrap_plugin_message(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(PLUGIN_PREFIX)?;
    let end = rest.find(PLUGIN_CONTEXT_MARKER)?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

/// Normalize an inbound message list.
///
/// Fails with `InvalidInput` when the list is empty or a message carries an
/// empty role. Plugin unwrapping mutates content before anything else,
/// including the context-size estimate.
pub fn normalize(
    mut messages: Vec<ChatMessage>,
    request_id: &str,
) -> Result<NormalizedConversation, SaiError> {
    if messages.is_empty() {
        return Err(InputError::EmptyMessages.into());
    }

    let mut plugin_detected = false;
    for msg in &mut messages {
        if let Some(original) = unwrap_plugin_message(&msg.content) {
            info!(
                "🔧 [PLUGIN INTERCEPTED] [{}] IDE plugin wrapper removed | Original: {}",
                request_id,
                preview(original, 80)
            );
            msg.content = original.to_string();
            plugin_detected = true;
        }
    }

    for (index, msg) in messages.iter().enumerate() {
        if msg.role.trim().is_empty() {
            return Err(SaiError::Input(InputError::MalformedMessage {
                index,
                message: "empty 'role'".to_string(),
            }));
        }
    }

    // Context size over ALL inbound messages, before system-prompt removal.
    let total_chars: usize = messages.iter().map(|m| m.content.chars().count()).sum();
    info!(
        "🔌 [CLIENT → SERVER] [{}] Messages received | Count: {} | Total size: {} chars | Plugin detected: {}",
        request_id,
        messages.len(),
        total_chars,
        if plugin_detected { "yes" } else { "no" }
    );
    debug!("[{}] Messages: {:?}", request_id, messages);

    let estimated_tokens = total_chars / ESTIMATED_CHARS_PER_TOKEN;
    if estimated_tokens > MAX_CONTEXT_TOKENS {
        warn!(
            "⚠️ [SERVER] [{}] Context potentially too large | Estimated tokens: {} | Recommended max: {} | The client should trim the history",
            request_id, estimated_tokens, MAX_CONTEXT_TOKENS
        );
    }

    let user_prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();

    let (system_prompt, history) = match messages.first() {
        Some(first) if first.role == "system" => (first.content.clone(), &messages[1..]),
        _ => (String::new(), &messages[..]),
    };

    let base_id = Utc::now().timestamp_millis();
    let upstream = history
        .iter()
        .enumerate()
        .map(|(idx, msg)| UpstreamChatMessage {
            content: msg.content.clone(),
            role: msg.role.clone(),
            id: base_id + idx as i64,
        })
        .collect();

    Ok(NormalizedConversation { system_prompt, user_prompt, messages: upstream })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truncate a string for log lines without splitting a code point.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
