//! Message types for the chat-completion boundary and the SAI execute payload.

use serde::{Deserialize, Serialize};

/// A single message in a chat conversation, as received from the host framework.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Role of the message author ("user", "assistant", "system", "tool").
    pub role: String,
    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor used heavily in tests.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into() }
    }
}

/// A chat history entry in the shape the SAI template API expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpstreamChatMessage {
    /// Text content of the message.
    pub content: String,
    /// Role of the message author.
    pub role: String,
    /// Synthetic id: millisecond timestamp plus positional offset.
    /// Unique within one request.
    pub id: i64,
}

/// The `inputs` object of the execute payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteInputs {
    /// System prompt extracted from the first message, empty if absent.
    pub system: String,
    /// The user prompt (content of the last inbound message).
    pub user: String,
}

/// Request body for `POST /api/templates/{id}/execute`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecuteRequest {
    /// System and user prompt inputs.
    pub inputs: ExecuteInputs,
    /// Conversation history. Omitted from the wire payload when empty.
    #[serde(rename = "chatMessages", skip_serializing_if = "Option::is_none")]
    pub chat_messages: Option<Vec<UpstreamChatMessage>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_request_omits_empty_history() {
        let req = ExecuteRequest {
            inputs: ExecuteInputs { system: "S".to_string(), user: "hello".to_string() },
            chat_messages: None,
        };

        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("chatMessages"));
    }

    #[test]
    fn test_execute_request_history_key_is_camel_case() {
        let req = ExecuteRequest {
            inputs: ExecuteInputs { system: String::new(), user: "hi".to_string() },
            chat_messages: Some(vec![UpstreamChatMessage {
                content: "hi".to_string(),
                role: "user".to_string(),
                id: 1700000000000,
            }]),
        };

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"chatMessages\""));
        assert!(json.contains("\"id\":1700000000000"));
    }
}
