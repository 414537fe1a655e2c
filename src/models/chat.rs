use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Content returned when the upstream reply carries no choices.
pub const NO_RESPONSE: &str = "No response";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String, // "system" | "user" | "assistant", not enforced here
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into() }
    }
}

/// A validated conversation ready to be forwarded upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub thread_id: String,
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
}

impl ChatRequest {
    /// Validate a parsed request body. Checks run in a fixed order and the
    /// first violated rule is reported. Extra fields on messages are dropped.
    pub fn from_body(body: &Value, default_model: &str, default_temperature: f32) -> Result<Self> {
        let thread_id = match body.get("threadId").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(AppError::validation("Missing threadId")),
        };

        let raw_messages = body
            .get("messages")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::validation("messages must be an array"))?;
        if raw_messages.is_empty() {
            return Err(AppError::validation("messages array cannot be empty"));
        }

        let messages = raw_messages
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let role = m.get("role").and_then(Value::as_str);
                let content = m.get("content").and_then(Value::as_str);
                match (role, content) {
                    (Some(role), Some(content)) => Ok(ChatMessage::new(role, content)),
                    _ => Err(AppError::validation(format!(
                        "messages[{i}] must have string role and content"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let model = body
            .get("model")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default_model)
            .to_string();

        let temperature = body
            .get("temperature")
            .and_then(Value::as_f64)
            .map(|t| t as f32)
            .unwrap_or(default_temperature);

        Ok(Self { thread_id, messages, model, temperature })
    }
}

/// What the upstream model API answered, reduced to the messages of each choice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamResponse {
    pub choices: Vec<ChatMessage>,
}

impl UpstreamResponse {
    /// First choice, or the placeholder assistant message when there is none.
    pub fn into_assistant(self) -> ChatMessage {
        self.choices
            .into_iter()
            .next()
            .unwrap_or_else(|| ChatMessage::new("assistant", NO_RESPONSE))
    }
}

#[derive(Serialize, Debug)]
pub struct AssistantReply {
    pub assistant: ChatMessage,
}

/// Upstream API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Leading characters followed by `***`, for diagnostics.
    pub fn masked(&self) -> String {
        let head: String = self.0.chars().take(4).collect();
        format!("{head}***")
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}
