use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use openai::Credentials;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ApiKey, ChatMessage, ChatRequest, UpstreamResponse};
use crate::traits::ChatUpstream;

/// Chat-completion client for any OpenAI-compatible base URL.
pub struct OpenAiUpstream {
    base_url: String,
}

impl OpenAiUpstream {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

#[async_trait]
impl ChatUpstream for OpenAiUpstream {
    async fn send(&self, api_key: &ApiKey, request: &ChatRequest) -> Result<UpstreamResponse> {
        let messages = request
            .messages
            .iter()
            .map(to_completion_message)
            .collect::<Result<Vec<_>>>()?;
        let creds = Credentials::new(api_key.expose(), &self.base_url);

        let completion = ChatCompletion::builder(&request.model, messages)
            .temperature(request.temperature)
            .credentials(creds)
            .create()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let choices = completion
            .choices
            .into_iter()
            .map(|c| {
                Ok(ChatMessage {
                    role: role_name(&c.message.role)?,
                    content: c.message.content.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(UpstreamResponse { choices })
    }
}

fn to_completion_message(msg: &ChatMessage) -> Result<ChatCompletionMessage> {
    let role: ChatCompletionMessageRole = serde_json::from_value(Value::String(msg.role.clone()))
        .map_err(|_| AppError::Upstream(format!("unsupported message role '{}'", msg.role)))?;
    Ok(ChatCompletionMessage {
        role,
        content: Some(msg.content.clone()),
        name: None,
        function_call: None,
        tool_calls: None,
        tool_call_id: None,
    })
}

fn role_name(role: &ChatCompletionMessageRole) -> Result<String> {
    match serde_json::to_value(role) {
        Ok(Value::String(name)) => Ok(name),
        _ => Err(AppError::Upstream("unreadable role in completion".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_round_trip_through_the_wire_enum() {
        for role in ["system", "user", "assistant"] {
            let msg = to_completion_message(&ChatMessage::new(role, "x")).unwrap();
            assert_eq!(role_name(&msg.role).unwrap(), role);
            assert_eq!(msg.content.as_deref(), Some("x"));
        }
    }

    #[test]
    fn unknown_role_is_an_upstream_error() {
        let err = to_completion_message(&ChatMessage::new("narrator", "x")).unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("narrator")));
    }
}
