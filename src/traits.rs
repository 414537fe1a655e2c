use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiKey, ChatRequest, UpstreamResponse};

/// Produce the upstream API key for one invocation.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Fails with `AppError::Credential` when no usable key can be found.
    async fn resolve(&self) -> Result<ApiKey>;
}

/// Raw secret value as stored.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretPayload {
    Text(String),
    Binary(Vec<u8>),
}

/// Look up a secret by identifier. One network call per `fetch`.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch(&self, secret_id: &str) -> Result<SecretPayload>;
}

/// Forward a validated conversation to the chat-completion API.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Fails with `AppError::Upstream` on network errors or non-success replies.
    async fn send(&self, api_key: &ApiKey, request: &ChatRequest) -> Result<UpstreamResponse>;
}
