use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::ApiKey;
use crate::traits::{CredentialResolver, SecretPayload, SecretStore};

/// Env override first, secret store second. Nothing is cached between calls.
pub struct StoreCredentialResolver<S> {
    store: S,
    api_key: Option<String>,
    secret_id: Option<String>,
    secret_field: String,
}

impl<S: SecretStore> StoreCredentialResolver<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            api_key: config.api_key.clone(),
            secret_id: config.secret_id.clone(),
            secret_field: config.secret_field.clone(),
        }
    }
}

#[async_trait]
impl<S: SecretStore> CredentialResolver for StoreCredentialResolver<S> {
    async fn resolve(&self) -> Result<ApiKey> {
        if let Some(key) = &self.api_key {
            debug!("using API key from environment");
            return Ok(ApiKey::new(key.clone()));
        }
        let secret_id = self
            .secret_id
            .as_deref()
            .ok_or_else(|| AppError::Credential("no API key override and no secret id configured".into()))?;

        debug!(secret_id, "fetching API key from secret store");
        let payload = self.store.fetch(secret_id).await?;
        decode_secret(&payload, &self.secret_field)
    }
}

/// Extract the key from a secret holding a JSON object, given either as text
/// or as (optionally base64-encoded) bytes.
pub fn decode_secret(payload: &SecretPayload, field: &str) -> Result<ApiKey> {
    let parsed: Option<Value> = match payload {
        SecretPayload::Text(text) => serde_json::from_str(text).ok(),
        SecretPayload::Binary(bytes) => {
            let raw = match std::str::from_utf8(bytes).ok().map(str::trim) {
                Some(text) => STANDARD.decode(text).unwrap_or_else(|_| bytes.clone()),
                None => bytes.clone(),
            };
            serde_json::from_slice(&raw).ok()
        }
    };

    match parsed.as_ref().and_then(|v| v.get(field)).and_then(Value::as_str) {
        Some(key) if !key.is_empty() => Ok(ApiKey::new(key)),
        _ => {
            warn!(field, "secret does not hold a usable API key");
            Err(AppError::Credential("Invalid secret format".into()))
        }
    }
}
