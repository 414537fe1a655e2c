use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;

use crate::error::{AppError, Result};
use crate::traits::{SecretPayload, SecretStore};

/// AWS Secrets Manager backed [`SecretStore`].
#[derive(Clone)]
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Region and credentials come from the standard AWS provider chain.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn fetch(&self, secret_id: &str) -> Result<SecretPayload> {
        let out = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| AppError::Credential(format!("GetSecretValue {secret_id}: {e}")))?;

        if let Some(text) = out.secret_string() {
            return Ok(SecretPayload::Text(text.to_string()));
        }
        match out.secret_binary() {
            Some(blob) => Ok(SecretPayload::Binary(blob.as_ref().to_vec())),
            None => Err(AppError::Credential(format!("secret {secret_id} has no value"))),
        }
    }
}
