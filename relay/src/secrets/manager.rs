//! AWS Secrets Manager-backed secret store.

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use tracing::debug;

use super::{SecretStore, SecretValue};
use crate::error::RelayError;

#[derive(Clone, Debug)]
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretValue, RelayError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| RelayError::secret(secret_id, DisplayErrorContext(&e)))?;

        debug!(
            secret_id = %secret_id,
            version_id = ?output.version_id(),
            "secretsmanager_secret_fetched"
        );

        // Binary secrets are not supported.
        let value = output
            .secret_string
            .ok_or(RelayError::MissingField("SecretString"))?;

        Ok(SecretValue::new(secret_id, value))
    }
}
