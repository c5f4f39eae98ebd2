//! Fixed, in-process secret store.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{SecretStore, SecretValue};
use crate::error::RelayError;

#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(id.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, secret_id: &str) -> Result<SecretValue, RelayError> {
        self.secrets
            .get(secret_id)
            .map(|value| SecretValue::new(secret_id, value.clone()))
            .ok_or_else(|| RelayError::secret(secret_id, "secret not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup() {
        let store = MemorySecretStore::new().with_secret("MySecret", "S");

        let secret = store.get_secret("MySecret").await.unwrap();
        assert_eq!(secret.id(), "MySecret");
        assert_eq!(secret.expose(), "S");

        let missing = store.get_secret("Other").await.unwrap_err();
        assert!(matches!(missing, RelayError::Secret { .. }));
    }
}
