//! Secret store seam.
//!
//! The receiver looks up one secret per message through [`SecretStore`].
//! Values are never cached between lookups.

pub mod manager;
pub mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::error::RelayError;
use crate::redact::redact;

pub use manager::SecretsManagerStore;
pub use memory::MemorySecretStore;

/// Read-only access to named secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Return the current value of the secret `secret_id`.
    async fn get_secret(&self, secret_id: &str) -> Result<SecretValue, RelayError>;
}

/// A secret's current value.
///
/// `Debug` and `Display` never print the raw value; call
/// [`SecretValue::expose`] to read it.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue {
    id: String,
    value: String,
}

impl SecretValue {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    /// The value as it may appear in logs.
    pub fn redacted(&self) -> String {
        redact(&self.value)
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("id", &self.id)
            .field("value", &self.redacted())
            .finish()
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
