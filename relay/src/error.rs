//! Error type shared by the queue and secret store seams.

use thiserror::Error;

/// Errors raised by the relay's external collaborators and configuration.
///
/// Dependency failures carry the rendered SDK error (including its cause
/// chain) rather than the SDK error itself, so adapters for different
/// services can share one type.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A queue service call failed.
    #[error("{operation} failed: {message}")]
    Queue {
        operation: &'static str,
        message: String,
    },

    /// The secret store could not return the requested secret.
    #[error("secret {secret_id} lookup failed: {message}")]
    Secret { secret_id: String, message: String },

    /// A response from a dependency was missing a required field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Required configuration was absent or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    pub fn queue(operation: &'static str, message: impl ToString) -> Self {
        RelayError::Queue {
            operation,
            message: message.to_string(),
        }
    }

    pub fn secret(secret_id: impl Into<String>, message: impl ToString) -> Self {
        RelayError::Secret {
            secret_id: secret_id.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_error_display() {
        let err = RelayError::queue("send_message", "connection refused");
        assert_eq!(err.to_string(), "send_message failed: connection refused");
    }

    #[test]
    fn test_secret_error_display() {
        let err = RelayError::secret("MySecret", "access denied");
        assert_eq!(
            err.to_string(),
            "secret MySecret lookup failed: access denied"
        );
    }
}
