//! Receiver: drains the queue, looks up the secret, acknowledges.
//!
//! One poll cycle receives up to `max_messages` messages. For each message
//! the receiver logs the body, fetches the configured secret, emits it
//! (redacted by default) and deletes the message by its receipt handle.
//!
//! A message is only deleted after the secret lookup succeeds. Any message
//! that is not deleted is redelivered by the queue once its lease expires.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::RelayError;
use crate::queue::{QueueService, RelayMessage};
use crate::secrets::{SecretStore, SecretValue};

/// What happened to a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Processed and deleted from the queue.
    Deleted,
    /// Secret lookup failed; left on the queue for redelivery.
    SecretFailed,
    /// Processed, but the delete call failed or was impossible.
    DeleteFailed,
}

/// Counts for one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub received: usize,
    pub deleted: usize,
    pub secret_failures: usize,
    pub delete_failures: usize,
    /// The receive call itself failed; nothing was processed.
    pub receive_failed: bool,
}

impl PollSummary {
    fn record(&mut self, outcome: MessageOutcome) {
        match outcome {
            MessageOutcome::Deleted => self.deleted += 1,
            MessageOutcome::SecretFailed => self.secret_failures += 1,
            MessageOutcome::DeleteFailed => self.delete_failures += 1,
        }
    }
}

/// Stateless queue consumer.
#[derive(Clone)]
pub struct Receiver {
    queue: Arc<dyn QueueService>,
    secrets: Arc<dyn SecretStore>,
    secret_id: String,
    max_messages: i32,
    redact_secrets: bool,
}

impl Receiver {
    pub fn new(
        queue: Arc<dyn QueueService>,
        secrets: Arc<dyn SecretStore>,
        secret_id: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            secrets,
            secret_id: secret_id.into(),
            max_messages: 1,
            redact_secrets: true,
        }
    }

    /// Build a receiver with the batch size and redaction policy from `config`.
    pub fn from_config(
        config: &Config,
        queue: Arc<dyn QueueService>,
        secrets: Arc<dyn SecretStore>,
    ) -> Result<Self, RelayError> {
        let secret_id = config.require_secret_id()?;

        Ok(Self::new(queue, secrets, secret_id)
            .with_max_messages(config.receive_max_messages)
            .with_redaction(config.redact_secrets))
    }

    /// Messages requested per receive call, clamped to SQS's 1 - 10.
    pub fn with_max_messages(mut self, max_messages: i32) -> Self {
        self.max_messages = max_messages.clamp(1, 10);
        self
    }

    pub fn with_redaction(mut self, redact_secrets: bool) -> Self {
        self.redact_secrets = redact_secrets;
        self
    }

    pub fn max_messages(&self) -> i32 {
        self.max_messages
    }

    /// Run one poll cycle.
    ///
    /// Never fails: every error is logged and reflected in the summary.
    pub async fn poll_once(&self) -> PollSummary {
        let mut summary = PollSummary::default();

        let messages = match self.queue.receive(self.max_messages).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(error = %e, "receiver_receive_failed");
                summary.receive_failed = true;
                return summary;
            }
        };

        summary.received = messages.len();

        for message in &messages {
            let outcome = self.process_message(message).await;
            summary.record(outcome);
        }

        info!(
            received = summary.received,
            deleted = summary.deleted,
            secret_failures = summary.secret_failures,
            delete_failures = summary.delete_failures,
            "receiver_poll_complete"
        );

        summary
    }

    /// Process a single delivery: log, look up the secret, delete.
    pub async fn process_message(&self, message: &RelayMessage) -> MessageOutcome {
        let message_id = message.log_id();

        info!(
            message_id = %message_id,
            body = %message.body,
            "receiver_message_received"
        );

        let secret = match self.secrets.get_secret(&self.secret_id).await {
            Ok(secret) => secret,
            Err(e) => {
                error!(
                    message_id = %message_id,
                    secret_id = %self.secret_id,
                    error = %e,
                    "receiver_secret_failed"
                );
                return MessageOutcome::SecretFailed;
            }
        };

        info!(
            message_id = %message_id,
            secret_id = %secret.id(),
            secret = %self.loggable(&secret),
            redacted = self.redact_secrets,
            "receiver_secret_retrieved"
        );

        let Some(receipt_handle) = message.receipt_handle.as_deref() else {
            warn!(message_id = %message_id, "receiver_missing_receipt_handle");
            return MessageOutcome::DeleteFailed;
        };

        match self.queue.delete(receipt_handle).await {
            Ok(()) => {
                info!(message_id = %message_id, "receiver_message_deleted");
                MessageOutcome::Deleted
            }
            Err(e) => {
                error!(
                    message_id = %message_id,
                    error = %e,
                    "receiver_delete_failed"
                );
                MessageOutcome::DeleteFailed
            }
        }
    }

    fn loggable(&self, secret: &SecretValue) -> String {
        if self.redact_secrets {
            secret.redacted()
        } else {
            secret.expose().to_string()
        }
    }
}
