//! Message types exchanged with the queue.

use serde::{Deserialize, Serialize};

/// Payload accepted by `POST /webhook`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequest {
    /// Text relayed verbatim as the queue message body
    pub message: String,
}

/// One delivery of a queued message.
///
/// A redelivered message carries a fresh receipt handle; only the handle of
/// the current delivery can delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    /// Queue-assigned identifier, stable across redeliveries
    pub message_id: Option<String>,
    /// Opaque message body
    pub body: String,
    /// Token for this delivery attempt, required to delete it
    pub receipt_handle: Option<String>,
}

impl RelayMessage {
    pub fn new(
        message_id: impl Into<String>,
        body: impl Into<String>,
        receipt_handle: impl Into<String>,
    ) -> Self {
        Self {
            message_id: Some(message_id.into()),
            body: body.into(),
            receipt_handle: Some(receipt_handle.into()),
        }
    }

    /// Identifier used in log lines.
    pub fn log_id(&self) -> &str {
        self.message_id.as_deref().unwrap_or("unknown")
    }
}

/// Result of a successful enqueue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}
