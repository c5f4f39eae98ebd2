//! Queue module: the relay's view of the message queue.
//!
//! This module provides:
//! - Message types exchanged with the queue
//! - The [`QueueService`] trait the sender and receiver depend on
//! - An SQS-backed implementation and an in-memory one
//!
//! ## Message lifecycle
//!
//! ```text
//! Enqueued → Leased (in flight) → Deleted
//!               └── lease expires → Enqueued
//! ```

pub mod memory;
pub mod sqs;
pub mod types;

use async_trait::async_trait;

use crate::error::RelayError;

pub use memory::MemoryQueue;
pub use sqs::SqsQueue;
pub use types::{RelayMessage, SendReceipt, WebhookRequest};

/// Narrow interface over an at-least-once message queue.
///
/// The queue identifier is bound when the implementation is constructed.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Enqueue one message with the given body.
    async fn enqueue(&self, body: &str) -> Result<SendReceipt, RelayError>;

    /// Receive up to `max_messages` messages, leasing each one.
    async fn receive(&self, max_messages: i32) -> Result<Vec<RelayMessage>, RelayError>;

    /// Delete the delivery identified by `receipt_handle`.
    async fn delete(&self, receipt_handle: &str) -> Result<(), RelayError>;
}
