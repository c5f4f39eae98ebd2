//! In-process queue with lease semantics.
//!
//! Mirrors the parts of SQS the relay relies on: received messages are
//! hidden for a visibility timeout, each delivery gets a fresh receipt handle,
//! and only the current handle can delete a message. Used by tests and local
//! dry runs.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::types::{RelayMessage, SendReceipt};
use super::QueueService;
use crate::error::RelayError;

/// Visibility timeout SQS applies by default.
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct Stored {
    id: String,
    body: String,
    lease: Option<Lease>,
}

#[derive(Debug)]
struct Lease {
    receipt_handle: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    next_receipt: u64,
    messages: VecDeque<Stored>,
}

#[derive(Debug)]
pub struct MemoryQueue {
    visibility_timeout: Duration,
    state: Mutex<State>,
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_TIMEOUT)
    }
}

impl MemoryQueue {
    pub fn new(visibility_timeout: Duration) -> Self {
        Self {
            visibility_timeout,
            state: Mutex::new(State::default()),
        }
    }

    /// Number of messages not yet deleted, leased or not.
    pub fn len(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of messages currently leased to a receiver.
    pub fn in_flight(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .messages
            .iter()
            .filter(|m| is_leased(m, now))
            .count()
    }

    /// Bodies of all undeleted messages in enqueue order.
    pub fn bodies(&self) -> Vec<String> {
        self.lock().messages.iter().map(|m| m.body.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave State half-updated.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn is_leased(message: &Stored, now: Instant) -> bool {
    message
        .lease
        .as_ref()
        .map(|lease| lease.expires_at > now)
        .unwrap_or(false)
}

#[async_trait]
impl QueueService for MemoryQueue {
    async fn enqueue(&self, body: &str) -> Result<SendReceipt, RelayError> {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("msg-{}", state.next_id);

        state.messages.push_back(Stored {
            id: id.clone(),
            body: body.to_string(),
            lease: None,
        });

        Ok(SendReceipt {
            message_id: Some(id),
        })
    }

    async fn receive(&self, max_messages: i32) -> Result<Vec<RelayMessage>, RelayError> {
        let max = usize::try_from(max_messages).unwrap_or(0);
        let now = Instant::now();
        let expires_at = now + self.visibility_timeout;

        let mut state = self.lock();
        let mut next_receipt = state.next_receipt;
        let mut received = Vec::new();

        for message in state.messages.iter_mut() {
            if received.len() >= max {
                break;
            }
            if is_leased(message, now) {
                continue;
            }

            next_receipt += 1;
            let receipt_handle = format!("{}-rh-{}", message.id, next_receipt);
            message.lease = Some(Lease {
                receipt_handle: receipt_handle.clone(),
                expires_at,
            });

            received.push(RelayMessage::new(
                message.id.clone(),
                message.body.clone(),
                receipt_handle,
            ));
        }

        state.next_receipt = next_receipt;
        Ok(received)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), RelayError> {
        let mut state = self.lock();
        let position = state.messages.iter().position(|m| {
            m.lease
                .as_ref()
                .map(|lease| lease.receipt_handle == receipt_handle)
                .unwrap_or(false)
        });

        match position {
            Some(index) => {
                state.messages.remove(index);
                Ok(())
            }
            None => Err(RelayError::queue(
                "delete_message",
                format!("receipt handle {receipt_handle} is not valid"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_then_receive() {
        let queue = MemoryQueue::default();
        let receipt = queue.enqueue("hello").await.unwrap();
        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));

        let messages = queue.receive(1).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hello");
        assert_eq!(messages[0].message_id.as_deref(), Some("msg-1"));
        assert_eq!(queue.in_flight(), 1);
    }

    #[tokio::test]
    async fn test_leased_messages_are_hidden() {
        let queue = MemoryQueue::default();
        queue.enqueue("a").await.unwrap();

        assert_eq!(queue.receive(10).await.unwrap().len(), 1);
        assert!(queue.receive(10).await.unwrap().is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_receive_respects_max() {
        let queue = MemoryQueue::default();
        for body in ["a", "b", "c"] {
            queue.enqueue(body).await.unwrap();
        }

        let first = queue.receive(2).await.unwrap();
        assert_eq!(first.len(), 2);

        let second = queue.receive(2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].body, "c");

        assert!(queue.receive(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_receipt_handle() {
        let queue = MemoryQueue::default();
        queue.enqueue("hello").await.unwrap();

        let message = queue.receive(1).await.unwrap().remove(0);
        let handle = message.receipt_handle.unwrap();

        queue.delete(&handle).await.unwrap();
        assert!(queue.is_empty());
        assert!(queue.delete(&handle).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_lease_redelivers_with_new_handle() {
        let queue = MemoryQueue::new(Duration::ZERO);
        queue.enqueue("hello").await.unwrap();

        let first = queue.receive(1).await.unwrap().remove(0);
        let second = queue.receive(1).await.unwrap().remove(0);

        assert_eq!(first.message_id, second.message_id);
        assert_ne!(first.receipt_handle, second.receipt_handle);

        // The stale handle no longer identifies the current delivery.
        let stale = first.receipt_handle.unwrap();
        assert!(queue.delete(&stale).await.is_err());
        queue.delete(&second.receipt_handle.unwrap()).await.unwrap();
        assert!(queue.is_empty());
    }
}
