//! SQS-backed queue.

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::Message;
use aws_sdk_sqs::Client;
use tracing::{debug, info};

use super::types::{RelayMessage, SendReceipt};
use super::QueueService;
use crate::error::RelayError;

/// [`QueueService`] over a single SQS queue.
#[derive(Clone, Debug)]
pub struct SqsQueue {
    client: Client,
    queue_url: String,
    wait_time_seconds: i32,
}

impl SqsQueue {
    pub fn new(client: Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
            wait_time_seconds: 0,
        }
    }

    /// Long-poll each receive call for up to `seconds`.
    pub fn with_wait_time(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds;
        self
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl QueueService for SqsQueue {
    async fn enqueue(&self, body: &str) -> Result<SendReceipt, RelayError> {
        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| RelayError::queue("send_message", DisplayErrorContext(&e)))?;

        info!(
            queue_url = %self.queue_url,
            message_id = ?output.message_id(),
            body_length = body.len(),
            "sqs_message_sent"
        );

        Ok(SendReceipt {
            message_id: output.message_id,
        })
    }

    async fn receive(&self, max_messages: i32) -> Result<Vec<RelayMessage>, RelayError> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await
            .map_err(|e| RelayError::queue("receive_message", DisplayErrorContext(&e)))?;

        let messages: Vec<RelayMessage> = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(from_sqs_message)
            .collect();

        debug!(
            queue_url = %self.queue_url,
            count = messages.len(),
            "sqs_messages_received"
        );

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), RelayError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| RelayError::queue("delete_message", DisplayErrorContext(&e)))?;

        Ok(())
    }
}

fn from_sqs_message(message: Message) -> RelayMessage {
    RelayMessage {
        message_id: message.message_id,
        body: message.body.unwrap_or_default(),
        receipt_handle: message.receipt_handle,
    }
}
