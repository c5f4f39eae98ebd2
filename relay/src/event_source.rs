//! Lambda event-source adapter.
//!
//! An SQS event-source mapping delivers batches of records (up to the
//! mapping's batch size) to the function. Each record runs through the same
//! per-message pipeline as a poll cycle. Records whose secret lookup failed
//! are returned as partial batch failures so the platform leaves them on the
//! queue for redelivery.

use aws_lambda_events::event::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent, SqsMessage};
use tracing::{info, warn};

use crate::queue::RelayMessage;
use crate::receiver::{MessageOutcome, Receiver};

fn to_relay_message(record: SqsMessage) -> RelayMessage {
    RelayMessage {
        message_id: record.message_id,
        body: record.body.unwrap_or_default(),
        receipt_handle: record.receipt_handle,
    }
}

/// Process one event-source batch.
///
/// A failed record without a `messageId` is reported with an empty item
/// identifier, which the event-source mapping treats as a failure of the
/// whole batch.
pub async fn handle_batch(receiver: &Receiver, event: SqsEvent) -> SqsBatchResponse {
    let record_count = event.records.len();
    info!(record_count = record_count, "lambda_batch_received");

    let mut batch_item_failures = Vec::new();

    for record in event.records {
        let message = to_relay_message(record);

        if receiver.process_message(&message).await != MessageOutcome::SecretFailed {
            continue;
        }

        let item_identifier = match message.message_id {
            Some(id) => id,
            None => {
                warn!("lambda_failed_record_without_id");
                String::new()
            }
        };
        batch_item_failures.push(BatchItemFailure { item_identifier });
    }

    info!(
        record_count = record_count,
        failures = batch_item_failures.len(),
        "lambda_batch_complete"
    );

    SqsBatchResponse {
        batch_item_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::queue::{MemoryQueue, QueueService};
    use crate::secrets::MemorySecretStore;

    fn event(records: &[(&str, &str, &str)]) -> SqsEvent {
        let records: Vec<_> = records
            .iter()
            .map(|(id, handle, body)| {
                json!({
                    "messageId": id,
                    "receiptHandle": handle,
                    "body": body,
                    "attributes": {},
                    "messageAttributes": {},
                    "eventSource": "aws:sqs",
                    "eventSourceARN": "arn:aws:sqs:ap-southeast-2:000000000000:relay-queue",
                    "awsRegion": "ap-southeast-2"
                })
            })
            .collect();

        serde_json::from_value(json!({ "Records": records })).unwrap()
    }

    #[tokio::test]
    async fn test_successful_batch_has_no_failures() {
        let queue = Arc::new(MemoryQueue::default());
        queue.enqueue("hello").await.unwrap();
        let delivered = queue.receive(1).await.unwrap().remove(0);

        let receiver = Receiver::new(
            queue.clone(),
            Arc::new(MemorySecretStore::new().with_secret("MySecret", "S")),
            "MySecret",
        );

        let response = handle_batch(
            &receiver,
            event(&[(
                delivered.message_id.as_deref().unwrap(),
                delivered.receipt_handle.as_deref().unwrap(),
                "hello",
            )]),
        )
        .await;

        assert!(response.batch_item_failures.is_empty());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_secret_failures_are_reported() {
        let receiver = Receiver::new(
            Arc::new(MemoryQueue::default()),
            Arc::new(MemorySecretStore::new()),
            "MySecret",
        );

        let response = handle_batch(
            &receiver,
            event(&[("m-1", "rh-1", "first"), ("m-2", "rh-2", "second")]),
        )
        .await;

        let ids: Vec<_> = response
            .batch_item_failures
            .iter()
            .map(|f| f.item_identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["m-1", "m-2"]);
    }

    #[tokio::test]
    async fn test_failed_record_without_id_fails_whole_batch() {
        let receiver = Receiver::new(
            Arc::new(MemoryQueue::default()),
            Arc::new(MemorySecretStore::new()),
            "MySecret",
        );
        let event: SqsEvent = serde_json::from_value(json!({
            "Records": [{
                "receiptHandle": "rh-1",
                "body": "hello",
                "attributes": {},
                "messageAttributes": {}
            }]
        }))
        .unwrap();

        let response = handle_batch(&receiver, event).await;

        assert_eq!(response.batch_item_failures.len(), 1);
        assert_eq!(response.batch_item_failures[0].item_identifier, "");
    }

    #[tokio::test]
    async fn test_delete_failure_is_not_reported() {
        // Unknown receipt handles fail to delete, but the record was processed.
        let receiver = Receiver::new(
            Arc::new(MemoryQueue::default()),
            Arc::new(MemorySecretStore::new().with_secret("MySecret", "S")),
            "MySecret",
        );

        let response = handle_batch(&receiver, event(&[("m-1", "rh-stale", "hello")])).await;

        assert!(response.batch_item_failures.is_empty());
    }

    #[test]
    fn test_batch_response_serialization() {
        let response = SqsBatchResponse {
            batch_item_failures: vec![BatchItemFailure {
                item_identifier: "m-1".to_string(),
            }],
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "batchItemFailures": [{ "itemIdentifier": "m-1" }] })
        );
    }
}
