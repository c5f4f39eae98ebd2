//! Webhook relay - a queue-mediated message relay.
//!
//! This library provides shared modules for the three relay binaries:
//! - `relay-web`: HTTP sender that enqueues webhook messages
//! - `relay-receiver`: poller that drains the queue
//! - `relay-lambda`: the same receiver behind an SQS event-source mapping
//!
//! ## Architecture
//!
//! ```text
//! POST /webhook → Sender → SQS → Receiver → Secrets Manager
//!                                    └── delete by receipt handle
//! ```
//!
//! Delivery is at-least-once: a message that is not deleted is redelivered
//! when its lease expires, so consumers must tolerate duplicates.

pub mod aws;
pub mod config;
pub mod error;
pub mod event_source;
pub mod queue;
pub mod receiver;
pub mod redact;
pub mod secrets;
pub mod shutdown;
pub mod telemetry;
pub mod web;

// Re-export commonly used types
pub use aws::{load_sdk_config, ClientSettings};
pub use config::{Backend, Config, Role};
pub use error::RelayError;
pub use queue::{MemoryQueue, QueueService, RelayMessage, SqsQueue, WebhookRequest};
pub use receiver::{MessageOutcome, PollSummary, Receiver};
pub use secrets::{MemorySecretStore, SecretStore, SecretValue, SecretsManagerStore};
pub use web::AppState;
