//! Webhook endpoint handlers.
//!
//! The webhook handler only parses the body and enqueues its `message`
//! field. Responses wrap their text in a `{"body": ...}` object.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::queue::{QueueService, WebhookRequest};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<dyn QueueService>,
}

impl AppState {
    pub fn new(queue: Arc<dyn QueueService>) -> Self {
        Self { queue }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook
// =============================================================================

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub body: String,
}

fn reply(status: StatusCode, body: String) -> (StatusCode, Json<RelayResponse>) {
    (status, Json(RelayResponse { body }))
}

/// Webhook endpoint.
///
/// The raw body is parsed here rather than through axum's `Json` extractor
/// so that parse failures produce the relay's own 400 response.
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    info!(body_length = body.len(), "webhook_received");

    let request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "webhook_parse_failed");
            return reply(
                StatusCode::BAD_REQUEST,
                format!("Error parsing request: {e}"),
            );
        }
    };

    match state.queue.enqueue(&request.message).await {
        Ok(receipt) => {
            info!(
                message_id = ?receipt.message_id,
                message_length = request.message.len(),
                "webhook_enqueued"
            );
            reply(StatusCode::OK, "Message sent successfully".to_string())
        }
        Err(e) => {
            error!(error = %e, "webhook_enqueue_failed");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to send message: {e}"),
            )
        }
    }
}
