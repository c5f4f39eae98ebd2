//! Web server module: the relay's sender.
//!
//! This module provides a thin web server that:
//! - Accepts `POST /webhook` with a `{"message": ...}` body
//! - Enqueues the message text onto the queue, one entry per request
//! - Reports parse failures as 400 and queue failures as 500
//!
//! Everything after the enqueue happens in the receiver.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, webhook, AppState, HealthResponse, RelayResponse};

/// Build the sender's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
