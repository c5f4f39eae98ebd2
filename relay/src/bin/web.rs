//! Relay Web Server - webhook sender.
//!
//! This binary provides a thin web server that:
//! - Receives `POST /webhook` requests
//! - Enqueues the `message` field onto the relay queue
//! - Returns 200 once the queue has accepted it
//!
//! Everything after the enqueue happens in the receiver.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use relay::shutdown::shutdown_signal;
use relay::web::router;
use relay::{load_sdk_config, telemetry, AppState, ClientSettings, Config, Role, SqsQueue};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    config
        .validate_for(Role::Sender)
        .context("Invalid sender configuration")?;

    info!(
        port = config.port,
        backend = config.backend.name(),
        region = %config.region,
        "config_loaded"
    );

    // Create SQS client
    let settings = ClientSettings::resolve(&config);
    let sdk_config = load_sdk_config(&settings).await;
    let queue = SqsQueue::new(aws_sdk_sqs::Client::new(&sdk_config), config.require_queue_url()?);
    info!(queue_url = %queue.queue_url(), "sqs_queue_ready");

    // Build the router
    let app = router(AppState::new(Arc::new(queue)));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("web_server_shutting_down");
        })
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}
