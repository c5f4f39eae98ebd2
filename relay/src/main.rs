//! Relay Receiver - drains the relay queue.
//!
//! Runs poll cycles against the queue until SIGINT/SIGTERM. With `--once`
//! (or `RECEIVER_ONCE=true`) it performs a single cycle and exits, for use
//! from a scheduler.

mod poller;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use relay::{
    load_sdk_config, telemetry, ClientSettings, Config, Receiver, Role, SecretsManagerStore,
    SqsQueue,
};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("receiver_starting");

    // Load configuration from environment
    let config = Config::from_env();
    config
        .validate_for(Role::Receiver)
        .context("Invalid receiver configuration")?;

    let once = config.receiver_once || std::env::args().any(|arg| arg == "--once");

    info!(
        backend = config.backend.name(),
        region = %config.region,
        max_messages = config.receive_max_messages,
        wait_seconds = config.receive_wait_seconds,
        poll_interval_ms = config.poll_interval_ms,
        redact_secrets = config.redact_secrets,
        once = once,
        "config_loaded"
    );

    let settings = ClientSettings::resolve(&config);
    let sdk_config = load_sdk_config(&settings).await;

    let queue = SqsQueue::new(aws_sdk_sqs::Client::new(&sdk_config), config.require_queue_url()?)
        .with_wait_time(config.receive_wait_seconds);
    let secrets = SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config));

    let receiver = Receiver::from_config(&config, Arc::new(queue), Arc::new(secrets))?;

    if once {
        receiver.poll_once().await;
    } else {
        poller::run(receiver, config.poll_interval()).await;
    }

    info!("receiver_shutdown_complete");

    Ok(())
}
