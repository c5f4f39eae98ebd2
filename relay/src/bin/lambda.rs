//! Relay Lambda - receiver behind an SQS event-source mapping.
//!
//! The platform delivers batches of queue records; each record goes through
//! the receiver's per-message pipeline and records whose secret lookup failed
//! are reported back as partial batch failures.

use std::sync::Arc;

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

use relay::event_source::handle_batch;
use relay::{
    load_sdk_config, telemetry, ClientSettings, Config, Receiver, Role, SecretsManagerStore,
    SqsQueue,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    info!("lambda_starting");

    let config = Config::from_env();
    config.validate_for(Role::Receiver)?;

    let settings = ClientSettings::resolve(&config);
    let sdk_config = load_sdk_config(&settings).await;

    let queue = SqsQueue::new(aws_sdk_sqs::Client::new(&sdk_config), config.require_queue_url()?);
    let secrets = SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&sdk_config));
    let receiver = Arc::new(Receiver::from_config(
        &config,
        Arc::new(queue),
        Arc::new(secrets),
    )?);

    info!(
        backend = config.backend.name(),
        redact_secrets = config.redact_secrets,
        "lambda_ready"
    );

    run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let receiver = Arc::clone(&receiver);
        async move { Ok::<_, Error>(handle_batch(&receiver, event.payload).await) }
    }))
    .await
}
