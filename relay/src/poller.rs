//! Poll loop for the long-running receiver.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use relay::shutdown::shutdown_signal;
use relay::{PollSummary, Receiver};

/// Run poll cycles until SIGINT or SIGTERM arrives.
///
/// The signal handlers are installed on a spawned task before the first
/// cycle starts, so a signal during a long first receive is not lost.
pub async fn run(receiver: Receiver, interval: Duration) {
    let signal = tokio::spawn(shutdown_signal());

    run_until(&receiver, interval, async {
        let _ = signal.await;
    })
    .await;
}

/// Run poll cycles until `shutdown` completes.
///
/// A cycle that returned a full batch is followed immediately by another, so
/// a backlog drains without waiting out the interval. A cycle in progress is
/// always allowed to finish.
async fn run_until<F>(receiver: &Receiver, interval: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    info!(interval_ms = interval.as_millis() as u64, "receiver_ready");

    loop {
        let summary = receiver.poll_once().await;
        let delay = next_delay(&summary, receiver.max_messages(), interval);

        tokio::select! {
            _ = &mut shutdown => {
                info!("receiver_stopping");
                break;
            }
            _ = sleep(delay) => {}
        }
    }
}

fn next_delay(summary: &PollSummary, max_messages: i32, interval: Duration) -> Duration {
    let full_batch = !summary.receive_failed
        && summary.received > 0
        && summary.received >= max_messages.max(1) as usize;

    if full_batch {
        Duration::ZERO
    } else {
        interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use relay::{MemoryQueue, MemorySecretStore, QueueService};

    const INTERVAL: Duration = Duration::from_secs(5);

    fn summary(received: usize) -> PollSummary {
        PollSummary {
            received,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_batch_polls_again_immediately() {
        assert_eq!(next_delay(&summary(1), 1, INTERVAL), Duration::ZERO);
        assert_eq!(next_delay(&summary(10), 10, INTERVAL), Duration::ZERO);
    }

    #[test]
    fn test_partial_or_empty_batch_waits() {
        assert_eq!(next_delay(&summary(0), 1, INTERVAL), INTERVAL);
        assert_eq!(next_delay(&summary(3), 10, INTERVAL), INTERVAL);
    }

    #[test]
    fn test_receive_failure_waits() {
        let failed = PollSummary {
            receive_failed: true,
            ..Default::default()
        };
        assert_eq!(next_delay(&failed, 1, INTERVAL), INTERVAL);
    }

    #[tokio::test]
    async fn test_shutdown_during_first_cycle_stops_loop() {
        let queue = Arc::new(MemoryQueue::default());
        queue.enqueue("hello").await.unwrap();
        let receiver = Receiver::new(
            queue.clone(),
            Arc::new(MemorySecretStore::new().with_secret("MySecret", "S")),
            "MySecret",
        );

        // Resolves while the first cycle is still running.
        let signal = tokio::spawn(async {});

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            run_until(&receiver, Duration::from_secs(3600), async {
                let _ = signal.await;
            }),
        )
        .await;

        assert!(stopped.is_ok());
        assert!(queue.is_empty());
    }
}
