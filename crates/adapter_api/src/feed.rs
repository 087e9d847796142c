//! Periodic background fetches.
//!
//! A feed calls its fetch function immediately and then once per interval,
//! forwarding every outcome to the UI event channel. Failures are reported
//! but never slow the feed down; the next tick simply tries again.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Outcome of one fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate<T> {
    /// Fresh data
    Loaded(T),
    /// The fetch failed; the message is suitable for display
    Failed(String),
}

impl<T> FeedUpdate<T> {
    /// Wrap a fetch result
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => FeedUpdate::Loaded(value),
            Err(e) => FeedUpdate::Failed(e.to_string()),
        }
    }

    /// Whether this update carries data
    pub fn is_loaded(&self) -> bool {
        matches!(self, FeedUpdate::Loaded(_))
    }
}

/// Spawn a polling feed.
///
/// `wrap` turns each update into the receiver's event type. The task ends
/// when the receiver is dropped.
pub fn spawn_feed<T, E, F, Fut, W>(
    name: &'static str,
    period: Duration,
    mut fetch: F,
    wrap: W,
    tx: UnboundedSender<E>,
) -> JoinHandle<()>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    W: Fn(FeedUpdate<T>) -> E + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(feed = name, period_secs = period.as_secs(), "Feed started");

        loop {
            ticker.tick().await;
            let result = fetch().await;
            match &result {
                Ok(_) => debug!(feed = name, "Feed refreshed"),
                Err(e) => warn!(feed = name, error = %e, "Feed refresh failed"),
            }
            if tx.send(wrap(FeedUpdate::from_result(result))).is_err() {
                debug!(feed = name, "Feed receiver dropped");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_feed_fetches_immediately_then_per_interval() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_feed(
            "test",
            Duration::from_secs(30),
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<u32, ApiError>(n) }
            },
            |update| update,
            tx,
        );

        assert_eq!(rx.recv().await, Some(FeedUpdate::Loaded(0)));
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(rx.recv().await, Some(FeedUpdate::Loaded(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_feed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut fail = true;
        let handle = spawn_feed(
            "flaky",
            Duration::from_secs(5),
            move || {
                let result = if fail {
                    Err(ApiError::Http {
                        status: 503,
                        message: "Service unavailable".to_string(),
                    })
                } else {
                    Ok("gates")
                };
                fail = !fail;
                async move { result }
            },
            |update| update,
            tx,
        );

        assert_eq!(rx.recv().await, Some(FeedUpdate::Failed("Service unavailable".to_string())));
        assert_eq!(rx.recv().await, Some(FeedUpdate::Loaded("gates")));
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<FeedUpdate<()>>();
        drop(rx);
        let handle = spawn_feed("orphan", Duration::from_secs(5), || async { Ok(()) }, |u| u, tx);
        handle.await.unwrap();
    }
}
