//! Debounced quick search.
//!
//! Keystrokes go in through a [`SearchHandle`]. Each one supersedes any
//! request still in flight; once input has been quiet for the debounce
//! period a single backend request is issued. A response is only applied
//! if no newer keystroke arrived since its request was issued, so results
//! never appear out of order.

use std::sync::Arc;
use std::time::Duration;

use targeting_core::search::{combine, SearchHit, SearchSequence, SearchTicket};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::resources::search::SearchBackend;

/// Where a result list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    /// Local pages merged with backend hits
    Merged,
    /// Backend failed; local pages only
    Fallback,
    /// Query too short; the list is empty
    Cleared,
}

/// Results for the latest query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchUpdate {
    /// Query as typed
    pub query: String,
    /// Hits to display
    pub results: Vec<SearchHit>,
    /// Origin of the hits
    pub source: SearchSource,
    /// Backend error message, on fallback
    pub error: Option<String>,
}

/// Debounce settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Quiet period before a request is issued
    pub debounce: Duration,
    /// Minimum trimmed query length, in characters
    pub min_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_chars: 2,
        }
    }
}

/// Input side of a running search driver
#[derive(Debug, Clone)]
pub struct SearchHandle {
    input: UnboundedSender<String>,
}

impl SearchHandle {
    /// Submit the current query text. Returns false if the driver stopped.
    pub fn input(&self, query: impl Into<String>) -> bool {
        self.input.send(query.into()).is_ok()
    }
}

type Response = (SearchTicket, String, Result<Vec<SearchHit>, ApiError>);

/// Start the search driver.
///
/// Updates are passed through `wrap` onto `tx`. The driver stops when every
/// [`SearchHandle`] is dropped or the receiver of `tx` goes away.
pub fn spawn_search<E, W>(
    backend: Arc<dyn SearchBackend>,
    options: SearchOptions,
    wrap: W,
    tx: UnboundedSender<E>,
) -> (SearchHandle, JoinHandle<()>)
where
    E: Send + 'static,
    W: Fn(SearchUpdate) -> E + Send + 'static,
{
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let (response_tx, mut response_rx) = mpsc::unbounded_channel::<Response>();

    let task = tokio::spawn(async move {
        let mut sequence = SearchSequence::new();
        let mut pending: Option<(String, Instant)> = None;

        loop {
            let deadline = pending.as_ref().map_or_else(Instant::now, |(_, at)| *at);
            tokio::select! {
                query = input_rx.recv() => {
                    let Some(query) = query else { break };
                    sequence.invalidate();
                    let trimmed = query.trim();
                    if trimmed.chars().count() < options.min_chars {
                        pending = None;
                        let update = SearchUpdate {
                            query,
                            results: Vec::new(),
                            source: SearchSource::Cleared,
                            error: None,
                        };
                        if tx.send(wrap(update)).is_err() {
                            break;
                        }
                    } else {
                        pending = Some((trimmed.to_string(), Instant::now() + options.debounce));
                    }
                }
                _ = sleep_until(deadline), if pending.is_some() => {
                    let Some((query, _)) = pending.take() else { continue };
                    let ticket = sequence.issue();
                    debug!(ticket = ticket.value(), query = %query, "Issuing search");
                    let backend = backend.clone();
                    let response_tx = response_tx.clone();
                    tokio::spawn(async move {
                        let result = backend.search(&query).await;
                        let _ = response_tx.send((ticket, query, result));
                    });
                }
                Some((ticket, query, result)) = response_rx.recv() => {
                    if !sequence.is_current(ticket) {
                        debug!(ticket = ticket.value(), query = %query, "Discarding stale search response");
                        continue;
                    }
                    let update = match result {
                        Ok(remote) => SearchUpdate {
                            results: combine(&query, Some(remote)),
                            query,
                            source: SearchSource::Merged,
                            error: None,
                        },
                        Err(e) => {
                            warn!(query = %query, error = %e, "Search failed, showing local pages only");
                            SearchUpdate {
                                results: combine(&query, None),
                                query,
                                source: SearchSource::Fallback,
                                error: Some(e.to_string()),
                            }
                        }
                    };
                    if tx.send(wrap(update)).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Search driver stopped");
    });

    (SearchHandle { input: input_tx }, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use targeting_core::search::SearchKind;

    /// Answers after a per-query delay and records every request.
    struct ScriptedBackend {
        calls: Mutex<Vec<String>>,
        slow_query: &'static str,
        fail: bool,
    }

    impl ScriptedBackend {
        fn new(slow_query: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                slow_query,
                fail: false,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
            self.calls.lock().unwrap().push(query.to_string());
            let delay = if query == self.slow_query { 500 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if self.fail {
                return Err(ApiError::Http {
                    status: 500,
                    message: "Search index offline".to_string(),
                });
            }
            Ok(vec![SearchHit {
                title: format!("Result for {query}"),
                path: format!("/targets/{query}"),
                kind: SearchKind::Target,
                subtitle: None,
            }])
        }
    }

    fn start(backend: Arc<ScriptedBackend>) -> (SearchHandle, mpsc::UnboundedReceiver<SearchUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (handle, _task) = spawn_search(backend, SearchOptions::default(), |u| u, tx);
        (handle, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let backend = Arc::new(ScriptedBackend::new("al"));
        let (handle, mut rx) = start(backend.clone());

        handle.input("al");
        tokio::time::sleep(Duration::from_millis(350)).await;
        // "al" is now in flight and will answer after "alpha".
        handle.input("alpha");

        let update = rx.recv().await.unwrap();
        assert_eq!(update.query, "alpha");
        assert_eq!(update.source, SearchSource::Merged);
        assert_eq!(update.results[0].path, "/targets/alpha");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(backend.calls(), vec!["al", "alpha"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_issues_one_request() {
        let backend = Arc::new(ScriptedBackend::new(""));
        let (handle, mut rx) = start(backend.clone());

        for query in ["a", "al", "alp", "alph"] {
            handle.input(query);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let cleared = rx.recv().await.unwrap();
        assert_eq!(cleared.source, SearchSource::Cleared);
        assert!(cleared.results.is_empty());

        let update = rx.recv().await.unwrap();
        assert_eq!(update.query, "alph");
        assert_eq!(backend.calls(), vec!["alph"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_failure_falls_back_to_pages() {
        let backend = Arc::new(ScriptedBackend {
            fail: true,
            ..ScriptedBackend::new("")
        });
        let (handle, mut rx) = start(backend);

        handle.input("  roe ");
        let update = rx.recv().await.unwrap();
        assert_eq!(update.source, SearchSource::Fallback);
        assert_eq!(update.error.as_deref(), Some("Search index offline"));
        let paths: Vec<&str> = update.results.iter().map(|h| h.path.as_str()).collect();
        assert_eq!(paths, vec!["/gates", "/roe"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_query_cancels_pending_request() {
        let backend = Arc::new(ScriptedBackend::new(""));
        let (handle, mut rx) = start(backend.clone());

        handle.input("bridge");
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.input("");

        assert_eq!(rx.recv().await.unwrap().source, SearchSource::Cleared);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert!(backend.calls().is_empty());
    }
}
