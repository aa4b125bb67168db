// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Debounced, supersede-on-stale memory lookups.
//!
//! Every [`request`](DebouncedSearch::request) bumps a monotonic token and
//! schedules a lookup after the debounce interval.  A task checks the token
//! twice — after the debounce sleep and after the backend returns — and
//! drops its result if a newer request (or an [`invalidate`]
//! (DebouncedSearch::invalidate) call) has bumped the token in the
//! meantime.  Results are delivered over an unbounded channel the owner
//! drains with [`try_recv`](DebouncedSearch::try_recv), which filters stale
//! outcomes a second time.
//!
//! There is exactly one logical writer (the composer event loop), so no
//! further synchronization is needed beyond the token and the channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{MemorySearch, MemoryNote};

/// The result of one completed lookup.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Token of the request that produced this outcome.
    pub token: u64,
    /// Scope the lookup ran against.
    pub scope: String,
    /// Trimmed query text.
    pub query: String,
    /// Matching notes, best first.  Empty on backend failure.
    pub notes: Vec<MemoryNote>,
}

/// Debounce driver around a [`MemorySearch`] backend.
pub struct DebouncedSearch {
    searcher: Arc<dyn MemorySearch>,
    debounce: Duration,
    limit: usize,
    current: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl DebouncedSearch {
    pub fn new(searcher: Arc<dyn MemorySearch>, debounce: Duration, limit: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            searcher,
            debounce,
            limit,
            current: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        }
    }

    /// Schedule a lookup for `query` in `scope` after the debounce interval.
    ///
    /// Returns the request token.  Any previously pending request is
    /// superseded immediately.  Outside a tokio runtime the request is
    /// dropped (the composer degrades to "no suggestions").
    pub fn request(&self, scope: &str, query: &str) -> u64 {
        let token = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim().to_string();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(h) => h,
            Err(_) => {
                warn!("no async runtime; memory lookup skipped");
                return token;
            }
        };

        let searcher = Arc::clone(&self.searcher);
        let current = Arc::clone(&self.current);
        let tx = self.tx.clone();
        let scope = scope.to_string();
        let debounce = self.debounce;
        let limit = self.limit;

        handle.spawn(async move {
            tokio::time::sleep(debounce).await;
            if current.load(Ordering::SeqCst) != token {
                // Superseded while debouncing; never issue the lookup.
                return;
            }
            let notes = match searcher.search(&scope, &query, limit).await {
                Ok(notes) => notes,
                Err(e) => {
                    warn!(error = %e, query = %query, "memory lookup failed");
                    Vec::new()
                }
            };
            if current.load(Ordering::SeqCst) != token {
                debug!(token, "dropping superseded memory result");
                return;
            }
            let _ = tx.send(SearchOutcome { token, scope, query, notes });
        });

        token
    }

    /// Invalidate any pending request without scheduling a new one.
    ///
    /// Called when the suggestion list closes or the scope changes.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// The token of the most recent request (or invalidation).
    pub fn current_token(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Drain delivered outcomes, returning the newest one that is still
    /// current.  Stale outcomes are discarded, never returned.
    pub fn try_recv(&mut self) -> Option<SearchOutcome> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.token == self.current.load(Ordering::SeqCst) {
                latest = Some(outcome);
            } else {
                debug!(token = outcome.token, "discarding stale memory outcome");
            }
        }
        latest
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Backend whose per-query latency is scripted, for ordering tests.
    struct ScriptedSearcher {
        delays: HashMap<String, Duration>,
    }

    impl ScriptedSearcher {
        fn new(delays: &[(&str, u64)]) -> Self {
            Self {
                delays: delays
                    .iter()
                    .map(|(q, ms)| (q.to_string(), Duration::from_millis(*ms)))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl MemorySearch for ScriptedSearcher {
        async fn search(
            &self,
            scope: &str,
            query: &str,
            _limit: usize,
        ) -> Result<Vec<MemoryNote>, SearchError> {
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            Ok(vec![MemoryNote::new(scope, query, "")])
        }
    }

    use crate::SearchError;

    fn driver(searcher: ScriptedSearcher) -> DebouncedSearch {
        DebouncedSearch::new(Arc::new(searcher), Duration::from_millis(120), 10)
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_request_delivers_a_result() {
        let mut search = driver(ScriptedSearcher::new(&[("a", 5)]));
        let token = search.request("ws", "a");

        tokio::time::sleep(Duration::from_millis(200)).await;

        let outcome = search.try_recv().expect("outcome must arrive");
        assert_eq!(outcome.token, token);
        assert_eq!(outcome.query, "a");
        assert_eq!(outcome.notes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_retype_supersedes_before_lookup_fires() {
        let mut search = driver(ScriptedSearcher::new(&[("a", 5), ("ab", 5)]));
        search.request("ws", "a");
        let token_ab = search.request("ws", "ab");

        tokio::time::sleep(Duration::from_millis(400)).await;

        let outcome = search.try_recv().expect("newest request must resolve");
        assert_eq!(outcome.token, token_ab);
        assert_eq!(outcome.query, "ab");
        assert!(search.try_recv().is_none(), "the superseded request must never deliver");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_earlier_response_is_dropped_in_flight() {
        // "a" is slow enough that "ab" is requested while "a" is already
        // past its debounce and inside the backend call.
        let mut search = driver(ScriptedSearcher::new(&[("a", 500), ("ab", 5)]));
        search.request("ws", "a");

        // Let the "a" lookup start...
        tokio::time::sleep(Duration::from_millis(150)).await;
        // ...then supersede it while it is still in flight.
        let token_ab = search.request("ws", "ab");

        tokio::time::sleep(Duration::from_millis(800)).await;

        let outcome = search.try_recv().expect("newest request must resolve");
        assert_eq!(outcome.token, token_ab);
        assert_eq!(outcome.query, "ab", "late 'a' response must not win");
        assert!(search.try_recv().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_cancels_the_pending_request() {
        let mut search = driver(ScriptedSearcher::new(&[("a", 5)]));
        search.request("ws", "a");
        search.invalidate();

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(search.try_recv().is_none(), "invalidated request must not deliver");
    }

    #[tokio::test(start_paused = true)]
    async fn backend_failure_degrades_to_empty_notes() {
        struct FailingSearcher;

        #[async_trait]
        impl MemorySearch for FailingSearcher {
            async fn search(
                &self,
                _scope: &str,
                _query: &str,
                _limit: usize,
            ) -> Result<Vec<MemoryNote>, SearchError> {
                Err(SearchError::Backend("boom".into()))
            }
        }

        let mut search =
            DebouncedSearch::new(Arc::new(FailingSearcher), Duration::from_millis(120), 10);
        search.request("ws", "a");
        tokio::time::sleep(Duration::from_millis(200)).await;

        let outcome = search.try_recv().expect("failure still delivers an outcome");
        assert!(outcome.notes.is_empty(), "failed lookups degrade to no suggestions");
    }

    #[tokio::test(start_paused = true)]
    async fn query_is_trimmed_before_lookup() {
        let mut search = driver(ScriptedSearcher::new(&[("a", 5)]));
        search.request("ws", "  a  ");
        tokio::time::sleep(Duration::from_millis(200)).await;

        let outcome = search.try_recv().unwrap();
        assert_eq!(outcome.query, "a");
    }
}
