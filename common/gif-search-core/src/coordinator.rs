//! Search coordinator
//!
//! Owns one [`SearchSession`] and runs its fetches against a provider. The
//! session lock is only held while state changes, never across the provider
//! call, so a reset can start while an older fetch is still on the wire.
//! Errors stop here: every operation returns a [`FetchOutcome`] and failures
//! are recorded in the session for the consumer to display.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::gateway::GifProvider;
use crate::session::{FetchOutcome, FetchTicket, SearchSession, SessionSnapshot, SkipReason};
use crate::types::{GifRecord, SearchMode};

/// Coordinates paginated searches for a single session
#[derive(Clone)]
pub struct SearchCoordinator {
    provider: Arc<dyn GifProvider>,
    session: Arc<RwLock<SearchSession>>,
    page_size: usize,
}

impl SearchCoordinator {
    pub fn new(provider: Arc<dyn GifProvider>, page_size: usize) -> Self {
        Self::with_initial_page(provider, page_size, Vec::new())
    }

    /// Create a coordinator whose session starts with an already fetched page
    pub fn with_initial_page(
        provider: Arc<dyn GifProvider>,
        page_size: usize,
        initial: Vec<GifRecord>,
    ) -> Self {
        Self {
            provider,
            session: Arc::new(RwLock::new(SearchSession::new(initial))),
            page_size,
        }
    }

    pub fn provider(&self) -> &Arc<dyn GifProvider> {
        &self.provider
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Search by text, replacing the current results
    ///
    /// Repeating the active query is a no-op; an empty query always runs and
    /// fails validation.
    pub async fn search(&self, query: &str) -> FetchOutcome {
        self.reset(SearchMode::Query, Some(query), true, || true).await
    }

    /// Search for a scheduled input
    ///
    /// `is_current` is checked once the session lock is held; when it
    /// returns false the input was replaced and nothing is fetched.
    pub async fn search_scheduled(
        &self,
        query: &str,
        is_current: impl FnOnce() -> bool + Send,
    ) -> FetchOutcome {
        self.reset(SearchMode::Query, Some(query), true, is_current)
            .await
    }

    /// Load the trending feed, replacing the current results
    pub async fn load_trending(&self) -> FetchOutcome {
        self.reset(SearchMode::Trending, None, false, || true).await
    }

    /// Fetch the next page of the active query or feed and append it
    pub async fn load_more(&self) -> FetchOutcome {
        let ticket = {
            let mut session = self.session.write().await;
            match session.begin_append(self.page_size) {
                Ok(ticket) => ticket,
                Err(outcome) => {
                    tracing::debug!(?outcome, "Load more not started");
                    return outcome;
                }
            }
        };

        self.run(ticket).await
    }

    pub async fn clear_error(&self) {
        self.session.write().await.clear_error();
    }

    /// Clear the error and re-run the last reset operation
    ///
    /// Unlike `search`, a retry of the active query is not suppressed.
    pub async fn retry(&self) -> FetchOutcome {
        let query = {
            let mut session = self.session.write().await;
            session.clear_error();
            match session.mode() {
                SearchMode::Query => session
                    .active_query()
                    .filter(|q| !q.trim().is_empty())
                    .map(str::to_string),
                SearchMode::Trending => None,
            }
        };

        match query {
            Some(query) => {
                self.reset(SearchMode::Query, Some(&query), false, || true)
                    .await
            }
            None => self.load_trending().await,
        }
    }

    pub async fn snapshot(&self, include_gifs: bool) -> SessionSnapshot {
        self.session.read().await.snapshot(include_gifs)
    }

    /// Look up an accumulated record for the detail view
    pub async fn find(&self, id: &str) -> Option<GifRecord> {
        self.session.read().await.find(id).cloned()
    }

    async fn reset(
        &self,
        mode: SearchMode,
        query: Option<&str>,
        suppress_duplicate: bool,
        is_current: impl FnOnce() -> bool + Send,
    ) -> FetchOutcome {
        let ticket = {
            let mut session = self.session.write().await;

            if !is_current() {
                tracing::debug!(query = ?query, "Scheduled search replaced before it started");
                return FetchOutcome::Skipped {
                    reason: SkipReason::Superseded,
                };
            }

            if suppress_duplicate && query.is_some_and(|q| session.is_duplicate(q)) {
                tracing::debug!(query = ?query, "Duplicate search suppressed");
                return FetchOutcome::Skipped {
                    reason: SkipReason::DuplicateQuery,
                };
            }

            if session.is_loading() || session.is_loading_more() {
                tracing::debug!(
                    generation = session.generation(),
                    "Superseding fetch in flight"
                );
            }

            match session.begin_reset(mode, query, self.page_size) {
                Ok(ticket) => ticket,
                Err(outcome) => {
                    tracing::info!(?mode, ?outcome, "Search rejected");
                    return outcome;
                }
            }
        };

        self.run(ticket).await
    }

    async fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        tracing::info!(
            mode = ?ticket.request.mode(),
            kind = ?ticket.kind,
            offset = ticket.request.offset(),
            generation = ticket.generation,
            "Fetching GIFs"
        );

        let result = self.provider.fetch_page(&ticket.request).await;

        let outcome = self.session.write().await.complete(&ticket, result);

        match &outcome {
            FetchOutcome::Applied {
                received,
                offset,
                has_more,
            } => tracing::info!(received, offset, has_more, "GIF page applied"),
            FetchOutcome::Failed { error } => {
                tracing::error!(kind = ?error.kind, message = %error.message, "GIF fetch failed")
            }
            FetchOutcome::Stale { generation } => {
                tracing::debug!(generation, "Discarding superseded response")
            }
            FetchOutcome::Skipped { .. } => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, GifError};
    use crate::testing::{gifs, page, ScriptedProvider};

    fn coordinator(provider: &Arc<ScriptedProvider>) -> SearchCoordinator {
        SearchCoordinator::new(provider.clone(), 24)
    }

    /// Yield until the provider has seen `calls` requests
    async fn wait_for_calls(provider: &ScriptedProvider, calls: usize) {
        while provider.call_count() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_search_then_load_more() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        provider.push_page("cat", 24..48, 100);
        let coordinator = coordinator(&provider);

        let outcome = coordinator.search("cats").await;
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                received: 24,
                offset: 24,
                has_more: true
            }
        );

        let outcome = coordinator.load_more().await;
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                received: 24,
                offset: 48,
                has_more: true
            }
        );

        let snapshot = coordinator.snapshot(true).await;
        assert_eq!(snapshot.gifs.len(), 48);
        assert_eq!(snapshot.offset, 48);
        assert_eq!(snapshot.mode, SearchMode::Query);
        assert_eq!(snapshot.query_text.as_deref(), Some("cats"));

        let requests = provider.requests();
        assert_eq!(requests[1].offset(), 24);
        assert_eq!(requests[1].query(), Some("cats"));
    }

    #[tokio::test]
    async fn test_duplicate_search_issues_one_call() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        let outcome = coordinator.search("cats").await;

        assert_eq!(
            outcome,
            FetchOutcome::Skipped {
                reason: SkipReason::DuplicateQuery
            }
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_after_trending_is_not_duplicate() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        provider.push_page("t", 0..24, 100);
        provider.push_page("cat", 0..24, 100);
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        coordinator.load_trending().await;
        let outcome = coordinator.search("cats").await;

        assert!(matches!(outcome, FetchOutcome::Applied { .. }));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_search_fails_validation_without_network() {
        let provider = Arc::new(ScriptedProvider::new());
        let coordinator = coordinator(&provider);

        let outcome = coordinator.search("").await;
        match outcome {
            FetchOutcome::Failed { error } => {
                assert_eq!(error.kind, ErrorKind::Validation);
                assert_eq!(error.message, "Search query cannot be empty");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(provider.call_count(), 0);

        let snapshot = coordinator.snapshot(true).await;
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_some());
    }

    #[tokio::test]
    async fn test_load_more_noop_when_exhausted() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..10, 10);
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        let before = coordinator.snapshot(true).await;

        let outcome = coordinator.load_more().await;
        assert_eq!(
            outcome,
            FetchOutcome::Skipped {
                reason: SkipReason::Exhausted
            }
        );
        assert_eq!(provider.call_count(), 1);

        let after = coordinator.snapshot(true).await;
        assert_eq!(before.gifs, after.gifs);
        assert_eq!(before.offset, after.offset);
    }

    #[tokio::test]
    async fn test_load_more_noop_while_loading_more() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        let gate = provider.push_gated();
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;

        let pending = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.load_more().await }
        });
        wait_for_calls(&provider, 2).await;
        assert!(coordinator.snapshot(false).await.is_loading_more);

        let outcome = coordinator.load_more().await;
        assert_eq!(
            outcome,
            FetchOutcome::Skipped {
                reason: SkipReason::InFlight
            }
        );
        assert_eq!(provider.call_count(), 2);

        gate.send(Ok(page("cat", 24..48, 100))).unwrap();
        let outcome = pending.await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Applied { offset: 48, .. }));
    }

    #[tokio::test]
    async fn test_failed_load_more_preserves_records() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        provider.push_error(GifError::Transport("connection reset".to_string()));
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        let outcome = coordinator.load_more().await;
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));

        let snapshot = coordinator.snapshot(true).await;
        assert_eq!(snapshot.gifs.len(), 24);
        assert_eq!(snapshot.offset, 24);
        assert!(snapshot.has_more);
        assert!(!snapshot.is_loading_more);
        assert_eq!(snapshot.error.unwrap().message, "connection reset");
    }

    #[tokio::test]
    async fn test_failed_reset_leaves_empty_list() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        provider.push_error(GifError::EnvelopeStatus {
            status: 500,
            message: "Internal error".to_string(),
        });
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        coordinator.search("dogs").await;

        let snapshot = coordinator.snapshot(true).await;
        assert!(snapshot.gifs.is_empty());
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.error.unwrap().message, "Internal error");
    }

    #[tokio::test]
    async fn test_trending_transport_failure() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_error(GifError::Transport("dns error".to_string()));
        let coordinator = coordinator(&provider);

        coordinator.load_trending().await;

        let snapshot = coordinator.snapshot(true).await;
        assert_eq!(snapshot.mode, SearchMode::Trending);
        assert!(snapshot.gifs.is_empty());
        assert_eq!(snapshot.error.unwrap().message, "dns error");
    }

    #[tokio::test]
    async fn test_trending_is_not_deduplicated() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("t", 0..24, 100);
        provider.push_page("t", 0..24, 100);
        let coordinator = coordinator(&provider);

        coordinator.load_trending().await;
        coordinator.load_trending().await;
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_initial_page_loads_more_trending() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("t", 24..48, 500);
        let coordinator =
            SearchCoordinator::with_initial_page(provider.clone(), 24, gifs("t", 0..24));

        coordinator.load_more().await;

        let request = &provider.requests()[0];
        assert_eq!(request.mode(), SearchMode::Trending);
        assert_eq!(request.offset(), 24);
        assert_eq!(coordinator.snapshot(false).await.offset, 48);
    }

    #[tokio::test]
    async fn test_stale_search_response_discarded() {
        let provider = Arc::new(ScriptedProvider::new());
        let gate = provider.push_gated();
        provider.push_page("dog", 0..24, 50);
        let coordinator = coordinator(&provider);

        let slow = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.search("cats").await }
        });
        wait_for_calls(&provider, 1).await;

        let outcome = coordinator.search("dogs").await;
        assert!(matches!(outcome, FetchOutcome::Applied { .. }));

        gate.send(Ok(page("cat", 0..24, 100))).unwrap();
        let outcome = slow.await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Stale { .. }));

        let snapshot = coordinator.snapshot(true).await;
        assert_eq!(snapshot.query_text.as_deref(), Some("dogs"));
        assert_eq!(snapshot.gifs[0].id, "dog-0");
        assert_eq!(snapshot.total_count, 50);
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_retry_bypasses_duplicate_suppression() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_error(GifError::Transport("offline".to_string()));
        provider.push_page("cat", 0..24, 100);
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        assert!(coordinator.snapshot(false).await.error.is_some());

        let outcome = coordinator.retry().await;
        assert!(matches!(outcome, FetchOutcome::Applied { received: 24, .. }));
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1].query(), Some("cats"));
        assert!(coordinator.snapshot(false).await.error.is_none());
    }

    #[tokio::test]
    async fn test_retry_without_query_loads_trending() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_error(GifError::Transport("offline".to_string()));
        provider.push_page("t", 0..24, 100);
        let coordinator = coordinator(&provider);

        coordinator.load_trending().await;
        coordinator.retry().await;

        assert_eq!(provider.requests()[1].mode(), SearchMode::Trending);
        assert_eq!(coordinator.snapshot(false).await.offset, 24);
    }

    #[tokio::test]
    async fn test_clear_error() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_error(GifError::Transport("offline".to_string()));
        let coordinator = coordinator(&provider);

        coordinator.load_trending().await;
        coordinator.clear_error().await;

        let snapshot = coordinator.snapshot(false).await;
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.mode, SearchMode::Trending);
    }

    #[tokio::test]
    async fn test_scheduled_search_replaced_while_waiting_for_lock() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("dog", 0..24, 100);
        let coordinator = coordinator(&provider);
        let current = Arc::new(AtomicBool::new(true));

        let guard = coordinator.session.write().await;
        let task = {
            let coordinator = coordinator.clone();
            let current = Arc::clone(&current);
            tokio::spawn(async move {
                coordinator
                    .search_scheduled("cat", || current.load(Ordering::SeqCst))
                    .await
            })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        // A newer input arrives while the scheduled search waits on the lock
        current.store(false, Ordering::SeqCst);
        drop(guard);

        assert_eq!(
            task.await.unwrap(),
            FetchOutcome::Skipped {
                reason: SkipReason::Superseded
            }
        );
        assert_eq!(provider.call_count(), 0);

        coordinator.search("dogs").await;
        let snapshot = coordinator.snapshot(false).await;
        assert_eq!(snapshot.query_text.as_deref(), Some("dogs"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scheduled_search_runs_when_current() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        let coordinator = coordinator(&provider);

        let outcome = coordinator.search_scheduled("cats", || true).await;
        assert!(matches!(outcome, FetchOutcome::Applied { offset: 24, .. }));
    }

    #[tokio::test]
    async fn test_find_accumulated_record() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page("cat", 0..24, 100);
        let coordinator = coordinator(&provider);

        coordinator.search("cats").await;
        assert_eq!(coordinator.find("cat-5").await.unwrap().id, "cat-5");
        assert!(coordinator.find("dog-5").await.is_none());
    }
}
