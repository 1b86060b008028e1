//! Input debouncing
//!
//! Collapses a burst of input changes into a single search of the final
//! text. Each change cancels the scheduled search and schedules a new one
//! after the configured delay. Cancelling only prevents a scheduled search
//! from starting; a search that has already reached the coordinator always
//! runs to completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::coordinator::SearchCoordinator;
use crate::session::FetchOutcome;

/// Debounces text input in front of a [`SearchCoordinator`]
pub struct InputDebouncer {
    coordinator: SearchCoordinator,
    delay: Duration,
    /// Bumped on every input; a scheduled search only fires if its ticket is current
    ticket: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl InputDebouncer {
    pub fn new(coordinator: SearchCoordinator, delay: Duration) -> Self {
        Self {
            coordinator,
            delay,
            ticket: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an input change and schedule a search of `text`
    ///
    /// Must be called from within a tokio runtime.
    pub fn input_changed(&self, text: &str) {
        let ticket = self.cancel();
        let query = text.trim().to_string();
        let current = Arc::clone(&self.ticket);
        let coordinator = self.coordinator.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if current.load(Ordering::SeqCst) != ticket {
                return;
            }
            if query.is_empty() {
                tracing::debug!("Debounced input is empty, nothing to search");
                return;
            }

            tracing::debug!(query = %query, "Debounced search firing");
            coordinator
                .search_scheduled(&query, || current.load(Ordering::SeqCst) == ticket)
                .await;
        });

        self.store_pending(handle);
    }

    /// Search immediately, dropping any scheduled search
    ///
    /// Returns `None` when the text is blank.
    pub async fn submit(&self, text: &str) -> Option<FetchOutcome> {
        self.cancel();
        let query = text.trim();
        if query.is_empty() {
            return None;
        }

        Some(self.coordinator.search(query).await)
    }

    /// The input was cleared: drop any scheduled search and show trending
    pub async fn clear(&self) -> FetchOutcome {
        self.cancel();
        self.coordinator.load_trending().await
    }

    /// Invalidate the scheduled search, returning the new ticket
    pub fn cancel(&self) -> u64 {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut pending) = self.pending.lock() {
            pending.take();
        }
        ticket
    }

    /// Whether a scheduled search has not yet fired or finished
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|p| p.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn store_pending(&self, handle: JoinHandle<()>) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(handle);
        }
    }
}

impl Drop for InputDebouncer {
    fn drop(&mut self) {
        self.ticket.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
