//! Search session state
//!
//! `SearchSession` is the state of one paginated search: the active query or
//! feed, the accumulated records, the offset of the next page and the
//! loading/error flags. It is a plain state machine with no I/O; the
//! coordinator drives it around the provider call.
//!
//! Every fetch is stamped with a generation when it starts. A completion
//! whose generation is no longer current was superseded by a newer reset and
//! is dropped without touching the session.

use serde::Serialize;

use crate::error::{ErrorInfo, GifResult};
use crate::gateway::PageRequest;
use crate::types::{GifRecord, SearchMode, SearchResult};

/// Why an operation did not start a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The query is already the active one
    DuplicateQuery,
    /// Another fetch is still running
    InFlight,
    /// The provider has no more results for this query or feed
    Exhausted,
    /// A newer input replaced this scheduled search before it started
    Superseded,
}

/// The result of a search operation as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The page was applied to the session
    Applied {
        received: usize,
        offset: usize,
        has_more: bool,
    },
    /// Nothing was fetched
    Skipped { reason: SkipReason },
    /// The fetch failed; the error is also stored in the session
    Failed { error: ErrorInfo },
    /// A newer reset superseded this fetch; its result was discarded
    Stale { generation: u64 },
}

/// Whether a fetch replaces or extends the accumulated records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Reset,
    Append,
}

/// A fetch that has been admitted by the session and must be completed
#[derive(Debug)]
pub struct FetchTicket {
    pub generation: u64,
    pub kind: FetchKind,
    pub request: PageRequest,
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: SearchMode,
    pub query_text: Option<String>,
    pub offset: usize,
    pub total_count: usize,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error: Option<ErrorInfo>,
    pub gifs: Vec<GifRecord>,
}

/// State of one paginated search
#[derive(Debug, Clone)]
pub struct SearchSession {
    mode: SearchMode,
    active_query: Option<String>,
    offset: usize,
    total_count: usize,
    accumulated: Vec<GifRecord>,
    has_more: bool,
    loading: bool,
    loading_more: bool,
    error: Option<ErrorInfo>,
    generation: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SearchSession {
    /// Create a session seeded with an optional first page of trending GIFs
    pub fn new(initial: Vec<GifRecord>) -> Self {
        Self {
            mode: SearchMode::Trending,
            active_query: None,
            offset: initial.len(),
            total_count: 0,
            accumulated: initial,
            has_more: true,
            loading: false,
            loading_more: false,
            error: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The query driving the session; `None` for the trending feed
    pub fn active_query(&self) -> Option<&str> {
        self.active_query.as_deref()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn gifs(&self) -> &[GifRecord] {
        &self.accumulated
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn find(&self, id: &str) -> Option<&GifRecord> {
        self.accumulated.iter().find(|gif| gif.id == id)
    }

    /// True when `query` would be suppressed as a repeat of the active query
    pub fn is_duplicate(&self, query: &str) -> bool {
        !query.is_empty() && self.active_query.as_deref() == Some(query)
    }

    /// Start a reset fetch, clearing the accumulated records
    ///
    /// A reset always starts, superseding any fetch still in flight. When
    /// the request itself is invalid the session ends up cleared with the
    /// validation error recorded and no ticket is issued.
    pub fn begin_reset(
        &mut self,
        mode: SearchMode,
        query: Option<&str>,
        limit: usize,
    ) -> Result<FetchTicket, FetchOutcome> {
        self.generation += 1;
        self.mode = mode;
        self.active_query = match mode {
            SearchMode::Query => query.map(str::to_string),
            SearchMode::Trending => None,
        };
        self.offset = 0;
        self.total_count = 0;
        self.accumulated.clear();
        self.has_more = false;
        self.loading_more = false;
        self.error = None;

        match PageRequest::new(mode, query, 0, limit) {
            Ok(request) => {
                self.loading = true;
                Ok(FetchTicket {
                    generation: self.generation,
                    kind: FetchKind::Reset,
                    request,
                })
            }
            Err(e) => {
                self.loading = false;
                let error = ErrorInfo::from(&e);
                self.error = Some(error.clone());
                Err(FetchOutcome::Failed { error })
            }
        }
    }

    /// Start an append fetch at the current offset
    pub fn begin_append(&mut self, limit: usize) -> Result<FetchTicket, FetchOutcome> {
        if self.loading || self.loading_more {
            return Err(FetchOutcome::Skipped {
                reason: SkipReason::InFlight,
            });
        }
        if !self.has_more {
            return Err(FetchOutcome::Skipped {
                reason: SkipReason::Exhausted,
            });
        }

        let request = match PageRequest::new(
            self.mode,
            self.active_query.as_deref(),
            self.offset,
            limit,
        ) {
            Ok(request) => request,
            Err(e) => {
                let error = ErrorInfo::from(&e);
                self.error = Some(error.clone());
                return Err(FetchOutcome::Failed { error });
            }
        };

        self.generation += 1;
        self.loading_more = true;
        self.error = None;

        Ok(FetchTicket {
            generation: self.generation,
            kind: FetchKind::Append,
            request,
        })
    }

    /// Apply the result of a fetch started with `ticket`
    pub fn complete(&mut self, ticket: &FetchTicket, result: GifResult<SearchResult>) -> FetchOutcome {
        if ticket.generation != self.generation {
            return FetchOutcome::Stale {
                generation: ticket.generation,
            };
        }

        match ticket.kind {
            FetchKind::Reset => self.loading = false,
            FetchKind::Append => self.loading_more = false,
        }

        match result {
            Ok(page) => {
                let received = page.gifs.len();
                match ticket.kind {
                    FetchKind::Reset => self.accumulated = page.gifs,
                    FetchKind::Append => self.accumulated.extend(page.gifs),
                }
                self.offset = ticket.request.offset() + received;
                self.total_count = page.total_count;
                self.has_more = self.offset < self.total_count;

                FetchOutcome::Applied {
                    received,
                    offset: self.offset,
                    has_more: self.has_more,
                }
            }
            Err(e) => {
                let error = ErrorInfo::from(&e);
                self.error = Some(error.clone());
                FetchOutcome::Failed { error }
            }
        }
    }

    pub fn snapshot(&self, include_gifs: bool) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            query_text: self.active_query.clone(),
            offset: self.offset,
            total_count: self.total_count,
            has_more: self.has_more,
            is_loading: self.loading,
            is_loading_more: self.loading_more,
            error: self.error.clone(),
            gifs: if include_gifs {
                self.accumulated.clone()
            } else {
                Vec::new()
            },
        }
    }
}
