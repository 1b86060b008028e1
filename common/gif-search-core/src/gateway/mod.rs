//! Provider gateway
//!
//! A trait-based abstraction over GIF providers. The coordinator only ever
//! talks to a [`GifProvider`]; [`giphy::GiphyProvider`] is the production
//! implementation.
//!
//! Requests are validated when a [`PageRequest`] is built, so a provider
//! never sees an empty text query or a zero page size.

use async_trait::async_trait;

use crate::error::{GifError, GifResult};
use crate::types::{SearchMode, SearchResult};

pub mod giphy;

/// Trait for GIF providers
#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Fetch one page of the text search or trending feed
    async fn fetch_page(&self, request: &PageRequest) -> GifResult<SearchResult>;

    /// Check if this provider is configured and able to serve requests
    fn is_available(&self) -> bool;
}

/// A validated request for one page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    mode: SearchMode,
    query: Option<String>,
    offset: usize,
    limit: usize,
}

impl PageRequest {
    /// Build a request for the given mode; text queries must not be blank
    pub fn new(
        mode: SearchMode,
        query: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> GifResult<Self> {
        if limit == 0 {
            return Err(GifError::Validation(
                "Page size must be greater than zero".to_string(),
            ));
        }

        let query = match mode {
            SearchMode::Query => match query {
                Some(q) if !q.trim().is_empty() => Some(q.to_string()),
                _ => {
                    return Err(GifError::Validation(
                        "Search query cannot be empty".to_string(),
                    ))
                }
            },
            SearchMode::Trending => None,
        };

        Ok(Self {
            mode,
            query,
            offset,
            limit,
        })
    }

    pub fn search(query: &str, offset: usize, limit: usize) -> GifResult<Self> {
        Self::new(SearchMode::Query, Some(query), offset, limit)
    }

    pub fn trending(offset: usize, limit: usize) -> GifResult<Self> {
        Self::new(SearchMode::Trending, None, offset, limit)
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The search text; `None` for the trending feed
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
