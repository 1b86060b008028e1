//! GIF Search Core - paginated GIF search over the Giphy API
//!
//! This crate provides the pieces behind the gif-search MCP server:
//!
//! - **Gateway**: [`GifProvider`] trait and the [`GiphyProvider`] client
//! - **Session**: [`SearchSession`] state machine (offset, accumulated
//!   records, loading/error flags, request generations)
//! - **Coordinator**: [`SearchCoordinator`] running search, trending and
//!   load-more fetches against a provider
//! - **Debounce**: [`InputDebouncer`] turning keystrokes into searches
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gif_search_core::{Config, GiphyProvider, SearchCoordinator};
//!
//! let config = Config::load()?;
//! let provider = Arc::new(GiphyProvider::new(config.giphy.clone())?);
//! let coordinator = SearchCoordinator::new(provider, config.search.page_size);
//!
//! coordinator.search("cats").await;
//! coordinator.load_more().await;
//! let snapshot = coordinator.snapshot(true).await;
//! ```

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items at crate root
pub use config::{ApiKey, Config, GiphyConfig, SearchConfig};
pub use coordinator::SearchCoordinator;
pub use debounce::InputDebouncer;
pub use error::{ErrorInfo, ErrorKind, GifError, GifResult};
pub use gateway::{giphy::GiphyProvider, GifProvider, PageRequest};
pub use session::{FetchOutcome, SearchSession, SessionSnapshot, SkipReason};
pub use types::{
    GifRecord, ImageVariant, SearchMode, SearchResult, Uploader, ORIGINAL_VARIANT, PREVIEW_VARIANT,
};
