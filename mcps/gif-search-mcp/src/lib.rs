//! GIF Search MCP Library
//!
//! Giphy search exposed as MCP tools over one paginated session.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use gif_search_mcp::GifSearchMcpServer;
//!
//! let server = GifSearchMcpServer::new(Config::load()?).await?;
//! // Serve via stdio or any other rmcp transport
//! ```
//!
//! # Configuration
//! Set `GIPHY_API_KEY` env var; other settings live in `~/.binks/gif-search.toml`

pub mod init;
pub mod params;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::GifSearchMcpServer;

// Re-export parameter types for direct API usage
pub use params::{GetGifParams, GetSessionParams, InputTextParams, SearchGifsParams};
