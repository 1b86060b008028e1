//! GIF Search MCP Server
//!
//! Giphy search, trending feed and infinite-scroll paging over MCP.
//!
//! # Configuration
//! Set `GIPHY_API_KEY` env var and optionally configure `~/.binks/gif-search.toml`

use rmcp::{transport::stdio, ServiceExt};

use gif_search_core::Config;
use gif_search_mcp::{init::init_tracing, GifSearchMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    tracing::info!("Starting GIF Search MCP Server");

    let config = Config::load()?;
    tracing::info!(
        "Giphy base URL: {}, page size: {}",
        config.giphy.base_url,
        config.search.page_size
    );

    let server = GifSearchMcpServer::new(config).await?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
