//! MCP Server implementation for GIF search
//!
//! This module defines the main MCP server that exposes one paginated GIF
//! search session as tools: searching, trending, infinite-scroll paging,
//! error recovery and debounced text input.

use anyhow::Result;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use std::sync::Arc;

use gif_search_core::{
    Config, FetchOutcome, GifProvider, GiphyProvider, InputDebouncer, SearchCoordinator,
};

use crate::params::{GetGifParams, GetSessionParams, InputTextParams, SearchGifsParams};
use crate::types::{ConfigStatus, GifDetail, InputScheduled, PageResponse};

/// The main GIF Search MCP Server
#[derive(Clone)]
pub struct GifSearchMcpServer {
    coordinator: SearchCoordinator,
    debouncer: Arc<InputDebouncer>,
    config: Config,
    tool_router: ToolRouter<Self>,
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl GifSearchMcpServer {
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Using Giphy at {}", config.giphy.base_url);
        let provider: Arc<dyn GifProvider> = Arc::new(GiphyProvider::new(config.giphy.clone())?);

        if !provider.is_available() {
            tracing::warn!(
                "Provider '{}' has no credential (set GIPHY_API_KEY); requests will fail",
                provider.name()
            );
        }

        Ok(Self::start(config, provider).await)
    }

    /// Build a server and load the first trending page
    ///
    /// A failed load is not fatal: the error stays in the session for
    /// `get_session` to report and `retry` to recover from.
    pub async fn start(config: Config, provider: Arc<dyn GifProvider>) -> Self {
        let server = Self::with_provider(config, provider);

        match server.coordinator.load_trending().await {
            FetchOutcome::Failed { error } => {
                tracing::warn!(message = %error.message, "Initial trending load failed")
            }
            outcome => tracing::debug!(?outcome, "Initial trending page loaded"),
        }

        server
    }

    /// Build a server around any provider, starting with an empty session
    pub fn with_provider(config: Config, provider: Arc<dyn GifProvider>) -> Self {
        let coordinator = SearchCoordinator::new(provider, config.search.page_size);
        let debouncer = Arc::new(InputDebouncer::new(
            coordinator.clone(),
            config.search.debounce(),
        ));

        Self {
            coordinator,
            debouncer,
            config,
            tool_router: Self::tool_router(),
        }
    }

    async fn page_response(&self, outcome: FetchOutcome) -> Result<CallToolResult, McpError> {
        let snapshot = self.coordinator.snapshot(true).await;
        json_result(&PageResponse::new(outcome, snapshot))
    }

    // ========================================================================
    // Search Tools
    // ========================================================================

    #[tool(
        description = "Search GIFs by text, replacing the current results with the first page. Repeating the active query does nothing."
    )]
    async fn search_gifs(
        &self,
        Parameters(params): Parameters<SearchGifsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Searching GIFs for: {}", params.query);

        self.debouncer.cancel();
        let outcome = self.coordinator.search(&params.query).await;
        self.page_response(outcome).await
    }

    #[tool(description = "Show the trending GIF feed, replacing the current results with its first page.")]
    async fn trending_gifs(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Loading trending GIFs");

        self.debouncer.cancel();
        let outcome = self.coordinator.load_trending().await;
        self.page_response(outcome).await
    }

    #[tool(
        description = "Append the next page of the current query or trending feed. Does nothing while a fetch is running or when no more results exist."
    )]
    async fn load_more(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.coordinator.load_more().await;
        self.page_response(outcome).await
    }

    // ========================================================================
    // Error Recovery
    // ========================================================================

    #[tool(description = "Dismiss the current error without fetching anything.")]
    async fn clear_error(&self) -> Result<CallToolResult, McpError> {
        self.coordinator.clear_error().await;
        json_result(&self.coordinator.snapshot(false).await)
    }

    #[tool(
        description = "Clear the error and re-run the current query, or reload trending when there is no query."
    )]
    async fn retry(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Retrying last search");

        let outcome = self.coordinator.retry().await;
        self.page_response(outcome).await
    }

    // ========================================================================
    // Input Tools
    // ========================================================================

    #[tool(
        description = "Report the search box text as it is typed. The search runs once typing pauses for the configured debounce delay."
    )]
    async fn type_query(
        &self,
        Parameters(params): Parameters<InputTextParams>,
    ) -> Result<CallToolResult, McpError> {
        self.debouncer.input_changed(&params.text);

        json_result(&InputScheduled {
            text: params.text.trim().to_string(),
            delay_ms: self.config.search.debounce_ms,
        })
    }

    #[tool(description = "Submit the search box text immediately, skipping the debounce delay.")]
    async fn submit_query(
        &self,
        Parameters(params): Parameters<InputTextParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.debouncer.submit(&params.text).await {
            Some(outcome) => self.page_response(outcome).await,
            None => Err(McpError::invalid_params(
                "Search query cannot be empty".to_string(),
                None,
            )),
        }
    }

    #[tool(description = "Clear the search box: drops any pending typed search and shows trending.")]
    async fn clear_query(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.debouncer.clear().await;
        self.page_response(outcome).await
    }

    // ========================================================================
    // Inspection Tools
    // ========================================================================

    #[tool(
        description = "Get the session state: mode, query, offset, total count, loading flags and error. Optionally includes every accumulated GIF."
    )]
    async fn get_session(
        &self,
        Parameters(params): Parameters<GetSessionParams>,
    ) -> Result<CallToolResult, McpError> {
        json_result(&self.coordinator.snapshot(params.include_gifs).await)
    }

    #[tool(description = "Get full details of a GIF in the current results: all renditions, uploader and dates.")]
    async fn get_gif(
        &self,
        Parameters(params): Parameters<GetGifParams>,
    ) -> Result<CallToolResult, McpError> {
        let gif = self.coordinator.find(&params.id).await.ok_or_else(|| {
            McpError::invalid_params(format!("GIF '{}' is not in the current results", params.id), None)
        })?;

        json_result(&GifDetail::from(gif))
    }

    #[tool(description = "Show the effective configuration. The API key is reported only as present or absent.")]
    async fn get_config(&self) -> Result<CallToolResult, McpError> {
        let provider = self.coordinator.provider().name().to_string();
        json_result(&ConfigStatus::new(&provider, &self.config))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for GifSearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "GIF Search MCP Server - searches Giphy with one paginated session. \
                 Use search_gifs or trending_gifs to start, load_more to page, \
                 retry or clear_error after a failure, and get_gif for details. \
                 The Giphy API key is held server-side (GIPHY_API_KEY)."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
