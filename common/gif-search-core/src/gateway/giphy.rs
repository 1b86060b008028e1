//! Giphy provider
//!
//! Implements the GifProvider trait against the Giphy REST API.
//! See: https://developers.giphy.com/docs/api/endpoint

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{GifProvider, PageRequest};
use crate::config::{ApiKey, GiphyConfig};
use crate::error::{GifError, GifResult, GENERIC_PROVIDER_MESSAGE};
use crate::types::{GifRecord, RawGif, SearchMode, SearchResult};

/// Giphy provider
pub struct GiphyProvider {
    client: Client,
    config: GiphyConfig,
}

impl GiphyProvider {
    pub fn new(config: GiphyConfig) -> GifResult<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Build the endpoint URL for a request, credential included
    fn endpoint_url(&self, request: &PageRequest, api_key: &ApiKey) -> GifResult<Url> {
        let path = match request.mode() {
            SearchMode::Query => "search",
            SearchMode::Trending => "trending",
        };
        let base = self.config.base_url.trim_end_matches('/');

        let mut url = Url::parse(&format!("{}/{}", base, path))
            .map_err(|e| GifError::Transport(format!("invalid Giphy base URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = request.query() {
                pairs.append_pair("q", query);
            }
            pairs
                .append_pair("offset", &request.offset().to_string())
                .append_pair("limit", &request.limit().to_string())
                .append_pair("rating", &self.config.rating)
                .append_pair("api_key", api_key.expose());
        }

        Ok(url)
    }
}

// Giphy API response types
#[derive(Debug, Deserialize)]
struct GiphyEnvelope {
    #[serde(default)]
    data: Vec<RawGif>,
    #[serde(default)]
    pagination: GiphyPagination,
    meta: GiphyMeta,
}

#[derive(Debug, Default, Deserialize)]
struct GiphyPagination {
    #[serde(default)]
    total_count: usize,
}

#[derive(Debug, Deserialize)]
struct GiphyMeta {
    status: u16,
    #[serde(default)]
    msg: String,
}

/// Error bodies come either as an envelope or as a bare `{"message": ..}`
#[derive(Debug, Deserialize)]
struct GiphyErrorBody {
    meta: Option<GiphyMeta>,
    message: Option<String>,
}

/// Turn a raw HTTP response into a page of results
fn decode_response(status: StatusCode, body: &str) -> GifResult<SearchResult> {
    if !status.is_success() {
        let provider_message = serde_json::from_str::<GiphyErrorBody>(body)
            .ok()
            .and_then(|b| b.meta.map(|m| m.msg).or(b.message))
            .filter(|m| !m.trim().is_empty());

        let message = provider_message.unwrap_or_else(|| {
            format!(
                "Giphy API error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        });

        return Err(GifError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: GiphyEnvelope = serde_json::from_str(body)?;

    if envelope.meta.status != 200 {
        let message = if envelope.meta.msg.trim().is_empty() {
            GENERIC_PROVIDER_MESSAGE.to_string()
        } else {
            envelope.meta.msg
        };
        return Err(GifError::EnvelopeStatus {
            status: envelope.meta.status,
            message,
        });
    }

    Ok(SearchResult {
        gifs: envelope.data.into_iter().map(GifRecord::from).collect(),
        total_count: envelope.pagination.total_count,
    })
}

#[async_trait]
impl GifProvider for GiphyProvider {
    fn name(&self) -> &str {
        "giphy"
    }

    fn is_available(&self) -> bool {
        self.config.has_credential()
    }

    async fn fetch_page(&self, request: &PageRequest) -> GifResult<SearchResult> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(GifError::MissingCredential)?;

        let url = self.endpoint_url(request, api_key)?;

        tracing::debug!(
            mode = ?request.mode(),
            offset = request.offset(),
            limit = request.limit(),
            "Requesting Giphy page"
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let result = decode_response(status, &body);

        match &result {
            Ok(page) => tracing::debug!(
                count = page.gifs.len(),
                total_count = page.total_count,
                "Giphy page received"
            ),
            Err(e) => tracing::warn!(status = status.as_u16(), error = %e, "Giphy request failed"),
        }

        result
    }
}
