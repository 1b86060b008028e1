//! Response types returned by the GIF Search MCP tools

use gif_search_core::{
    Config, FetchOutcome, GifRecord, GiphyConfig, ImageVariant, SearchConfig, SessionSnapshot,
    PREVIEW_VARIANT,
};
use serde::Serialize;

/// Compact view of a GIF for result listings
#[derive(Debug, Clone, Serialize)]
pub struct GifSummary {
    pub id: String,
    pub title: String,
    pub rating: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<ImageVariant>,
    pub page_url: String,
}

impl From<&GifRecord> for GifSummary {
    fn from(gif: &GifRecord) -> Self {
        Self {
            id: gif.id.clone(),
            title: gif.display_title().to_string(),
            rating: gif.rating.clone(),
            preview: gif.preview().cloned(),
            page_url: gif.url.clone(),
        }
    }
}

/// Result of a fetch operation: the outcome, the session flags, and the
/// GIFs that the operation added
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub outcome: FetchOutcome,
    pub session: SessionSnapshot,
    pub gifs: Vec<GifSummary>,
}

impl PageResponse {
    /// Build a response from an outcome and the session state after it
    pub fn new(outcome: FetchOutcome, mut session: SessionSnapshot) -> Self {
        let added: &[GifRecord] = match &outcome {
            FetchOutcome::Applied {
                received, offset, ..
            } => {
                let start = offset.saturating_sub(*received);
                session.gifs.get(start..*offset).unwrap_or_default()
            }
            _ => &[],
        };
        let gifs = added.iter().map(GifSummary::from).collect();

        session.gifs.clear();
        Self {
            outcome,
            session,
            gifs,
        }
    }
}

/// Full detail view of a single GIF
#[derive(Debug, Clone, Serialize)]
pub struct GifDetail {
    pub display_title: String,
    pub is_preview_available: bool,
    #[serde(flatten)]
    pub gif: GifRecord,
}

impl From<GifRecord> for GifDetail {
    fn from(gif: GifRecord) -> Self {
        Self {
            display_title: gif.display_title().to_string(),
            is_preview_available: gif.variant(PREVIEW_VARIANT).is_some(),
            gif,
        }
    }
}

/// Acknowledgement for a debounced input change
#[derive(Debug, Clone, Serialize)]
pub struct InputScheduled {
    pub text: String,
    pub delay_ms: u64,
}

/// Effective configuration, credential reduced to a flag
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    pub provider: String,
    pub has_credential: bool,
    pub search: SearchConfig,
    pub giphy: GiphyConfig,
}

impl ConfigStatus {
    pub fn new(provider: &str, config: &Config) -> Self {
        Self {
            provider: provider.to_string(),
            has_credential: config.giphy.has_credential(),
            search: config.search.clone(),
            giphy: config.giphy.clone(),
        }
    }
}
