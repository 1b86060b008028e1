//! GIF records and search result types
//!
//! Giphy encodes image dimensions and sizes as strings and uses sentinel
//! timestamps for "never", so provider JSON is decoded as `RawGif` and
//! converted. `GifRecord` itself serializes and deserializes in its own
//! normalised shape.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the rendition used for grid previews
pub const PREVIEW_VARIANT: &str = "fixed_height";
/// Name of the full-size rendition used for the detail view
pub const ORIGINAL_VARIANT: &str = "original";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a session is driven by a text query or by the trending feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Query,
    Trending,
}

/// A single rendition of a GIF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// File size in bytes (not reported for every rendition)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// The account that uploaded a GIF
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// An immutable GIF as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifRecord {
    pub id: String,
    pub title: String,
    pub images: BTreeMap<String, ImageVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<Uploader>,
    pub rating: String,
    /// Where the GIF was originally found
    pub source: String,
    /// Provider page for the GIF
    pub url: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending_at: Option<NaiveDateTime>,
}

impl GifRecord {
    /// Title for display, falling back when the provider sent none
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled GIF"
        } else {
            &self.title
        }
    }

    pub fn variant(&self, name: &str) -> Option<&ImageVariant> {
        self.images.get(name)
    }

    /// Rendition for grid cells
    pub fn preview(&self) -> Option<&ImageVariant> {
        self.variant(PREVIEW_VARIANT).or_else(|| self.original())
    }

    /// Full-size rendition for the detail view
    pub fn original(&self) -> Option<&ImageVariant> {
        self.variant(ORIGINAL_VARIANT)
    }
}

/// One page of results from the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub gifs: Vec<GifRecord>,
    /// Upper bound on reachable items for the query or feed
    pub total_count: usize,
}

// ============================================================================
// Wire Types
// ============================================================================

/// Giphy sends numbers as strings in image objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(u64),
    Text(String),
}

impl NumberLike {
    fn as_u64(&self) -> Option<u64> {
        match self {
            NumberLike::Number(n) => Some(*n),
            NumberLike::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawImage {
    url: Option<String>,
    width: Option<NumberLike>,
    height: Option<NumberLike>,
    size: Option<NumberLike>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    username: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
    profile_url: Option<String>,
    description: Option<String>,
    #[serde(default)]
    is_verified: bool,
}

/// A GIF object as Giphy sends it
#[derive(Debug, Deserialize)]
pub(crate) struct RawGif {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    images: BTreeMap<String, RawImage>,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    import_datetime: Option<String>,
    #[serde(default)]
    trending_datetime: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse a provider timestamp; the epoch and all-zero dates mean "unset"
fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(value?.trim(), TIMESTAMP_FORMAT).ok()?;
    (parsed.and_utc().timestamp() > 0).then_some(parsed)
}

impl RawImage {
    /// Renditions without a GIF URL (mp4/webp only) are not usable
    fn into_variant(self) -> Option<ImageVariant> {
        let url = non_empty(self.url)?;
        let dimension = |n: Option<NumberLike>| {
            n.and_then(|n| n.as_u64())
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };

        Some(ImageVariant {
            url,
            width: dimension(self.width),
            height: dimension(self.height),
            size_bytes: self.size.and_then(|n| n.as_u64()),
        })
    }
}

impl From<RawGif> for GifRecord {
    fn from(raw: RawGif) -> Self {
        let images = raw
            .images
            .into_iter()
            .filter_map(|(name, image)| image.into_variant().map(|v| (name, v)))
            .collect();

        let uploader = match raw.user {
            Some(user) => Some(Uploader {
                username: non_empty(user.username)
                    .or_else(|| non_empty(raw.username.clone()))
                    .unwrap_or_default(),
                display_name: non_empty(user.display_name),
                avatar_url: non_empty(user.avatar_url),
                profile_url: non_empty(user.profile_url),
                description: non_empty(user.description),
                is_verified: user.is_verified,
            }),
            None => non_empty(raw.username).map(|username| Uploader {
                username,
                ..Default::default()
            }),
        };

        Self {
            imported_at: parse_timestamp(raw.import_datetime.as_deref()),
            trending_at: parse_timestamp(raw.trending_datetime.as_deref()),
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            images,
            uploader,
            rating: raw.rating.unwrap_or_default(),
            source: raw.source.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            slug: raw.slug.unwrap_or_default(),
        }
    }
}
