//! Error types for GIF search operations

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback message when the provider reports a failure without one
pub const GENERIC_PROVIDER_MESSAGE: &str = "Failed to fetch from Giphy API";

/// Errors that can occur while fetching a page of GIFs
#[derive(Error, Debug)]
pub enum GifError {
    /// The request was rejected before reaching the provider
    #[error("{0}")]
    Validation(String),

    /// No API key was configured for the provider
    #[error("Giphy API key is not configured server-side (GIPHY_API_KEY).")]
    MissingCredential,

    /// The request never produced an HTTP response
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a non-2xx HTTP status
    #[error("{message}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Provider message, or the status reason phrase
        message: String,
    },

    /// The envelope's `meta.status` was not 200
    #[error("{message}")]
    EnvelopeStatus {
        /// Status reported inside the envelope
        status: u16,
        /// Provider message
        message: String,
    },

    /// The response body was not a valid envelope
    #[error("invalid response from Giphy API: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GifError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the api_key query parameter
        GifError::Transport(err.without_url().to_string())
    }
}

impl GifError {
    /// Coarse classification shown to consumers
    pub fn kind(&self) -> ErrorKind {
        match self {
            GifError::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Provider,
        }
    }
}

/// Result type alias for GIF search operations
pub type GifResult<T> = Result<T, GifError>;

/// Error category recorded in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Provider,
}

/// A user-displayable error stored in the search session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&GifError> for ErrorInfo {
    fn from(err: &GifError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
