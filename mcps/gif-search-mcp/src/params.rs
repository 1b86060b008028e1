//! Parameter types for GIF Search MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchGifsParams {
    #[schemars(description = "Text to search GIFs for. Repeating the active query does nothing.")]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InputTextParams {
    #[schemars(description = "Current contents of the search input")]
    pub text: String,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetSessionParams {
    #[schemars(description = "Include the accumulated GIFs (default: false)")]
    #[serde(default)]
    pub include_gifs: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetGifParams {
    #[schemars(description = "ID of a GIF in the current results")]
    pub id: String,
}
