//! Configuration loading for gif-search
//!
//! Configuration is loaded from:
//! 1. Environment variables GIPHY_API_KEY and GIPHY_API_BASE
//! 2. Environment variable GIF_SEARCH_CONFIG_PATH
//! 3. ~/.binks/gif-search.toml
//! 4. Default values
//!
//! The API key is only ever read from the environment. It is never written
//! back out and is redacted from `Debug` output.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search session configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Giphy specific configuration
    #[serde(default)]
    pub giphy: GiphyConfig,
}

/// Search session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of GIFs requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Delay before a typed query is searched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Giphy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiphyConfig {
    /// Base URL of the GIF endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Content rating filter sent with every request
    #[serde(default = "default_rating")]
    pub rating: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout; the transport default applies when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Server-held credential (environment only)
    #[serde(skip)]
    pub api_key: Option<ApiKey>,
}

/// A provider credential that never appears in logs
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, ignoring blank values
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// Default value functions
fn default_page_size() -> usize {
    24
}

fn default_debounce_ms() -> u64 {
    600
}

fn default_base_url() -> String {
    "https://api.giphy.com/v1/gifs".to_string()
}

fn default_rating() -> String {
    "g".to_string()
}

fn default_user_agent() -> String {
    "gif-search-mcp/0.1".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            rating: default_rating(),
            user_agent: default_user_agent(),
            timeout_seconds: None,
            api_key: None,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl GiphyConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply the environment
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_path();

        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Read a TOML file, falling back to defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GIPHY_API_KEY").and_then(ApiKey::new) {
            self.giphy.api_key = Some(key);
        }

        if let Some(base) = lookup("GIPHY_API_BASE").filter(|b| !b.trim().is_empty()) {
            self.giphy.base_url = base;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            anyhow::bail!("search.page_size must be greater than zero");
        }
        url::Url::parse(&self.giphy.base_url)
            .map_err(|e| anyhow::anyhow!("invalid giphy.base_url '{}': {}", self.giphy.base_url, e))?;
        Ok(())
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("GIF_SEARCH_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.binks/gif-search.toml
        if let Ok(home) = std::env::var("HOME") {
            let path = PathBuf::from(home).join(".binks").join("gif-search.toml");
            return Some(path);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.page_size, 24);
        assert_eq!(config.search.debounce(), Duration::from_millis(600));
        assert_eq!(config.giphy.base_url, "https://api.giphy.com/v1/gifs");
        assert_eq!(config.giphy.rating, "g");
        assert!(config.giphy.timeout().is_none());
        assert!(!config.giphy.has_credential());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[search]\npage_size = 12\n\n[giphy]\nrating = \"pg\"\ntimeout_seconds = 5"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.search.page_size, 12);
        assert_eq!(config.search.debounce_ms, 600);
        assert_eq!(config.giphy.rating, "pg");
        assert_eq!(config.giphy.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.search.page_size, 24);
    }

    #[test]
    fn test_api_key_ignored_in_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[giphy]\napi_key = \"from-file\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.giphy.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "GIPHY_API_KEY" => Some("secret-key".to_string()),
            "GIPHY_API_BASE" => Some("http://localhost:9000/v1/gifs".to_string()),
            _ => None,
        });

        assert_eq!(config.giphy.api_key.as_ref().unwrap().expose(), "secret-key");
        assert_eq!(config.giphy.base_url, "http://localhost:9000/v1/gifs");
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let mut config = Config::default();
        config.apply_env(|key| (key == "GIPHY_API_KEY").then(|| "   ".to_string()));
        assert!(!config.giphy.has_credential());
    }

    #[test]
    fn test_api_key_redacted() {
        let mut config = Config::default();
        config.giphy.api_key = ApiKey::new("super-secret");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("ApiKey(***)"));

        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("super-secret"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.search.page_size = 0;
        assert!(config.validate().is_err());
    }
}
