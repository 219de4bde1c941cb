use serde::{Deserialize, Serialize};

use crate::external_catalog::ImageUrls;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// TMDB API client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key (v3), sent as the `api_key` query parameter.
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image base URL for posters (default: https://image.tmdb.org/t/p).
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Size segment inserted between the image base URL and the file path.
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    /// Optional ISO 639-1 language tag, e.g. "pt-BR".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl TmdbConfig {
    /// Config pointing at the public TMDB endpoints with the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
            language: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl From<&TmdbConfig> for ImageUrls {
    fn from(config: &TmdbConfig) -> Self {
        ImageUrls::new(&config.image_base_url, &config.poster_size)
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_poster_size() -> String {
    "original".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// View controller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    /// Capacity of the event channel feeding the view controller.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_event_buffer() -> usize {
    64
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub tmdb: SanitizedTmdbConfig,
    pub browser: BrowserConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                image_base_url: config.tmdb.image_base_url.clone(),
                poster_size: config.tmdb.poster_size.clone(),
                language: config.tmdb.language.clone(),
                api_key_configured: !config.tmdb.api_key.is_empty(),
                timeout_secs: config.tmdb.timeout_secs,
            },
            browser: config.browser.clone(),
        }
    }
}
