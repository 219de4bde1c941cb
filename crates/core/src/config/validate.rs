use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - TMDB API key is not empty
/// - TMDB URLs are http(s)
/// - Timeout and event buffer are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key cannot be empty".to_string(),
        ));
    }

    for (name, url) in [
        ("tmdb.base_url", &config.tmdb.base_url),
        ("tmdb.image_base_url", &config.tmdb.image_base_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{} must be an http(s) URL, got '{}'",
                name, url
            )));
        }
    }

    if config.tmdb.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "tmdb.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.browser.event_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "browser.event_buffer cannot be 0".to_string(),
        ));
    }

    Ok(())
}
