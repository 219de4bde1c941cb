//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{MovieImages, PageNumber, ResultPage};
use super::{CatalogError, MovieCatalog};
use crate::config::TmdbConfig;

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("language", &self.language)
            .finish()
    }
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: &TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    /// GET `{base_url}{path}` with the API key, the optional language and
    /// `params`, decoding the JSON body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())]);
        if let Some(language) = &self.language {
            request = request.query(&[("language", language.as_str())]);
        }
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let response = check_status(response, path).await?;
        let body = response.bytes().await?;

        decode_body(&body, path)
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn discover_movies(&self, page: PageNumber) -> Result<ResultPage, CatalogError> {
        debug!("TMDB discover: page={}", page);

        self.get_json("/discover/movie", &[("page", page.to_string())])
            .await
    }

    async fn search_movies(
        &self,
        query: &str,
        page: PageNumber,
    ) -> Result<ResultPage, CatalogError> {
        debug!("TMDB movie search: query='{}', page={}", query, page);

        self.get_json(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn movie_images(&self, movie_id: u32) -> Result<MovieImages, CatalogError> {
        debug!("TMDB movie images: id={}", movie_id);

        self.get_json(&format!("/movie/{}/images", movie_id), &[])
            .await
    }
}

/// Map non-success statuses to catalog errors.
async fn check_status(response: Response, path: &str) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == 401 {
        return Err(CatalogError::NotConfigured(
            "Invalid TMDB API key".to_string(),
        ));
    }
    if status == 404 {
        return Err(CatalogError::NotFound(path.to_string()));
    }
    if status == 429 {
        return Err(CatalogError::RateLimitExceeded);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::ApiError {
        status: status.as_u16(),
        message: body,
    })
}

fn decode_body<T: DeserializeOwned>(body: &[u8], path: &str) -> Result<T, CatalogError> {
    serde_json::from_slice(body).map_err(|e| {
        CatalogError::ParseError(format!("Failed to parse {} response: {}", path, e))
    })
}
