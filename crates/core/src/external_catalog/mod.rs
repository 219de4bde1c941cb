//! Movie catalog integration.
//!
//! This module provides the [`MovieCatalog`] trait the browser core talks to,
//! and [`TmdbClient`], its implementation against the TMDB v3 API.

mod tmdb;
mod types;

pub use tmdb::TmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Read access to a movie catalog.
///
/// Implemented by [`TmdbClient`] and by `testing::MockCatalog`.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Most recent movies, unfiltered (`/discover/movie`).
    async fn discover_movies(&self, page: PageNumber) -> Result<ResultPage, CatalogError>;

    /// Movies matching a free-text query (`/search/movie`).
    async fn search_movies(
        &self,
        query: &str,
        page: PageNumber,
    ) -> Result<ResultPage, CatalogError>;

    /// Image listing for a movie (`/movie/{id}/images`).
    async fn movie_images(&self, movie_id: u32) -> Result<MovieImages, CatalogError>;
}
