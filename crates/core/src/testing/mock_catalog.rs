//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::external_catalog::{
    CatalogError, MovieCatalog, MovieImages, PageNumber, ResultPage,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordedCatalogQuery {
    Discover { page: PageNumber },
    Search { query: String, page: PageNumber },
    Images { movie_id: u32 },
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable discover/search pages and image listings
/// - Track queries for assertions
/// - Simulate failures and slow responses
///
/// Unconfigured pages come back empty and unconfigured movies have no posters.
///
/// # Example
///
/// ```rust,ignore
/// use cinebrowse_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.set_search_page("batman", PageNumber::FIRST, fixtures::result_page(&[1], 50)).await;
///
/// let page = catalog.search_movies("batman", PageNumber::FIRST).await?;
/// assert_eq!(page.total_results, 50);
/// ```
#[derive(Debug, Default)]
pub struct MockCatalog {
    /// Discover pages by page number.
    discover: Arc<RwLock<HashMap<PageNumber, ResultPage>>>,
    /// Search pages by (query, page).
    search: Arc<RwLock<HashMap<(String, PageNumber), ResultPage>>>,
    /// Image listings by movie ID.
    images: Arc<RwLock<HashMap<u32, MovieImages>>>,
    /// Artificial latency per recorded query.
    delays: Arc<RwLock<HashMap<RecordedCatalogQuery, Duration>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next listing operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// If set, the next image lookup will fail with this error.
    next_images_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Listing Configuration
    // =========================================================================

    /// Set the page returned by discover for `page`.
    pub async fn set_discover_page(&self, page: PageNumber, result: ResultPage) {
        self.discover.write().await.insert(page, result);
    }

    /// Set the page returned by a search for exactly `query` at `page`.
    pub async fn set_search_page(&self, query: &str, page: PageNumber, result: ResultPage) {
        self.search
            .write()
            .await
            .insert((query.to_string(), page), result);
    }

    /// Set the image listing for a movie.
    pub async fn set_images(&self, movie_id: u32, images: MovieImages) {
        self.images.write().await.insert(movie_id, images);
    }

    /// Delay the response to `query` by `delay`.
    pub async fn set_delay(&self, query: RecordedCatalogQuery, delay: Duration) {
        self.delays.write().await.insert(query, delay);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Recorded discover and search queries, without image lookups.
    pub async fn recorded_listings(&self) -> Vec<RecordedCatalogQuery> {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| !matches!(q, RecordedCatalogQuery::Images { .. }))
            .cloned()
            .collect()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next discover/search to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next image lookup to fail with the given error.
    pub async fn set_next_images_error(&self, error: CatalogError) {
        *self.next_images_error.write().await = Some(error);
    }

    /// Clear any pending errors.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
        *self.next_images_error.write().await = None;
    }

    /// Record a query, then wait out its configured delay.
    async fn record(&self, query: RecordedCatalogQuery) {
        let delay = self.delays.read().await.get(&query).copied();
        self.queries.write().await.push(query);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn discover_movies(&self, page: PageNumber) -> Result<ResultPage, CatalogError> {
        self.record(RecordedCatalogQuery::Discover { page }).await;

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .discover
            .read()
            .await
            .get(&page)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_movies(
        &self,
        query: &str,
        page: PageNumber,
    ) -> Result<ResultPage, CatalogError> {
        self.record(RecordedCatalogQuery::Search {
            query: query.to_string(),
            page,
        })
        .await;

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .search
            .read()
            .await
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_default())
    }

    async fn movie_images(&self, movie_id: u32) -> Result<MovieImages, CatalogError> {
        self.record(RecordedCatalogQuery::Images { movie_id }).await;

        if let Some(err) = self.next_images_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .images
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }
}
