//! Query resolution: turns (search text, page) into one catalog request.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::external_catalog::{CatalogError, MovieCatalog, PageNumber, ResultPage};
use crate::metrics::LISTING_FETCHES;

/// The listing request a (query, page) pair maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingRequest {
    /// Most recent movies, used when there is no active search.
    Discover { page: PageNumber },
    /// Free-text search. `query` is sent exactly as typed.
    Search { query: String, page: PageNumber },
}

impl ListingRequest {
    /// Search when the trimmed query is non-empty, discover otherwise.
    pub fn for_query(query: &str, page: PageNumber) -> Self {
        if query.trim().is_empty() {
            Self::Discover { page }
        } else {
            Self::Search {
                query: query.to_string(),
                page,
            }
        }
    }

    pub fn page(&self) -> PageNumber {
        match self {
            Self::Discover { page } | Self::Search { page, .. } => *page,
        }
    }

    /// Short endpoint label, used for logs and metrics.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Discover { .. } => "discover",
            Self::Search { .. } => "search",
        }
    }
}

impl fmt::Display for ListingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover { page } => write!(f, "discover page {}", page),
            Self::Search { query, page } => write!(f, "search '{}' page {}", query, page),
        }
    }
}

/// A listing fetch failed. Carries the request it was issued for.
#[derive(Debug, Error)]
#[error("Failed to fetch {request}: {source}")]
pub struct FetchError {
    pub request: ListingRequest,
    #[source]
    pub source: CatalogError,
}

/// Executes listing requests against a [`MovieCatalog`].
///
/// Stateless apart from the catalog handle; resolving the same pair twice
/// against an unchanged backend yields the same page.
pub struct QueryResolver {
    catalog: Arc<dyn MovieCatalog>,
}

impl QueryResolver {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }

    /// Fetch the page for `query` at `page`.
    pub async fn resolve(&self, query: &str, page: PageNumber) -> Result<ResultPage, FetchError> {
        self.execute(ListingRequest::for_query(query, page)).await
    }

    /// Execute an already decided request.
    pub async fn execute(&self, request: ListingRequest) -> Result<ResultPage, FetchError> {
        debug!("Resolving {}", request);

        let result = match &request {
            ListingRequest::Discover { page } => self.catalog.discover_movies(*page).await,
            ListingRequest::Search { query, page } => {
                self.catalog.search_movies(query, *page).await
            }
        };

        let outcome = if result.is_ok() { "success" } else { "failure" };
        LISTING_FETCHES
            .with_label_values(&[request.endpoint(), outcome])
            .inc();

        result.map_err(|source| FetchError { request, source })
    }
}

impl fmt::Debug for QueryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResolver")
            .field("catalog", &"<catalog>")
            .finish()
    }
}
