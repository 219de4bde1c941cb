//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`MovieCatalog`](crate::external_catalog::MovieCatalog)
//! and fixtures, allowing the view controller to be exercised without a network.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinebrowse_core::testing::{fixtures, MockCatalog};
//!
//! let catalog = MockCatalog::new();
//! catalog.set_discover_page(PageNumber::FIRST, fixtures::result_page(&[1, 2, 3], 3)).await;
//! catalog.set_images(1, fixtures::images(&["/one.jpg"])).await;
//! ```

mod mock_catalog;

pub use mock_catalog::{MockCatalog, RecordedCatalogQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::external_catalog::{ImageFile, MovieImages, MovieSummary, ResultPage};

    /// Create a test movie with a poster path.
    pub fn movie(id: u32, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            original_title: None,
            release_date: Some("2024-06-15".to_string()),
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            backdrop_path: None,
            vote_average: Some(7.5),
        }
    }

    /// Create a test movie TMDB has no poster for.
    pub fn movie_without_poster(id: u32, title: &str) -> MovieSummary {
        MovieSummary {
            poster_path: None,
            ..movie(id, title)
        }
    }

    /// Create a result page holding one movie per ID.
    pub fn result_page(ids: &[u32], total_results: u64) -> ResultPage {
        ResultPage {
            results: ids
                .iter()
                .map(|&id| movie(id, &format!("Movie {}", id)))
                .collect(),
            total_results,
        }
    }

    /// Create an image listing with the given poster file paths, in order.
    pub fn images(poster_paths: &[&str]) -> MovieImages {
        MovieImages {
            posters: poster_paths
                .iter()
                .map(|path| ImageFile {
                    file_path: path.to_string(),
                    width: Some(2000),
                    height: Some(3000),
                    iso_639_1: None,
                    vote_average: None,
                })
                .collect(),
        }
    }
}
