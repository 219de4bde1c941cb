//! Types for movie catalog API responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of results the listing endpoints return per page.
pub const PAGE_SIZE: u32 = 20;

/// Number of pages needed to show `total_results` at [`PAGE_SIZE`] per page.
pub fn total_pages(total_results: u64) -> u64 {
    total_results.div_ceil(u64::from(PAGE_SIZE))
}

/// A 1-based page index into a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    /// The first page.
    pub const FIRST: PageNumber = PageNumber(1);

    /// Returns `None` for page 0.
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self(page))
    }

    /// Maps page 0 to the first page.
    pub fn clamped(page: u32) -> Self {
        Self(page.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = String;

    fn try_from(page: u32) -> Result<Self, Self::Error> {
        Self::new(page).ok_or_else(|| "page number must be at least 1".to_string())
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.0
    }
}

/// A movie as returned by the discover and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u32,
    /// Movie title.
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Movie overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path (relative to TMDB image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Backdrop path (relative to TMDB image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
}

impl MovieSummary {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Whether TMDB has a poster for this movie.
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// One page of a listing together with the total it was cut from.
///
/// Results and total always come from the same response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultPage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_results: u64,
}

impl ResultPage {
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_results)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Images attached to a movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieImages {
    #[serde(default)]
    pub posters: Vec<ImageFile>,
}

impl MovieImages {
    /// The poster TMDB lists first.
    pub fn first_poster(&self) -> Option<&ImageFile> {
        self.posters.first()
    }
}

/// A single image file entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageFile {
    /// Path relative to the image base URL, starting with `/`.
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_639_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
}

/// Builds absolute image URLs from TMDB file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base_url: String,
    size: String,
}

impl ImageUrls {
    pub fn new(base_url: impl Into<String>, size: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            size: size.into(),
        }
    }

    /// `{base_url}/{size}{file_path}`
    pub fn poster_url(&self, file_path: &str) -> String {
        format!("{}/{}{}", self.base_url, self.size, file_path)
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p", "original")
    }
}
