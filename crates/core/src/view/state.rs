//! The view state record.

use serde::Serialize;

use crate::external_catalog::{MovieSummary, PageNumber, ResultPage};

/// Where the current listing fetch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// Nothing fetched yet.
    Idle,
    /// The latest issued fetch is in flight.
    Loading,
    /// The latest issued fetch succeeded.
    Loaded,
    /// The latest issued fetch failed; the previous listing is kept.
    Failed,
}

/// Everything the presentation layer renders from.
///
/// Never mutated in place by the controller: each event produces a new
/// record through the functions in [`reducer`](super::reducer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    /// Search text as typed. Empty means no active search.
    pub query: String,
    pub page: PageNumber,
    /// Set when the user submitted a blank search.
    pub empty_input: bool,
    /// Results and total of the last accepted fetch.
    pub listing: ResultPage,
    pub status: FetchStatus,
    /// Message of the last failed fetch, cleared on the next success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// The movie shown in the detail view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<MovieSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,

    /// (query, page) changed since the last issued fetch.
    #[serde(skip)]
    pub(crate) dirty: bool,
    /// Sequence number of the most recently issued fetch, 0 before the first.
    #[serde(skip)]
    pub(crate) issued_seq: u64,
    /// Bumped on every selection change; tags poster lookups.
    #[serde(skip)]
    pub(crate) selection_seq: u64,
}

impl ViewState {
    /// Fresh state: no query, first page, with a refresh pending.
    pub fn new() -> Self {
        Self {
            query: String::new(),
            page: PageNumber::FIRST,
            empty_input: false,
            listing: ResultPage::default(),
            status: FetchStatus::Idle,
            last_error: None,
            selected: None,
            poster_url: None,
            dirty: true,
            issued_seq: 0,
            selection_seq: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn is_detail_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Page count for the pager, `ceil(total_results / 20)`.
    pub fn total_pages(&self) -> u64 {
        self.listing.total_pages()
    }

    /// Whether a refresh is waiting to be issued.
    pub fn needs_refresh(&self) -> bool {
        self.dirty
    }

    /// Whether `seq` identifies the most recently issued fetch.
    pub fn is_current_fetch(&self, seq: u64) -> bool {
        seq != 0 && seq == self.issued_seq
    }

    /// Whether `selection` identifies the current, still open selection.
    pub fn is_current_selection(&self, selection: u64) -> bool {
        self.selected.is_some() && selection == self.selection_seq
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_pending_first_page() {
        let state = ViewState::new();
        assert_eq!(state.page, PageNumber::FIRST);
        assert!(state.query.is_empty());
        assert!(state.needs_refresh());
        assert!(!state.is_loading());
        assert!(!state.is_detail_open());
        assert_eq!(state.total_pages(), 0);
    }

    #[test]
    fn test_no_fetch_is_current_before_the_first() {
        assert!(!ViewState::new().is_current_fetch(0));
    }

    #[test]
    fn test_serialized_state_skips_bookkeeping() {
        let json = serde_json::to_value(ViewState::new()).unwrap();
        assert_eq!(json["status"], "idle");
        assert_eq!(json["page"], 1);
        assert!(json.get("dirty").is_none());
        assert!(json.get("selected").is_none());
    }
}
