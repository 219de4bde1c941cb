//! Pure state transitions.
//!
//! Every function here takes the current [`ViewState`] and returns the next
//! one together with the [`Effect`]s the controller has to run. Nothing here
//! performs I/O, so the whole state machine is testable synchronously.
//!
//! Changes to (query, page) only mark the state dirty. [`flush`] turns a dirty
//! state into exactly one fetch, so any number of changes applied before a
//! flush collapse into a single request.

use crate::external_catalog::{MovieSummary, PageNumber, ResultPage};
use crate::resolver::{FetchError, ListingRequest};

use super::state::{FetchStatus, ViewState};

/// User intents.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    QueryTextChanged(String),
    SearchSubmitted,
    /// Raw page from the pager; 0 is treated as 1.
    PageChanged(u32),
    MovieSelected(MovieSummary),
    ModalClosed,
}

/// Results of effects, fed back into the reducer.
#[derive(Debug)]
pub enum Completion {
    ListingLoaded {
        seq: u64,
        outcome: Result<ResultPage, FetchError>,
    },
    PosterLoaded {
        selection: u64,
        poster_url: Option<String>,
    },
}

/// A listing fetch to run, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: ListingRequest,
}

/// Work the controller performs on behalf of the reducer.
#[derive(Debug)]
pub enum Effect {
    /// Run a listing fetch, superseding any fetch still in flight.
    FetchListing(FetchTicket),
    /// Look up the poster of `movie_id` for selection `selection`.
    LookupPoster { selection: u64, movie_id: u32 },
    /// Hand a failed fetch to the error reporter.
    Report(FetchError),
}

/// Next state plus the effects it requires.
#[derive(Debug)]
pub struct Transition {
    pub state: ViewState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: ViewState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: ViewState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

/// Apply a user intent.
pub fn on_event(state: &ViewState, event: ViewEvent) -> Transition {
    match event {
        ViewEvent::QueryTextChanged(text) => Transition::quiet(query_text_changed(state, text)),
        ViewEvent::SearchSubmitted => Transition::quiet(search_submitted(state)),
        ViewEvent::PageChanged(page) => Transition::quiet(page_changed(state, page)),
        ViewEvent::MovieSelected(movie) => movie_selected(state, movie),
        ViewEvent::ModalClosed => Transition::quiet(modal_closed(state)),
    }
}

/// Apply the result of an effect.
pub fn on_completion(state: &ViewState, completion: Completion) -> Transition {
    match completion {
        Completion::ListingLoaded { seq, outcome } => listing_loaded(state, seq, outcome),
        Completion::PosterLoaded {
            selection,
            poster_url,
        } => Transition::quiet(poster_loaded(state, selection, poster_url)),
    }
}

/// Issue one fetch for the current (query, page) if anything changed.
pub fn flush(state: &ViewState) -> Transition {
    if !state.dirty {
        return Transition::quiet(state.clone());
    }

    let mut next = state.clone();
    next.dirty = false;
    next.issued_seq += 1;
    next.status = FetchStatus::Loading;

    let ticket = FetchTicket {
        seq: next.issued_seq,
        request: ListingRequest::for_query(&next.query, next.page),
    };
    Transition::with(next, Effect::FetchListing(ticket))
}

fn query_text_changed(state: &ViewState, text: String) -> ViewState {
    if text == state.query {
        return state.clone();
    }

    let mut next = state.clone();
    // Only leaving an active search resets the page.
    if text.trim().is_empty() && !state.query.trim().is_empty() {
        next.page = PageNumber::FIRST;
    }
    next.query = text;
    next.dirty = true;
    next
}

fn search_submitted(state: &ViewState) -> ViewState {
    let mut next = state.clone();
    if state.query.trim().is_empty() {
        next.empty_input = true;
        next.query = String::new();
    } else {
        next.empty_input = false;
    }
    next.page = PageNumber::FIRST;
    // Resubmitting the same search still refreshes.
    next.dirty = true;
    next
}

fn page_changed(state: &ViewState, page: u32) -> ViewState {
    let page = PageNumber::clamped(page);
    if page == state.page {
        return state.clone();
    }

    let mut next = state.clone();
    next.page = page;
    next.dirty = true;
    next
}

fn movie_selected(state: &ViewState, movie: MovieSummary) -> Transition {
    let mut next = state.clone();
    next.selection_seq += 1;
    next.poster_url = None;

    let lookup = movie.has_poster().then_some(Effect::LookupPoster {
        selection: next.selection_seq,
        movie_id: movie.id,
    });
    next.selected = Some(movie);

    match lookup {
        Some(effect) => Transition::with(next, effect),
        None => Transition::quiet(next),
    }
}

fn modal_closed(state: &ViewState) -> ViewState {
    let mut next = state.clone();
    next.selection_seq += 1;
    next.selected = None;
    next.poster_url = None;
    next
}

fn listing_loaded(
    state: &ViewState,
    seq: u64,
    outcome: Result<ResultPage, FetchError>,
) -> Transition {
    if !state.is_current_fetch(seq) {
        return Transition::quiet(state.clone());
    }

    let mut next = state.clone();
    match outcome {
        Ok(listing) => {
            next.listing = listing;
            next.status = FetchStatus::Loaded;
            next.last_error = None;
            Transition::quiet(next)
        }
        Err(err) => {
            next.status = FetchStatus::Failed;
            next.last_error = Some(err.to_string());
            Transition::with(next, Effect::Report(err))
        }
    }
}

fn poster_loaded(state: &ViewState, selection: u64, poster_url: Option<String>) -> ViewState {
    if !state.is_current_selection(selection) {
        return state.clone();
    }

    let mut next = state.clone();
    if poster_url.is_some() {
        next.poster_url = poster_url;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external_catalog::CatalogError;
    use crate::testing::fixtures;

    fn page(n: u32) -> PageNumber {
        PageNumber::clamped(n)
    }

    /// Apply events then flush, returning the state and any issued ticket.
    fn settle(state: &ViewState, events: Vec<ViewEvent>) -> (ViewState, Option<FetchTicket>) {
        let mut current = state.clone();
        for event in events {
            current = on_event(&current, event).state;
        }
        let flushed = flush(&current);
        let ticket = flushed.effects.into_iter().find_map(|e| match e {
            Effect::FetchListing(ticket) => Some(ticket),
            _ => None,
        });
        (flushed.state, ticket)
    }

    /// A state whose latest fetch for (query, page) has completed.
    fn loaded(query: &str, n: u32, listing: ResultPage) -> ViewState {
        let mut state = ViewState::new();
        state.query = query.to_string();
        state.page = page(n);
        let (state, ticket) = settle(&state, vec![]);
        let seq = ticket.unwrap().seq;
        on_completion(
            &state,
            Completion::ListingLoaded {
                seq,
                outcome: Ok(listing),
            },
        )
        .state
    }

    fn fetch_error(request: ListingRequest) -> FetchError {
        FetchError {
            request,
            source: CatalogError::ApiError {
                status: 500,
                message: "boom".to_string(),
            },
        }
    }

    #[test]
    fn test_initial_flush_discovers_first_page() {
        let (state, ticket) = settle(&ViewState::new(), vec![]);
        let ticket = ticket.unwrap();
        assert_eq!(ticket.seq, 1);
        assert_eq!(ticket.request, ListingRequest::Discover { page: page(1) });
        assert!(state.is_loading());
        assert!(!state.needs_refresh());
    }

    #[test]
    fn test_flush_without_changes_issues_nothing() {
        let state = loaded("", 1, fixtures::result_page(&[1], 1));
        let transition = flush(&state);
        assert!(transition.effects.is_empty());
        assert_eq!(transition.state, state);
    }

    #[test]
    fn test_query_change_triggers_search() {
        let state = loaded("", 1, ResultPage::default());
        let (_, ticket) = settle(
            &state,
            vec![ViewEvent::QueryTextChanged("batman".to_string())],
        );
        assert_eq!(
            ticket.unwrap().request,
            ListingRequest::Search {
                query: "batman".to_string(),
                page: page(1),
            }
        );
    }

    #[test]
    fn test_unchanged_query_does_not_refresh() {
        let state = loaded("batman", 1, ResultPage::default());
        let (_, ticket) = settle(
            &state,
            vec![ViewEvent::QueryTextChanged("batman".to_string())],
        );
        assert!(ticket.is_none());
    }

    #[test]
    fn test_clearing_query_resets_page() {
        let state = loaded("batman", 3, ResultPage::default());
        let (state, ticket) = settle(&state, vec![ViewEvent::QueryTextChanged(String::new())]);
        assert_eq!(state.page, page(1));
        assert_eq!(ticket.unwrap().request, ListingRequest::Discover { page: page(1) });
    }

    #[test]
    fn test_blank_edit_of_blank_query_keeps_page() {
        let state = loaded("", 3, ResultPage::default());
        let (state, ticket) = settle(&state, vec![ViewEvent::QueryTextChanged(" ".to_string())]);
        assert_eq!(state.page, page(3));
        assert_eq!(ticket.unwrap().request, ListingRequest::Discover { page: page(3) });
    }

    #[test]
    fn test_changes_in_one_tick_coalesce() {
        let state = loaded("", 1, ResultPage::default());
        let first = on_event(&state, ViewEvent::QueryTextChanged("ba".to_string())).state;
        let second = on_event(&first, ViewEvent::QueryTextChanged("batman".to_string())).state;
        let third = on_event(&second, ViewEvent::PageChanged(2)).state;

        let transition = flush(&third);
        assert_eq!(transition.effects.len(), 1);
        match &transition.effects[0] {
            Effect::FetchListing(ticket) => assert_eq!(
                ticket.request,
                ListingRequest::Search {
                    query: "batman".to_string(),
                    page: page(2),
                }
            ),
            other => panic!("unexpected effect: {:?}", other),
        }
        assert!(flush(&transition.state).effects.is_empty());
    }

    #[test]
    fn test_blank_submit_clears_query_and_resets_page() {
        let state = loaded("   ", 4, ResultPage::default());
        let (state, ticket) = settle(&state, vec![ViewEvent::SearchSubmitted]);

        assert!(state.empty_input);
        assert_eq!(state.query, "");
        assert_eq!(state.page, page(1));
        assert_eq!(ticket.unwrap().request, ListingRequest::Discover { page: page(1) });
    }

    #[test]
    fn test_submit_refreshes_even_when_nothing_changed() {
        let state = loaded("batman", 1, ResultPage::default());
        let (state, ticket) = settle(&state, vec![ViewEvent::SearchSubmitted]);
        assert!(!state.empty_input);
        assert!(ticket.is_some());
    }

    #[test]
    fn test_submit_after_blank_submit_clears_flag() {
        let state = loaded("", 1, ResultPage::default());
        let (state, _) = settle(&state, vec![ViewEvent::SearchSubmitted]);
        assert!(state.empty_input);

        let (state, _) = settle(
            &state,
            vec![
                ViewEvent::QueryTextChanged("dune".to_string()),
                ViewEvent::SearchSubmitted,
            ],
        );
        assert!(!state.empty_input);
    }

    #[test]
    fn test_submit_with_page_reset_issues_one_fetch() {
        let state = loaded("batman", 3, ResultPage::default());
        let transition = on_event(&state, ViewEvent::SearchSubmitted);
        assert!(transition.effects.is_empty());

        let flushed = flush(&transition.state);
        assert_eq!(flushed.effects.len(), 1);
    }

    #[test]
    fn test_page_zero_is_clamped() {
        let state = loaded("", 2, ResultPage::default());
        let (state, ticket) = settle(&state, vec![ViewEvent::PageChanged(0)]);
        assert_eq!(state.page, page(1));
        assert!(ticket.is_some());
    }

    #[test]
    fn test_successful_load_replaces_listing() {
        let state = loaded("batman", 1, fixtures::result_page(&[1], 50));
        assert_eq!(state.status, FetchStatus::Loaded);
        assert_eq!(state.listing.results[0].id, 1);
        assert_eq!(state.listing.total_results, 50);
        assert_eq!(state.total_pages(), 3);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let state = loaded("", 1, fixtures::result_page(&[1], 1));
        let (state, old) = settle(&state, vec![ViewEvent::PageChanged(2)]);
        let (state, new) = settle(&state, vec![ViewEvent::PageChanged(3)]);
        let (old, new) = (old.unwrap(), new.unwrap());

        let after_stale = on_completion(
            &state,
            Completion::ListingLoaded {
                seq: old.seq,
                outcome: Ok(fixtures::result_page(&[20], 100)),
            },
        )
        .state;
        assert!(after_stale.is_loading());
        assert_eq!(after_stale.listing.results[0].id, 1);

        let after_current = on_completion(
            &after_stale,
            Completion::ListingLoaded {
                seq: new.seq,
                outcome: Ok(fixtures::result_page(&[30], 100)),
            },
        )
        .state;
        assert!(!after_current.is_loading());
        assert_eq!(after_current.listing.results[0].id, 30);
    }

    #[test]
    fn test_failure_keeps_listing_and_reports() {
        let state = loaded("", 1, fixtures::result_page(&[1, 2], 2));
        let (state, ticket) = settle(&state, vec![ViewEvent::PageChanged(2)]);
        let ticket = ticket.unwrap();

        let transition = on_completion(
            &state,
            Completion::ListingLoaded {
                seq: ticket.seq,
                outcome: Err(fetch_error(ticket.request)),
            },
        );

        assert_eq!(transition.state.status, FetchStatus::Failed);
        assert!(!transition.state.is_loading());
        assert_eq!(transition.state.listing.results.len(), 2);
        assert_eq!(transition.state.listing.total_results, 2);
        assert!(transition.state.last_error.is_some());
        assert!(matches!(transition.effects.as_slice(), [Effect::Report(_)]));
    }

    #[test]
    fn test_stale_failure_is_not_reported() {
        let state = loaded("", 1, ResultPage::default());
        let (state, old) = settle(&state, vec![ViewEvent::PageChanged(2)]);
        let (state, _) = settle(&state, vec![ViewEvent::PageChanged(3)]);
        let old = old.unwrap();

        let transition = on_completion(
            &state,
            Completion::ListingLoaded {
                seq: old.seq,
                outcome: Err(fetch_error(old.request)),
            },
        );
        assert!(transition.effects.is_empty());
        assert!(transition.state.is_loading());
    }

    #[test]
    fn test_select_movie_with_poster_requests_lookup() {
        let state = ViewState::new();
        let transition = on_event(&state, ViewEvent::MovieSelected(fixtures::movie(7, "Heat")));

        assert!(transition.state.is_detail_open());
        assert!(transition.state.poster_url.is_none());
        match transition.effects.as_slice() {
            [Effect::LookupPoster {
                selection,
                movie_id,
            }] => {
                assert_eq!(*movie_id, 7);
                assert_eq!(*selection, transition.state.selection_seq);
            }
            other => panic!("unexpected effects: {:?}", other),
        }
    }

    #[test]
    fn test_select_movie_without_poster_skips_lookup() {
        let state = ViewState::new();
        let transition = on_event(
            &state,
            ViewEvent::MovieSelected(fixtures::movie_without_poster(8, "Unknown")),
        );
        assert!(transition.state.is_detail_open());
        assert!(transition.effects.is_empty());
        assert!(transition.state.poster_url.is_none());
    }

    #[test]
    fn test_poster_loaded_sets_url_for_current_selection() {
        let selected = on_event(
            &ViewState::new(),
            ViewEvent::MovieSelected(fixtures::movie(7, "Heat")),
        )
        .state;
        let state = on_completion(
            &selected,
            Completion::PosterLoaded {
                selection: selected.selection_seq,
                poster_url: Some("https://image.tmdb.org/t/p/original/heat.jpg".to_string()),
            },
        )
        .state;
        assert_eq!(
            state.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/heat.jpg")
        );
    }

    #[test]
    fn test_poster_for_previous_selection_is_ignored() {
        let first = on_event(
            &ViewState::new(),
            ViewEvent::MovieSelected(fixtures::movie(1, "First")),
        )
        .state;
        let old_selection = first.selection_seq;
        let second = on_event(&first, ViewEvent::MovieSelected(fixtures::movie(2, "Second"))).state;

        let state = on_completion(
            &second,
            Completion::PosterLoaded {
                selection: old_selection,
                poster_url: Some("/first.jpg".to_string()),
            },
        )
        .state;
        assert!(state.poster_url.is_none());
        assert_eq!(state.selected.unwrap().id, 2);
    }

    #[test]
    fn test_poster_after_close_is_ignored() {
        let selected = on_event(
            &ViewState::new(),
            ViewEvent::MovieSelected(fixtures::movie(1, "First")),
        )
        .state;
        let selection = selected.selection_seq;
        let closed = on_event(&selected, ViewEvent::ModalClosed).state;

        let state = on_completion(
            &closed,
            Completion::PosterLoaded {
                selection,
                poster_url: Some("/first.jpg".to_string()),
            },
        )
        .state;
        assert!(state.selected.is_none());
        assert!(state.poster_url.is_none());
    }

    #[test]
    fn test_selecting_another_movie_clears_poster() {
        let mut state = ViewState::new();
        state.selected = Some(fixtures::movie(1, "First"));
        state.poster_url = Some("https://image.tmdb.org/t/p/original/first.jpg".to_string());

        let transition = on_event(
            &state,
            ViewEvent::MovieSelected(fixtures::movie_without_poster(2, "Second")),
        );
        assert!(transition.state.poster_url.is_none());
        assert_eq!(transition.state.selected.as_ref().map(|m| m.id), Some(2));
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn test_close_clears_selection_and_poster() {
        let mut state = ViewState::new();
        state.selected = Some(fixtures::movie(3, "Ran"));
        state.poster_url = Some("https://image.tmdb.org/t/p/original/ran.jpg".to_string());

        let closed = on_event(&state, ViewEvent::ModalClosed).state;
        assert!(closed.selected.is_none());
        assert!(closed.poster_url.is_none());

        let closed_again = on_event(&closed, ViewEvent::ModalClosed).state;
        assert!(closed_again.selected.is_none());
        assert!(closed_again.poster_url.is_none());
    }

    #[test]
    fn test_selection_does_not_touch_listing_refresh() {
        let state = loaded("", 1, ResultPage::default());
        let (_, ticket) = settle(
            &state,
            vec![
                ViewEvent::MovieSelected(fixtures::movie(1, "One")),
                ViewEvent::ModalClosed,
            ],
        );
        assert!(ticket.is_none());
    }
}
