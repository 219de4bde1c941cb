//! Plain-text rendering of the view state.

use std::fmt::Write;

use tokio::sync::watch;

use cinebrowse_core::{FetchStatus, ViewState};

/// Print every published state until the controller goes away.
pub async fn watch_states(mut rx: watch::Receiver<ViewState>) {
    while rx.changed().await.is_ok() {
        let rendered = render(&rx.borrow_and_update());
        println!("{}", rendered);
    }
}

pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    let heading = if state.query.trim().is_empty() {
        "Latest releases".to_string()
    } else {
        format!("Results for '{}'", state.query)
    };
    let _ = writeln!(
        out,
        "== {} - page {} of {} ==",
        heading,
        state.page,
        state.total_pages()
    );

    if state.empty_input {
        let _ = writeln!(out, "(type something to search)");
    }

    match state.status {
        FetchStatus::Idle => {}
        FetchStatus::Loading => {
            let _ = writeln!(out, "loading...");
        }
        FetchStatus::Loaded | FetchStatus::Failed => {
            if state.listing.is_empty() {
                let _ = writeln!(out, "no movies");
            }
            for (i, movie) in state.listing.results.iter().enumerate() {
                let year = movie
                    .year()
                    .map(|y| format!(" ({})", y))
                    .unwrap_or_default();
                let _ = writeln!(out, "{:>3}. {}{}", i + 1, movie.title, year);
            }
        }
    }

    if let Some(err) = &state.last_error {
        let _ = writeln!(out, "! {}", err);
    }

    if let Some(movie) = &state.selected {
        let _ = writeln!(out, "-- {} --", movie.title);
        if let Some(overview) = &movie.overview {
            let _ = writeln!(out, "{}", overview);
        }
        if let Some(vote) = movie.vote_average {
            let _ = writeln!(out, "rating: {:.1}", vote);
        }
        if let Some(url) = &state.poster_url {
            let _ = writeln!(out, "poster: {}", url);
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinebrowse_core::testing::fixtures;

    #[test]
    fn test_render_new_state() {
        let rendered = render(&ViewState::new());
        assert!(rendered.starts_with("== Latest releases - page 1 of 0 =="));
    }

    #[test]
    fn test_render_selected_movie_with_poster() {
        let mut state = ViewState::new();
        state.listing = fixtures::result_page(&[1, 2], 45);
        state.status = FetchStatus::Loaded;
        state.selected = Some(fixtures::movie(1, "Heat"));
        state.poster_url = Some("https://image.tmdb.org/t/p/original/heat.jpg".to_string());

        let rendered = render(&state);
        assert!(rendered.contains("page 1 of 3"));
        assert!(rendered.contains("  1. Movie 1 (2024)"));
        assert!(rendered.contains("-- Heat --"));
        assert!(rendered.contains("poster: https://image.tmdb.org/t/p/original/heat.jpg"));
    }
}
