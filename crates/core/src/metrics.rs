//! Prometheus metrics for the browser core.
//!
//! This module provides metrics for:
//! - Listing fetches (discover/search) by outcome
//! - Responses dropped because a newer request superseded them
//! - Poster lookups

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Listing fetches by endpoint and result.
pub static LISTING_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinebrowse_listing_fetches_total",
            "Total listing fetches issued to the catalog",
        ),
        &["endpoint", "result"], // endpoint: "discover", "search"; result: "success", "failure"
    )
    .unwrap()
});

/// Listing responses ignored because a newer fetch was issued.
pub static STALE_RESPONSES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "cinebrowse_stale_responses_total",
        "Listing responses discarded because a newer request superseded them",
    )
    .unwrap()
});

/// Poster lookups by result.
pub static POSTER_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cinebrowse_poster_lookups_total", "Total poster lookups"),
        &["result"], // "found", "none", "failed", "stale"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(LISTING_FETCHES.clone()),
        Box::new(STALE_RESPONSES.clone()),
        Box::new(POSTER_LOOKUPS.clone()),
    ]
}
