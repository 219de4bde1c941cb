//! Error reporting seam for listing fetch failures.

use std::sync::Mutex;

use crate::resolver::FetchError;

/// Receives listing fetch failures the view controller cannot surface itself.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &FetchError);
}

/// Logs every failure through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &FetchError) {
        tracing::error!(
            endpoint = error.request.endpoint(),
            page = error.request.page().get(),
            "Listing fetch failed: {}",
            error
        );
    }
}

/// Keeps the rendered message of every reported failure.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or_default()
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &FetchError) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(error.to_string());
        }
    }
}
