//! The view controller task.
//!
//! [`ViewController`] owns the [`ViewState`] and is the only place it changes.
//! User intents arrive through a cloneable [`ViewHandle`]; network work runs in
//! spawned tasks whose results come back as [`Completion`]s. Every new state is
//! published on a `watch` channel.
//!
//! One loop iteration is one tick: the controller drains every message that is
//! already queued, applies them all, then flushes at most one listing fetch.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::external_catalog::{ImageUrls, MovieCatalog, MovieSummary};
use crate::metrics::{POSTER_LOOKUPS, STALE_RESPONSES};
use crate::report::ErrorReporter;
use crate::resolver::QueryResolver;

use super::reducer::{self, Completion, Effect, FetchTicket, Transition, ViewEvent};
use super::state::ViewState;

/// Errors returned by [`ViewHandle`].
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("View controller has stopped")]
    Closed,
}

/// Messages accepted by the controller task.
#[derive(Debug)]
enum ViewCommand {
    Event(ViewEvent),
    /// Events applied within the same tick.
    Batch(Vec<ViewEvent>),
    Shutdown,
}

/// Handle for driving a running [`ViewController`].
///
/// This is cheaply cloneable. The controller stops once every handle is
/// dropped or [`shutdown`](Self::shutdown) is called.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    tx: mpsc::Sender<ViewCommand>,
    state_rx: watch::Receiver<ViewState>,
}

impl ViewHandle {
    /// Send a single user intent.
    pub async fn send(&self, event: ViewEvent) -> Result<(), ViewError> {
        self.command(ViewCommand::Event(event)).await
    }

    /// Send several intents that must be applied within one tick, so that
    /// their (query, page) changes produce a single fetch.
    pub async fn send_batch(&self, events: Vec<ViewEvent>) -> Result<(), ViewError> {
        self.command(ViewCommand::Batch(events)).await
    }

    pub async fn set_query_text(&self, text: impl Into<String>) -> Result<(), ViewError> {
        self.send(ViewEvent::QueryTextChanged(text.into())).await
    }

    pub async fn submit_search(&self) -> Result<(), ViewError> {
        self.send(ViewEvent::SearchSubmitted).await
    }

    pub async fn change_page(&self, page: u32) -> Result<(), ViewError> {
        self.send(ViewEvent::PageChanged(page)).await
    }

    pub async fn select_movie(&self, movie: MovieSummary) -> Result<(), ViewError> {
        self.send(ViewEvent::MovieSelected(movie)).await
    }

    pub async fn close_modal(&self) -> Result<(), ViewError> {
        self.send(ViewEvent::ModalClosed).await
    }

    /// Ask the controller to stop.
    pub async fn shutdown(&self) -> Result<(), ViewError> {
        self.command(ViewCommand::Shutdown).await
    }

    /// Snapshot of the latest published state.
    pub fn state(&self) -> ViewState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_rx.clone()
    }

    /// Wait until the published state satisfies `predicate`.
    pub async fn wait_for<F>(&self, predicate: F) -> Result<ViewState, ViewError>
    where
        F: FnMut(&ViewState) -> bool,
    {
        let mut rx = self.state_rx.clone();
        let state = rx.wait_for(predicate).await.map_err(|_| ViewError::Closed)?;
        Ok(state.clone())
    }

    async fn command(&self, command: ViewCommand) -> Result<(), ViewError> {
        self.tx.send(command).await.map_err(|_| ViewError::Closed)
    }
}

/// Background task that owns the view state.
pub struct ViewController {
    state: ViewState,
    resolver: Arc<QueryResolver>,
    catalog: Arc<dyn MovieCatalog>,
    image_urls: ImageUrls,
    reporter: Arc<dyn ErrorReporter>,
    rx: mpsc::Receiver<ViewCommand>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    state_tx: watch::Sender<ViewState>,
    listing_task: Option<JoinHandle<()>>,
    poster_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("state", &self.state)
            .field("image_urls", &self.image_urls)
            .finish_non_exhaustive()
    }
}

/// Create a complete view system
///
/// Returns:
/// - `ViewHandle` - for sending user intents and reading state
/// - `ViewController` - spawn this as a background task with `tokio::spawn(controller.run())`
pub fn create_view_system(
    catalog: Arc<dyn MovieCatalog>,
    image_urls: ImageUrls,
    reporter: Arc<dyn ErrorReporter>,
    config: &BrowserConfig,
) -> (ViewHandle, ViewController) {
    let (tx, rx) = mpsc::channel(config.event_buffer.max(1));
    let (completion_tx, completion_rx) = mpsc::unbounded_channel();
    let state = ViewState::new();
    let (state_tx, state_rx) = watch::channel(state.clone());

    let handle = ViewHandle { tx, state_rx };
    let controller = ViewController {
        state,
        resolver: Arc::new(QueryResolver::new(Arc::clone(&catalog))),
        catalog,
        image_urls,
        reporter,
        rx,
        completion_tx,
        completion_rx,
        state_tx,
        listing_task: None,
        poster_task: None,
    };
    (handle, controller)
}

impl ViewController {
    /// Run the controller until shutdown or until every handle is dropped.
    ///
    /// The initial state is dirty, so the first tick loads the discover
    /// listing for page 1.
    pub async fn run(mut self) {
        info!("View controller started");
        self.settle(Vec::new());

        loop {
            let first = tokio::select! {
                command = self.rx.recv() => match command {
                    Some(ViewCommand::Shutdown) | None => break,
                    Some(ViewCommand::Event(event)) => Message::Events(vec![event]),
                    Some(ViewCommand::Batch(events)) => Message::Events(events),
                },
                Some(completion) = self.completion_rx.recv() => Message::Completion(completion),
            };

            let mut effects = Vec::new();
            let mut stop = false;
            self.apply(first, &mut effects);

            // Drain whatever else is queued in this tick.
            while let Ok(completion) = self.completion_rx.try_recv() {
                self.apply(Message::Completion(completion), &mut effects);
            }
            loop {
                match self.rx.try_recv() {
                    Ok(ViewCommand::Event(event)) => {
                        self.apply(Message::Events(vec![event]), &mut effects)
                    }
                    Ok(ViewCommand::Batch(events)) => {
                        self.apply(Message::Events(events), &mut effects)
                    }
                    Ok(ViewCommand::Shutdown) => {
                        stop = true;
                        break;
                    }
                    Err(_) => break,
                }
            }

            if stop {
                break;
            }
            self.settle(effects);
        }

        self.abort_tasks();
        info!("View controller shutting down");
    }

    fn apply(&mut self, message: Message, effects: &mut Vec<Effect>) {
        match message {
            Message::Events(events) => {
                for event in events {
                    debug!("View event: {:?}", event);
                    let transition = reducer::on_event(&self.state, event);
                    self.accept(transition, effects);
                }
            }
            Message::Completion(completion) => {
                match &completion {
                    Completion::ListingLoaded { seq, .. } if !self.state.is_current_fetch(*seq) => {
                        debug!("Discarding stale listing response seq={}", seq);
                        STALE_RESPONSES.inc();
                    }
                    Completion::PosterLoaded { selection, .. }
                        if !self.state.is_current_selection(*selection) =>
                    {
                        debug!("Discarding poster for selection {}", selection);
                        POSTER_LOOKUPS.with_label_values(&["stale"]).inc();
                    }
                    _ => {}
                }
                let transition = reducer::on_completion(&self.state, completion);
                self.accept(transition, effects);
            }
        }
    }

    fn accept(&mut self, transition: Transition, effects: &mut Vec<Effect>) {
        self.state = transition.state;
        effects.extend(transition.effects);
    }

    /// Flush pending changes, publish the state, then run effects.
    fn settle(&mut self, mut effects: Vec<Effect>) {
        let flushed = reducer::flush(&self.state);
        self.accept(flushed, &mut effects);
        self.publish();

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn publish(&self) {
        let state = &self.state;
        self.state_tx.send_if_modified(|current| {
            if current == state {
                false
            } else {
                *current = state.clone();
                true
            }
        });
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchListing(ticket) => self.spawn_listing_fetch(ticket),
            Effect::LookupPoster {
                selection,
                movie_id,
            } => self.spawn_poster_lookup(selection, movie_id),
            Effect::Report(error) => self.reporter.report(&error),
        }
    }

    /// Start a listing fetch, aborting the one it supersedes.
    fn spawn_listing_fetch(&mut self, ticket: FetchTicket) {
        if let Some(previous) = self.listing_task.take() {
            previous.abort();
        }

        debug!("Issuing fetch seq={}: {}", ticket.seq, ticket.request);
        let resolver = Arc::clone(&self.resolver);
        let tx = self.completion_tx.clone();

        self.listing_task = Some(tokio::spawn(async move {
            let FetchTicket { seq, request } = ticket;
            let outcome = resolver.execute(request).await;
            let _ = tx.send(Completion::ListingLoaded { seq, outcome });
        }));
    }

    /// Start a poster lookup. Failures leave the poster unset.
    fn spawn_poster_lookup(&mut self, selection: u64, movie_id: u32) {
        if let Some(previous) = self.poster_task.take() {
            previous.abort();
        }

        let catalog = Arc::clone(&self.catalog);
        let image_urls = self.image_urls.clone();
        let tx = self.completion_tx.clone();

        self.poster_task = Some(tokio::spawn(async move {
            let poster_url = match catalog.movie_images(movie_id).await {
                Ok(images) => match images.first_poster() {
                    Some(poster) => {
                        POSTER_LOOKUPS.with_label_values(&["found"]).inc();
                        Some(image_urls.poster_url(&poster.file_path))
                    }
                    None => {
                        POSTER_LOOKUPS.with_label_values(&["none"]).inc();
                        None
                    }
                },
                Err(e) => {
                    POSTER_LOOKUPS.with_label_values(&["failed"]).inc();
                    warn!("Poster lookup for movie {} failed: {}", movie_id, e);
                    None
                }
            };
            let _ = tx.send(Completion::PosterLoaded {
                selection,
                poster_url,
            });
        }));
    }

    fn abort_tasks(&mut self) {
        for task in [self.listing_task.take(), self.poster_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}

enum Message {
    Events(Vec<ViewEvent>),
    Completion(Completion),
}
