//! Search orchestration: parse, look up, group, publish.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::HttpConfig;
use crate::lookup::{LookupError, LookupService};
use crate::models::{BookRequest, ResultRecord};
use crate::search::SearchState;
use crate::utils::{group_results, parse_books};

/// Source of the current time, injectable for tests
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Policy for the network wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Give up on the lookup after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl SearchOptions {
    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build from the HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            timeout: config.timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Marks the search control busy for as long as it lives.
///
/// A search abandoned while still `Loading` is settled as cancelled before
/// the control is re-enabled.
struct BusyGuard<'a> {
    state: &'a watch::Sender<SearchState>,
    ready: &'a watch::Sender<bool>,
}

impl<'a> BusyGuard<'a> {
    fn engage(state: &'a watch::Sender<SearchState>, ready: &'a watch::Sender<bool>) -> Self {
        ready.send_replace(false);
        Self { state, ready }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            debug!("Search abandoned while loading");
            *state = SearchState::Error(LookupError::Cancelled.to_string());
            true
        });
        self.ready.send_replace(true);
    }
}

/// Drives one search at a time through parse → loading → outcome.
///
/// The current [`SearchState`] and the readiness of the search control are
/// published on watch channels; a renderer subscribes and redraws on every
/// change. `search` takes `&mut self`, so a second search cannot start while
/// one is in flight.
///
/// ```rust,no_run
/// use book_finder::lookup::MockLookupService;
/// use book_finder::search::SearchOrchestrator;
/// use std::sync::Arc;
///
/// # async fn run() {
/// let mut orchestrator = SearchOrchestrator::new(Arc::new(MockLookupService::new()));
/// let state = orchestrator.search("Republic – Plato").await;
/// println!("{}", state);
/// # }
/// ```
#[derive(Debug)]
pub struct SearchOrchestrator {
    service: Arc<dyn LookupService>,
    clock: Arc<dyn Clock>,
    options: SearchOptions,
    state_tx: watch::Sender<SearchState>,
    ready_tx: watch::Sender<bool>,
    last_duration: Option<Duration>,
}

impl SearchOrchestrator {
    /// Create an orchestrator in the idle state
    pub fn new(service: Arc<dyn LookupService>) -> Self {
        let (state_tx, _) = watch::channel(SearchState::Idle);
        let (ready_tx, _) = watch::channel(true);
        Self {
            service,
            clock: Arc::new(SystemClock),
            options: SearchOptions::default(),
            state_tx,
            ready_tx,
            last_duration: None,
        }
    }

    /// Set the network wait policy
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the clock used to time lookups
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The current state
    pub fn state(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    /// Watch the readiness of the search control
    pub fn ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// Whether a new search can be started
    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    /// How long the last completed lookup took
    pub fn last_duration(&self) -> Option<Duration> {
        self.last_duration
    }

    /// Run a search with no way to cancel it
    pub async fn search(&mut self, raw: &str) -> SearchState {
        self.search_with_cancel(raw, &CancellationToken::new()).await
    }

    /// Run a search that ends early when `cancel` fires
    ///
    /// Returns the state the search settled in. Parse failures never reach the
    /// network. The search control is restored to ready on every exit path.
    /// If this future is dropped mid-flight the state settles as
    /// `Error("Search cancelled")`.
    pub async fn search_with_cancel(
        &mut self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> SearchState {
        self.transition(SearchState::Idle);

        let books = match parse_books(raw) {
            Ok(books) => books,
            Err(e) => {
                warn!(line = ?e.line(), "Rejected search input: {}", e);
                self.transition(SearchState::Error(e.to_string()));
                return self.state();
            }
        };

        let _busy = BusyGuard::engage(&self.state_tx, &self.ready_tx);
        self.transition(SearchState::Loading);
        info!(
            "Searching {} for {} books",
            self.service.name(),
            books.len()
        );

        let started = self.clock.now();
        let outcome = self.lookup(&books, cancel).await;
        let elapsed = self.clock.now().saturating_duration_since(started);
        self.last_duration = Some(elapsed);

        let next = match outcome {
            Ok(records) if records.is_empty() => {
                info!("No results found in {:?}", elapsed);
                SearchState::Empty
            }
            Ok(records) => {
                let grouped = group_results(records);
                info!(
                    "Found {} links for {} books in {:?}",
                    grouped.record_count(),
                    grouped.len(),
                    elapsed
                );
                SearchState::Results(grouped)
            }
            Err(e) => {
                if e.is_transport() {
                    warn!("Search failed talking to {}: {}", self.service.name(), e);
                } else {
                    info!("Search ended: {}", e);
                }
                SearchState::Error(e.to_string())
            }
        };

        self.transition(next);
        self.state()
    }

    async fn lookup(
        &self,
        books: &[BookRequest],
        cancel: &CancellationToken,
    ) -> Result<Vec<ResultRecord>, LookupError> {
        let request = self.service.search(books);
        let bounded = async {
            match self.options.timeout {
                Some(limit) => match tokio::time::timeout(limit, request).await {
                    Ok(result) => result,
                    Err(_) => Err(LookupError::Timeout(limit)),
                },
                None => request.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LookupError::Cancelled),
            result = bounded => result,
        }
    }

    fn transition(&self, next: SearchState) {
        debug!("State -> {}", next.name());
        self.state_tx.send_replace(next);
    }
}
