//! Debounced search and stale-response suppression.
//!
//! Keystrokes go through [`SearchDebouncer::settle`]; only the last one in a
//! quiet window goes on to query. Each query takes a [`QueryTicket`] from
//! [`LatestQuery`], and a response is applied only if its ticket is still the
//! newest, so a slow early response cannot overwrite a later one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use fleetdesk_client::FleetBackend;
use fleetdesk_fleet::KeyRecord;

use crate::error::UiError;
use crate::view::LoadState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Monotonic ticket dispenser. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct LatestQuery {
    latest: Arc<AtomicU64>,
}

impl LatestQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Trailing-edge debounce.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    window: Duration,
    keystrokes: LatestQuery,
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            keystrokes: LatestQuery::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait out the window. `true` if no later keystroke arrived meanwhile.
    pub async fn settle(&self) -> bool {
        let ticket = self.keystrokes.issue();
        tokio::time::sleep(self.window).await;
        self.keystrokes.is_current(ticket)
    }
}

/// Key lookup box on the keys page.
#[derive(Debug, Clone)]
pub struct KeySearch {
    pub query: String,
    pub results: LoadState<Vec<KeyRecord>>,
    debouncer: SearchDebouncer,
    latest: LatestQuery,
}

impl KeySearch {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            results: LoadState::Loaded(Vec::new()),
            debouncer: SearchDebouncer::new(debounce),
            latest: LatestQuery::new(),
        }
    }

    pub fn debouncer(&self) -> &SearchDebouncer {
        &self.debouncer
    }

    pub fn begin(&mut self, query: impl Into<String>) -> QueryTicket {
        self.query = query.into();
        self.latest.issue()
    }

    /// Apply a response; `false` when it was superseded and dropped.
    pub fn accept(&mut self, ticket: QueryTicket, result: Result<Vec<KeyRecord>, UiError>) -> bool {
        if !self.latest.is_current(ticket) {
            tracing::debug!(?ticket, "dropping stale key search response");
            return false;
        }
        self.results = match result {
            Ok(keys) => LoadState::Loaded(keys),
            Err(err) => LoadState::Failed(err.report("key_search")),
        };
        true
    }

    /// Issue, fetch and apply one query. Blank queries clear the results.
    pub async fn run(&mut self, backend: &dyn FleetBackend, query: &str) -> bool {
        let ticket = self.begin(query);
        let query = query.trim();
        if query.is_empty() {
            return self.accept(ticket, Ok(Vec::new()));
        }
        let result = backend.search_keys(query).await.map_err(UiError::from);
        self.accept(ticket, result)
    }
}
