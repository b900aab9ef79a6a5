//! Query lifecycle: debounced text, the current state, and first/continuation fetches.

use std::time::{Duration, Instant};

use super::collaborators::ClusterSource;
use super::debounce::Debouncer;
use super::fetch::{FetchKind, FetchOutcome, FetchTracker};
use crate::models::{QueryState, ResultPage};

/// What the query side is busy with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Debouncing,
    Fetching,
    FetchingMore,
}

/// A settled fetch, as seen by the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completed {
    /// The page is available from [`QueryController::last_page`]
    Page(FetchKind),
    Rejected(FetchKind),
}

pub struct QueryController {
    debouncer: Debouncer,
    state: Option<QueryState>,
    fetches: FetchTracker,
    last_page: Option<ResultPage>,
}

impl QueryController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            state: None,
            fetches: FetchTracker::new(),
            last_page: None,
        }
    }

    pub fn current(&self) -> Option<&QueryState> {
        self.state.as_ref()
    }

    pub fn last_page(&self) -> Option<&ResultPage> {
        self.last_page.as_ref()
    }

    pub fn can_load_more(&self) -> bool {
        self.last_page.as_ref().is_some_and(|page| page.can_load_more)
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetches.in_flight().is_some()
    }

    /// When the pending debounce fires, if one is pending
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn phase(&self) -> QueryPhase {
        if self.debouncer.is_pending() {
            return QueryPhase::Debouncing;
        }
        match self.fetches.in_flight() {
            Some(FetchKind::FirstPage) => QueryPhase::Fetching,
            Some(FetchKind::Continuation) => QueryPhase::FetchingMore,
            None => QueryPhase::Idle,
        }
    }

    pub fn on_search_text_changed(&mut self, text: &str, now: Instant) {
        self.debouncer.schedule(text, now);
    }

    pub fn cancel_debounce(&mut self) {
        self.debouncer.cancel();
    }

    /// The searching state to apply once the debounce window has passed
    pub fn poll_debounce(&mut self, now: Instant) -> Option<QueryState> {
        self.debouncer.poll(now).map(QueryState::searching)
    }

    /// Store `new` unless it is a queryless-to-queryless transition.
    /// Returns true when the list has to be rebuilt.
    pub fn accept(&mut self, new: QueryState) -> bool {
        let was_queryless = self.state.as_ref().is_some_and(|old| !old.is_searching());
        if was_queryless && !new.is_searching() {
            tracing::trace!("ignoring queryless state while already queryless");
            return false;
        }
        tracing::debug!(query = new.query(), searching = new.is_searching(), "query state changed");
        self.state = Some(new);
        true
    }

    /// Issue the first-page fetch for the current state, superseding anything in flight
    pub fn start_query(&mut self, source: &mut dyn ClusterSource) {
        self.last_page = None;
        let query = self.state.as_ref().map(|state| state.query().to_string()).unwrap_or_default();
        let responder = self.fetches.begin(FetchKind::FirstPage);
        source.query(&query, responder);
    }

    /// Ask for the next page. No-op while any fetch is in flight or when nothing more is
    /// available. Returns whether a fetch was issued.
    pub fn continue_query(&mut self, source: &mut dyn ClusterSource) -> bool {
        if self.fetch_in_flight() {
            return false;
        }
        let Some(previous) = self.last_page.as_ref().filter(|page| page.can_load_more) else {
            return false;
        };
        let responder = self.fetches.begin(FetchKind::Continuation);
        source.continue_query(previous, responder);
        true
    }

    /// Next settled fetch. Pages replace `last_page`; rejections leave it alone.
    pub fn poll_completion(&mut self) -> Option<Completed> {
        match self.fetches.poll()? {
            FetchOutcome::Page { kind, page } => {
                self.last_page = Some(page);
                Some(Completed::Page(kind))
            }
            FetchOutcome::Rejected { kind, error } => {
                tracing::warn!(?kind, error = %error, "fetch rejected; keeping current rows");
                Some(Completed::Rejected(kind))
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        self.fetches.cancel();
    }
}
