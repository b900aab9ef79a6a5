//! At-most-one-in-flight fetch tracking.
//!
//! Every issued fetch gets a generation number. Issuing a newer fetch (or tearing down)
//! bumps the shared generation, which supersedes the outstanding one: its responder
//! reports `is_cancelled()`, and if it resolves anyway the completion is dropped on
//! arrival because its generation no longer matches.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use anyhow::Result;

use crate::models::ResultPage;

/// Which kind of page a fetch will produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    FirstPage,
    Continuation,
}

struct Completion {
    generation: u64,
    result: Result<ResultPage>,
}

/// Handle a data source uses to resolve one fetch; may be moved to another thread
pub struct FetchResponder {
    generation: u64,
    current: Arc<AtomicU64>,
    tx: Sender<Completion>,
}

impl FetchResponder {
    /// True once a newer fetch or a teardown superseded this one
    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.generation
    }

    pub fn resolve(self, result: Result<ResultPage>) {
        if self.is_cancelled() {
            return;
        }
        // The controller may already be gone; nothing to deliver to then
        let _ = self.tx.send(Completion { generation: self.generation, result });
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    generation: u64,
    kind: FetchKind,
}

/// What came back for the current fetch
#[derive(Debug)]
pub enum FetchOutcome {
    Page { kind: FetchKind, page: ResultPage },
    Rejected { kind: FetchKind, error: anyhow::Error },
}

pub struct FetchTracker {
    current: Arc<AtomicU64>,
    in_flight: Option<InFlight>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl FetchTracker {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { current: Arc::new(AtomicU64::new(0)), in_flight: None, tx, rx }
    }

    /// Supersede anything outstanding and hand out a responder for a new fetch
    pub fn begin(&mut self, kind: FetchKind) -> FetchResponder {
        let generation = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(previous) = self.in_flight.replace(InFlight { generation, kind }) {
            tracing::debug!(superseded = previous.generation, generation, "superseding fetch");
        }
        FetchResponder { generation, current: Arc::clone(&self.current), tx: self.tx.clone() }
    }

    /// Supersede the outstanding fetch without issuing a new one
    pub fn cancel(&mut self) {
        self.current.fetch_add(1, Ordering::AcqRel);
        self.in_flight = None;
    }

    pub fn in_flight(&self) -> Option<FetchKind> {
        self.in_flight.map(|f| f.kind)
    }

    /// Next completion belonging to the current fetch; stale ones are discarded
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        loop {
            let completion = match self.rx.try_recv() {
                Ok(completion) => completion,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            };

            let Some(in_flight) = self.in_flight else {
                tracing::debug!(generation = completion.generation, "dropping unexpected completion");
                continue;
            };
            if completion.generation != in_flight.generation {
                tracing::debug!(
                    stale = completion.generation,
                    current = in_flight.generation,
                    "dropping superseded completion"
                );
                continue;
            }

            self.in_flight = None;
            return Some(match completion.result {
                Ok(page) => FetchOutcome::Page { kind: in_flight.kind, page },
                Err(error) => FetchOutcome::Rejected { kind: in_flight.kind, error },
            });
        }
    }
}

impl Default for FetchTracker {
    fn default() -> Self {
        Self::new()
    }
}
