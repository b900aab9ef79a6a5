//! The clustered-list controller.
//!
//! [`ClusterListController`] turns paginated cluster results into a flat [`RowModel`] and
//! keeps it consistent across queries, pagination, collapse/expand and deletion. It is
//! single-threaded and poll-driven: the host forwards user events, calls [`tick`] from its
//! loop, and renders the rows. Data sources and icon fetchers may resolve from any thread;
//! their results are only applied during `tick`.
//!
//! [`tick`]: ClusterListController::tick

pub mod assembler;
pub mod collaborators;
pub mod config;
pub mod debounce;
pub mod deletion;
pub mod expansion;
pub mod fetch;
pub mod footer;
pub mod query;
pub mod selection;

use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Instant;

pub use collaborators::{
    Announcer, ChannelAnnouncer, ClusterSource, IconDelivery, IconFetcher, RemovalSink,
    SelectionTracker, TracingAnnouncer, deletion_announcement,
};
pub use config::ControllerConfig;
pub use fetch::{FetchKind, FetchResponder};
pub use query::QueryPhase;
pub use selection::VisitSelection;

use self::assembler::{ResultAssembler, set_content_tail_divider};
use self::footer::{FooterInputs, FooterPlan, reconcile_footer};
use self::query::{Completed, QueryController};
use crate::models::{Group, QueryState, Visit};
use crate::rows::{GroupKey, Icon, ListChange, Row, RowId, RowKind, RowModel};

pub struct ClusterListController {
    config: ControllerConfig,
    rows: RowModel,
    query: QueryController,
    assembler: ResultAssembler,
    source: Box<dyn ClusterSource>,
    selection: Box<dyn SelectionTracker>,
    icons: Option<Box<dyn IconFetcher>>,
    announcer: Box<dyn Announcer>,
    icon_tx: Sender<(RowId, Icon)>,
    icon_rx: Receiver<(RowId, Icon)>,
    torn_down: bool,
}

impl ClusterListController {
    pub fn new(config: ControllerConfig, source: Box<dyn ClusterSource>) -> Self {
        let (icon_tx, icon_rx) = channel();
        Self {
            query: QueryController::new(config.debounce),
            assembler: ResultAssembler::new(config.min_group_visits),
            config,
            rows: RowModel::new(),
            source,
            selection: Box::new(VisitSelection::new()),
            icons: None,
            announcer: Box::new(TracingAnnouncer),
            icon_tx,
            icon_rx,
            torn_down: false,
        }
    }

    pub fn with_selection(mut self, selection: Box<dyn SelectionTracker>) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_icon_fetcher(mut self, icons: Box<dyn IconFetcher>) -> Self {
        self.icons = Some(icons);
        self
    }

    pub fn with_announcer(mut self, announcer: Box<dyn Announcer>) -> Self {
        self.announcer = announcer;
        self
    }

    pub fn rows(&self) -> &RowModel {
        &self.rows
    }

    /// Structural changes since the last call, for incremental rendering
    pub fn drain_changes(&mut self) -> Vec<ListChange> {
        self.rows.drain_changes()
    }

    pub fn query_state(&self) -> Option<&QueryState> {
        self.query.current()
    }

    pub fn phase(&self) -> QueryPhase {
        self.query.phase()
    }

    /// The next instant `tick` has timed work for; hosts can sleep until then
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.torn_down { None } else { self.query.debounce_deadline() }
    }

    /// Nothing pending: no debounce timer and no fetch in flight
    pub fn is_settled(&self) -> bool {
        self.phase() == QueryPhase::Idle
    }

    pub fn can_load_more(&self) -> bool {
        self.query.can_load_more()
    }

    pub fn group(&self, key: GroupKey) -> Option<&Group> {
        self.assembler.group(key).map(|entry| &entry.group)
    }

    pub fn is_collapsed(&self, key: GroupKey) -> bool {
        self.assembler.group(key).is_some_and(|entry| entry.is_collapsed())
    }

    pub fn selection(&self) -> &dyn SelectionTracker {
        self.selection.as_ref()
    }

    pub fn selection_mut(&mut self) -> &mut dyn SelectionTracker {
        self.selection.as_mut()
    }

    pub fn scroll_pagination_disabled(&self) -> bool {
        self.config.scroll_pagination_disabled
    }

    pub fn set_scroll_pagination_disabled(&mut self, disabled: bool) {
        if self.config.scroll_pagination_disabled != disabled {
            self.config.scroll_pagination_disabled = disabled;
            self.reconcile_footer();
        }
    }

    /// Apply a new query state. Going from queryless to queryless does nothing; anything
    /// else clears the list and fetches the first page.
    pub fn set_query_state(&mut self, state: QueryState) {
        if self.torn_down {
            return;
        }
        if self.query.accept(state) {
            self.full_reset();
        }
    }

    pub fn on_search_text_changed(&mut self, text: &str) {
        self.on_search_text_changed_at(text, Instant::now());
    }

    /// Debounced: only the last text within the window becomes a query, on a later `tick`
    pub fn on_search_text_changed_at(&mut self, text: &str, now: Instant) {
        if self.torn_down {
            return;
        }
        self.query.on_search_text_changed(text, now);
    }

    pub fn on_end_search(&mut self) {
        if self.torn_down {
            return;
        }
        self.query.cancel_debounce();
        self.set_query_state(QueryState::queryless());
    }

    pub fn on_scroll_near_end(&mut self) {
        if self.torn_down || self.config.scroll_pagination_disabled {
            return;
        }
        self.continue_query();
    }

    pub fn on_load_more_clicked(&mut self) {
        if self.torn_down {
            return;
        }
        self.continue_query();
    }

    /// Activate a suggestion header: search for its raw label
    pub fn select_suggestion(&mut self, raw_label: &str) {
        if self.torn_down {
            return;
        }
        self.query.cancel_debounce();
        self.set_query_state(QueryState::searching(raw_label));
    }

    /// The backing data changed underneath us: rebuild for the current state
    pub fn on_external_data_invalidated(&mut self) {
        if self.torn_down {
            return;
        }
        if self.query.current().is_none() {
            self.query.accept(QueryState::queryless());
        }
        tracing::debug!("external data invalidated; rebuilding list");
        self.full_reset();
    }

    pub fn toggle_group(&mut self, key: GroupKey) -> bool {
        if self.torn_down {
            return false;
        }
        expansion::toggle(&mut self.assembler, &mut self.rows, key, self.selection.as_mut())
    }

    /// Remove the rows for `visits`, ask the source to delete them, and announce the result
    pub fn delete(&mut self, visits: &[Visit]) {
        if self.torn_down || visits.is_empty() {
            return;
        }

        let removed = deletion::delete_visits(&mut self.assembler, &mut self.rows, visits);
        if removed.is_empty() {
            tracing::debug!(requested = visits.len(), "no listed visits to delete");
            return;
        }

        for visit in &removed {
            self.source.mark_for_removal(visit);
            if self.selection.is_selected(visit) {
                self.selection.toggle(visit);
            }
        }
        self.source.commit_removals();

        set_content_tail_divider(&mut self.rows, self.query.can_load_more());
        self.announcer.announce(&deletion_announcement(removed.len()));
        tracing::info!(count = removed.len(), "deleted visits");
    }

    /// Apply everything that became due: a fired debounce, settled fetches, and delivered
    /// icons.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }

        if let Some(state) = self.query.poll_debounce(now) {
            self.set_query_state(state);
        }

        while let Some(completed) = self.query.poll_completion() {
            match completed {
                Completed::Page(kind) => self.apply_page(kind),
                Completed::Rejected(_) => self.reconcile_footer(),
            }
        }

        while let Ok((row, icon)) = self.icon_rx.try_recv() {
            self.apply_icon(row, icon);
        }
    }

    /// Cancel the debounce and any outstanding fetch; every later call is a no-op.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.query.shutdown();
        self.torn_down = true;
        tracing::debug!("controller torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn full_reset(&mut self) {
        self.rows.clear();
        self.assembler.reset();
        if let Some(title) = &self.config.header_title {
            self.rows.push(Row::new(RowId::HEADER, RowKind::Header { title: title.clone() }));
        }
        self.query.start_query(self.source.as_mut());
        self.reconcile_footer();
    }

    fn continue_query(&mut self) {
        if self.query.continue_query(self.source.as_mut()) {
            self.reconcile_footer();
        }
    }

    fn apply_page(&mut self, kind: FetchKind) {
        let Some(page) = self.query.last_page() else {
            return;
        };
        let state = self.query.current().cloned().unwrap_or_default();
        tracing::debug!(?kind, groups = page.groups.len(), "applying page");

        let assembled = self.assembler.assemble(page, &state, &mut self.rows);
        if assembled.wants_prefetch {
            self.query.continue_query(self.source.as_mut());
        }

        if let Some(icons) = self.icons.as_mut() {
            for (row, url) in assembled.icon_requests {
                icons.fetch(
                    &url,
                    self.config.icon_size_hint,
                    IconDelivery::new(row, self.icon_tx.clone()),
                );
            }
        }

        self.reconcile_footer();
    }

    fn apply_icon(&mut self, row: RowId, icon: Icon) {
        if let Some(idx) = self.rows.position(row) {
            self.rows.update(idx, |r| {
                r.set_icon(icon);
            });
        } else if let Some(hidden) = self.assembler.hidden_row_mut(row) {
            hidden.set_icon(icon);
        } else {
            tracing::trace!(?row, "icon arrived for a row that is gone");
        }
    }

    fn reconcile_footer(&mut self) {
        let state = self.query.current();
        let inputs = FooterInputs {
            fetch_in_flight: self.query.fetch_in_flight(),
            can_load_more: self.query.can_load_more(),
            last_result: self.query.last_page(),
            scroll_pagination_disabled: self.config.scroll_pagination_disabled,
            is_searching: state.is_some_and(QueryState::is_searching),
        };
        let empty_text = state
            .and_then(QueryState::empty_state_text)
            .unwrap_or(self.config.empty_state_text.as_str());
        reconcile_footer(&mut self.rows, FooterPlan::derive(&inputs), empty_text);
    }
}

impl Drop for ClusterListController {
    fn drop(&mut self) {
        self.teardown();
    }
}
