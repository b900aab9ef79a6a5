//! TUI application state and event handling.
//!
//! The `App` owns a [`ClusterListController`] and acts as its host: it forwards key presses
//! as controller events, calls `tick` every loop iteration, and redraws when the row model
//! reports changes. Deletion announcements arrive over a channel and are shown in the status
//! bar.

use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::{ClipboardProvider, SystemClipboard, copy_visit_url};
use crate::controller::{
    ChannelAnnouncer, ClusterListController, ClusterSource, ControllerConfig,
};
use crate::models::{QueryState, Visit};
use crate::rows::{FooterState, HeaderAction, Row, RowKind};
use crate::source::GlyphIconFetcher;

const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Moving the cursor this close to the end asks for the next page
const SCROLL_NEAR_END_ROWS: usize = 3;
const PAGE_JUMP: isize = 10;
const MAX_QUERY_LEN: usize = 256;
/// Upper bound on how long one event poll blocks
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

pub struct App {
    controller: ClusterListController,
    announcements: Receiver<String>,
    clipboard: Option<Box<dyn ClipboardProvider>>,
    selected_idx: usize,
    search_query: String,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(config: ControllerConfig, source: Box<dyn ClusterSource>) -> Self {
        let (tx, announcements) = channel();
        let controller = ClusterListController::new(config, source)
            .with_icon_fetcher(Box::new(GlyphIconFetcher))
            .with_announcer(Box::new(ChannelAnnouncer::new(tx)));

        Self {
            controller,
            announcements,
            clipboard: None,
            selected_idx: 0,
            search_query: String::new(),
            should_quit: false,
            status_message: None,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Use `clipboard` instead of the system clipboard
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardProvider>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn controller(&self) -> &ClusterListController {
        &self.controller
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.controller.set_query_state(QueryState::queryless());

        while !self.should_quit {
            self.update(Instant::now());

            // Redraw periodically too, for terminal resizes
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100)
            {
                let group_label = self.selected_group_label();
                terminal.draw(|f| {
                    let state = RenderState {
                        rows: self.controller.rows().rows(),
                        selected_idx: self.selected_idx,
                        search_query: &self.search_query,
                        searching: self.is_searching(),
                        phase: self.controller.phase(),
                        selection: self.controller.selection(),
                        group_label: group_label.as_deref(),
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(self.poll_timeout(Instant::now()))?;
            self.handle_action(action);
        }

        self.controller.teardown();
        Ok(())
    }

    /// Wake up for the debounce deadline when it comes before the regular poll interval
    fn poll_timeout(&self, now: Instant) -> Duration {
        self.controller
            .next_deadline()
            .map_or(EVENT_POLL_INTERVAL, |deadline| deadline.saturating_duration_since(now))
            .min(EVENT_POLL_INTERVAL)
    }

    /// Advance the controller and pick up anything it produced
    fn update(&mut self, now: Instant) {
        self.controller.tick(now);

        if !self.controller.drain_changes().is_empty() {
            self.clamp_selection();
            self.needs_redraw = true;
        }

        while let Ok(message) = self.announcements.try_recv() {
            self.set_status(message, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
        }

        if self.status_message.as_ref().is_some_and(|msg| now >= msg.expires_at) {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn is_searching(&self) -> bool {
        self.controller.query_state().is_some_and(QueryState::is_searching)
    }

    fn row_count(&self) -> usize {
        self.controller.rows().len()
    }

    fn selected_row(&self) -> Option<&Row> {
        self.controller.rows().get(self.selected_idx)
    }

    fn selected_visit(&self) -> Option<Visit> {
        self.selected_row().and_then(Row::visit).cloned()
    }

    fn selected_group_label(&self) -> Option<String> {
        let key = self.selected_row()?.group_key()?;
        self.controller.group(key).map(|group| group.label.clone())
    }

    fn clamp_selection(&mut self) {
        self.selected_idx = self.selected_idx.min(self.row_count().saturating_sub(1));
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Escape => {
                if self.is_searching() {
                    self.search_query.clear();
                    self.selected_idx = 0;
                    self.controller.on_end_search();
                    self.needs_redraw = true;
                } else {
                    self.should_quit = true;
                }
            }
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE_JUMP),
            Action::PageDown => self.move_selection(PAGE_JUMP),
            Action::Home => self.move_selection(isize::MIN / 2),
            Action::End => self.move_selection(isize::MAX / 2),
            Action::Activate => self.activate(),
            Action::ToggleSelect => {
                if let Some(visit) = self.selected_visit() {
                    self.controller.selection_mut().toggle(&visit);
                    self.needs_redraw = true;
                }
            }
            Action::DeleteSelected => self.delete_selected(),
            Action::CopyUrl => self.copy_selected_url(),
            Action::Refresh => {
                self.controller.on_external_data_invalidated();
                self.selected_idx = 0;
            }
            Action::UpdateSearch(c) => {
                if self.search_query.len() < MAX_QUERY_LEN {
                    self.search_query.push(c);
                    self.search_changed();
                }
            }
            Action::DeleteChar => {
                if self.search_query.pop().is_some() {
                    self.search_changed();
                }
            }
            Action::None => {}
        }
    }

    fn search_changed(&mut self) {
        self.controller.on_search_text_changed(&self.search_query);
        self.selected_idx = 0;
        self.needs_redraw = true;
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.row_count();
        if total == 0 {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize).saturating_add(delta).max(0) as usize;
        self.selected_idx = new_idx.min(total - 1);
        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }

        if self.selected_idx + SCROLL_NEAR_END_ROWS >= total {
            self.controller.on_scroll_near_end();
        }
    }

    fn activate(&mut self) {
        let Some(kind) = self.selected_row().map(|row| row.kind().clone()) else {
            return;
        };

        match kind {
            RowKind::GroupHeader { action: HeaderAction::Search, raw_label, .. } => {
                self.search_query = raw_label.clone();
                self.selected_idx = 0;
                self.controller.select_suggestion(&raw_label);
            }
            RowKind::GroupHeader { group: Some(key), .. } => {
                self.controller.toggle_group(key);
                self.clamp_selection();
            }
            RowKind::RelatedSearches { searches, .. } => {
                if let Some(first) = searches.first() {
                    self.search_query = first.clone();
                    self.selected_idx = 0;
                    self.controller.select_suggestion(first);
                }
            }
            RowKind::ProgressFooter(FooterState::Button) => self.controller.on_load_more_clicked(),
            RowKind::Visit { .. } => self.copy_selected_url(),
            _ => {}
        }
        self.needs_redraw = true;
    }

    fn delete_selected(&mut self) {
        let mut visits = self.controller.selection().selected_items();
        if visits.is_empty() {
            visits.extend(self.selected_visit());
        }
        if visits.is_empty() {
            self.set_status("✗ Nothing to delete", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        }
        self.controller.delete(&visits);
        self.clamp_selection();
        self.needs_redraw = true;
    }

    fn copy_selected_url(&mut self) {
        let Some(visit) = self.selected_visit() else {
            self.set_status("✗ Select a visit to copy", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        };

        let result = match self.clipboard.as_mut() {
            Some(clipboard) => copy_visit_url(&visit, clipboard.as_mut()),
            None => SystemClipboard::new().and_then(|mut clipboard| copy_visit_url(&visit, &mut clipboard)),
        };

        match result {
            Ok(()) => {
                self.set_status("✓ Copied URL to clipboard", MessageType::Success, STATUS_SUCCESS_DURATION_MS)
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.set_status(format!("✗ Clipboard error: {}", e), MessageType::Error, STATUS_ERROR_DURATION_MS)
            }
        }
    }
}
