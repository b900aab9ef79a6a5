//! External collaborators the controller talks to.
//!
//! The controller owns one boxed instance of each. None of these calls may block: a data
//! source resolves its [`FetchResponder`] later (possibly from another thread), and an
//! icon fetcher answers through an [`IconDelivery`].

use std::sync::mpsc::Sender;

use super::fetch::FetchResponder;
use crate::models::{ResultPage, Visit};
use crate::rows::{Icon, RowId};

/// Side effects requested after visits are deleted from the list
pub trait RemovalSink {
    fn mark_for_removal(&mut self, visit: &Visit);
    fn commit_removals(&mut self);
}

/// Paginated provider of clustered results
pub trait ClusterSource: RemovalSink {
    /// Fetch the first page for `query`
    fn query(&mut self, query: &str, responder: FetchResponder);
    /// Fetch the page following `previous`
    fn continue_query(&mut self, previous: &ResultPage, responder: FetchResponder);
}

/// Tracks which visits the user has selected
pub trait SelectionTracker {
    fn is_selected(&self, visit: &Visit) -> bool;
    fn toggle(&mut self, visit: &Visit);
    fn selected_items(&self) -> Vec<Visit>;
    fn clear_selection(&mut self);
    /// Register a listener for the "selection changed" event
    fn on_change(&mut self, listener: Box<dyn FnMut(&[Visit])>);
}

/// One pending icon request; resolving it updates the row if it still exists
pub struct IconDelivery {
    row: RowId,
    tx: Sender<(RowId, Icon)>,
}

impl IconDelivery {
    pub(crate) fn new(row: RowId, tx: Sender<(RowId, Icon)>) -> Self {
        Self { row, tx }
    }

    pub fn row(&self) -> RowId {
        self.row
    }

    pub fn deliver(self, icon: Icon) {
        let _ = self.tx.send((self.row, icon));
    }
}

/// Fire-and-forget icon enrichment
pub trait IconFetcher {
    fn fetch(&mut self, url: &str, size_hint: u16, delivery: IconDelivery);
}

/// Receives status announcements (e.g. for screen readers or a status bar)
pub trait Announcer {
    fn announce(&mut self, message: &str);
}

/// Announcer that only logs
#[derive(Debug, Default)]
pub struct TracingAnnouncer;

impl Announcer for TracingAnnouncer {
    fn announce(&mut self, message: &str) {
        tracing::info!(announcement = message, "announce");
    }
}

/// Announcer that forwards to a channel drained by the host
pub struct ChannelAnnouncer {
    tx: Sender<String>,
}

impl ChannelAnnouncer {
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl Announcer for ChannelAnnouncer {
    fn announce(&mut self, message: &str) {
        let _ = self.tx.send(message.to_string());
    }
}

/// Deletion status text: one wording for a single item, another for N
pub fn deletion_announcement(count: usize) -> String {
    if count == 1 {
        "Deleted 1 item from history".to_string()
    } else {
        format!("Deleted {} items from history", count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;

    #[test]
    fn test_deletion_announcement_single_and_many() {
        assert_eq!(deletion_announcement(1), "Deleted 1 item from history");
        assert_eq!(deletion_announcement(4), "Deleted 4 items from history");
    }

    #[test]
    fn test_channel_announcer_forwards() {
        let (tx, rx) = channel();
        let mut announcer = ChannelAnnouncer::new(tx);
        announcer.announce("hello");
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_icon_delivery_carries_row() {
        let (tx, rx) = channel();
        let delivery = IconDelivery::new(RowId(7), tx);
        assert_eq!(delivery.row(), RowId(7));
        delivery.deliver(Icon { glyph: "W".into() });
        assert_eq!(rx.try_recv().unwrap(), (RowId(7), Icon { glyph: "W".into() }));
    }
}
