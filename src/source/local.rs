//! In-memory cluster source backed by a clusters file.
//!
//! Matching runs on the rayon pool; each fetch resolves its responder from a worker
//! thread unless the source is in inline mode (used by the headless `query` command).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use rayon::prelude::*;

use super::matching::TextMatcher;
use crate::controller::{ClusterSource, FetchResponder, RemovalSink};
use crate::models::{Group, LabelCounts, PageToken, ResultPage, Visit};
use crate::parsers::parse_clusters_file;

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub struct LocalClusterSource {
    groups: Arc<Vec<Group>>,
    page_size: usize,
    inline: bool,
    pending_removals: Vec<Visit>,
}

impl LocalClusterSource {
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups: Arc::new(groups),
            page_size: DEFAULT_PAGE_SIZE,
            inline: false,
            pending_removals: Vec::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(parse_clusters_file(path)?))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resolve fetches on the calling thread
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    fn dispatch(&self, query: String, start: usize, responder: FetchResponder) {
        let groups = Arc::clone(&self.groups);
        let page_size = self.page_size;
        let job = move || {
            if responder.is_cancelled() {
                tracing::trace!(query = %query, "fetch cancelled before it started");
                return;
            }
            let page = build_page(&groups, &query, start, page_size);
            responder.resolve(Ok(page));
        };

        if self.inline {
            job();
        } else {
            rayon::spawn(job);
        }
    }
}

impl RemovalSink for LocalClusterSource {
    fn mark_for_removal(&mut self, visit: &Visit) {
        self.pending_removals.push(visit.clone());
    }

    /// Emptied groups stay in place until the next first-page query, so continuation
    /// tokens handed out earlier still point at the same groups.
    fn commit_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_removals);
        let groups = Arc::make_mut(&mut self.groups);
        for group in groups.iter_mut() {
            group.retain_visits(|visit| !pending.iter().any(|gone| same_visit(gone, visit)));
        }
        let emptied = groups.iter().filter(|group| group.visits().is_empty()).count();
        tracing::info!(removed = pending.len(), emptied_groups = emptied, "committed removals");
    }
}

impl ClusterSource for LocalClusterSource {
    fn query(&mut self, query: &str, responder: FetchResponder) {
        tracing::debug!(query, "local query");
        // A first page starts a new cursor space; drop groups emptied by earlier removals
        if self.groups.iter().any(|group| group.visits().is_empty()) {
            Arc::make_mut(&mut self.groups).retain(|group| !group.visits().is_empty());
        }
        self.dispatch(query.to_string(), 0, responder);
    }

    fn continue_query(&mut self, previous: &ResultPage, responder: FetchResponder) {
        match previous.next {
            Some(PageToken(start)) => self.dispatch(previous.query.clone(), start, responder),
            None => responder.resolve(Err(anyhow!("page for {:?} has no continuation", previous.query))),
        }
    }
}

/// Visits are identified by URL and time; match annotations do not matter
fn same_visit(a: &Visit, b: &Visit) -> bool {
    a.raw_url == b.raw_url && a.timestamp == b.timestamp
}

/// Match `query` against `groups` and cut out the page of matches at or after position `start`.
///
/// Positions (and the returned `next` token) index into `groups`, not into the matches.
pub fn build_page(groups: &[Group], query: &str, start: usize, page_size: usize) -> ResultPage {
    let matched = search(groups, query);
    let first = matched.partition_point(|(pos, _)| *pos < start);
    let last = (first + page_size).min(matched.len());
    let served = &matched[first..last];
    let end = served.last().map_or(start, |(pos, _)| pos + 1);

    let mut label_counts = LabelCounts::new();
    for (_, group) in served {
        // Cumulative, so the count for a label always covers every page seen so far
        let seen = matched[..last].iter().filter(|(_, g)| g.raw_label == group.raw_label).count();
        label_counts.insert(group.raw_label.clone(), seen);
    }

    let can_load_more = last < matched.len();
    let mut page = ResultPage::new(query, served.iter().map(|(_, group)| group.clone()).collect());
    page.label_counts = label_counts;
    page.can_load_more = can_load_more;
    page.is_continuation = start > 0;
    page.next = can_load_more.then_some(PageToken(end));
    page
}

/// Every non-empty group when `query` is blank, otherwise the matching groups annotated
/// with ranges. Each match is paired with its position in `groups`.
fn search(groups: &[Group], query: &str) -> Vec<(usize, Group)> {
    let live = groups.par_iter().enumerate().filter(|(_, group)| !group.visits().is_empty());
    if query.trim().is_empty() {
        return live.map(|(pos, group)| (pos, group.clone())).collect();
    }
    live.map_init(
        || TextMatcher::new(query),
        |matcher, (pos, group)| matcher.annotate(group).map(|annotated| (pos, annotated)),
    )
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::controller::fetch::{FetchKind, FetchOutcome, FetchTracker};
    use crate::models::quote_label;

    fn create_test_group(raw_label: &str, titles: &[&str]) -> Group {
        let visits = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Visit::new(*t, format!("https://example.com/{}", t), Utc.timestamp_opt(i as i64, 0).unwrap())
            })
            .collect();
        Group::new(quote_label(raw_label), raw_label, Utc.timestamp_opt(0, 0).unwrap(), visits)
    }

    fn create_test_groups(count: usize) -> Vec<Group> {
        (0..count).map(|i| create_test_group(&format!("label{}", i % 3), &["a", "b"])).collect()
    }

    fn resolve_inline(source: &mut LocalClusterSource, query: &str) -> ResultPage {
        let mut tracker = FetchTracker::new();
        source.query(query, tracker.begin(FetchKind::FirstPage));
        match tracker.poll() {
            Some(FetchOutcome::Page { page, .. }) => page,
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[test]
    fn test_build_page_paginates() {
        let groups = create_test_groups(25);

        let first = build_page(&groups, "", 0, 10);
        assert_eq!(first.groups.len(), 10);
        assert!(first.can_load_more);
        assert!(!first.is_continuation);
        assert_eq!(first.next, Some(PageToken(10)));

        let last = build_page(&groups, "", 20, 10);
        assert_eq!(last.groups.len(), 5);
        assert!(!last.can_load_more);
        assert!(last.is_continuation);
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_label_counts_are_cumulative() {
        let groups = create_test_groups(6);
        let first = build_page(&groups, "", 0, 3);
        assert_eq!(first.label_counts.get("label0"), Some(1));

        let second = build_page(&groups, "", 3, 3);
        assert_eq!(second.label_counts.get("label0"), Some(2));
        assert_eq!(second.label_counts.len(), 3);
    }

    #[test]
    fn test_search_filters_groups() {
        let groups = vec![
            create_test_group("cats", &["kitten pics", "cat food"]),
            create_test_group("dogs", &["puppy", "leash"]),
        ];
        let matched = search(&groups, "kitten");
        assert_eq!(matched.len(), 1);
        let (pos, group) = &matched[0];
        assert_eq!(*pos, 0);
        assert_eq!(group.raw_label, "cats");
        assert_eq!(group.visits().len(), 1);
    }

    #[test]
    fn test_inline_query_resolves_immediately() {
        let mut source = LocalClusterSource::new(create_test_groups(4)).with_page_size(3).inline();
        let page = resolve_inline(&mut source, "");
        assert_eq!(page.groups.len(), 3);
        assert!(page.can_load_more);
    }

    #[test]
    fn test_continuation_without_token_is_rejected() {
        let mut source = LocalClusterSource::new(create_test_groups(1)).inline();
        let mut tracker = FetchTracker::new();
        source.continue_query(&ResultPage::new("", vec![]), tracker.begin(FetchKind::Continuation));
        assert!(matches!(tracker.poll(), Some(FetchOutcome::Rejected { .. })));
    }

    #[test]
    fn test_background_query_resolves_on_pool() {
        let mut source = LocalClusterSource::new(create_test_groups(2));
        let mut tracker = FetchTracker::new();
        source.query("", tracker.begin(FetchKind::FirstPage));

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        loop {
            if let Some(outcome) = tracker.poll() {
                assert!(matches!(outcome, FetchOutcome::Page { .. }));
                break;
            }
            assert!(std::time::Instant::now() < deadline, "background fetch never resolved");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn test_commit_removals_drops_visits_and_empty_groups() {
        let groups = vec![create_test_group("a", &["1", "2"]), create_test_group("b", &["3"])];
        let mut source = LocalClusterSource::new(groups).inline();
        let first = source.groups()[0].visits()[0].clone();
        let lone = source.groups()[1].visits()[0].clone();

        source.mark_for_removal(&first);
        source.mark_for_removal(&lone);
        assert_eq!(source.groups()[0].visits().len(), 2);
        source.commit_removals();

        assert_eq!(source.groups()[0].visits().len(), 1);
        let page = resolve_inline(&mut source, "");
        assert_eq!(page.groups.len(), 1);
        assert_eq!(page.groups[0].raw_label, "a");
        // The next first-page query compacted the emptied group away
        assert_eq!(source.groups().len(), 1);
    }

    #[test]
    fn test_continuation_token_survives_removed_group() {
        let groups: Vec<Group> = (0..4)
            .map(|i| {
                let (x, y) = (format!("g{}-x", i), format!("g{}-y", i));
                create_test_group(&format!("g{}", i), &[x.as_str(), y.as_str()])
            })
            .collect();
        let mut source = LocalClusterSource::new(groups).with_page_size(2).inline();

        let first = resolve_inline(&mut source, "");
        assert_eq!(first.next, Some(PageToken(2)));
        for visit in first.groups[0].visits() {
            source.mark_for_removal(visit);
        }
        source.commit_removals();

        let mut tracker = FetchTracker::new();
        source.continue_query(&first, tracker.begin(FetchKind::Continuation));
        let labels: Vec<String> = match tracker.poll() {
            Some(FetchOutcome::Page { page, .. }) => page.groups.iter().map(|g| g.raw_label.clone()).collect(),
            other => panic!("expected a page, got {:?}", other),
        };
        assert_eq!(labels, vec!["g2", "g3"]);
    }

    #[test]
    fn test_build_page_token_indexes_source_groups() {
        let groups = vec![
            create_test_group("cats", &["kitten"]),
            create_test_group("dogs", &["puppy"]),
            create_test_group("more cats", &["kitten again"]),
            create_test_group("fish", &["goldfish"]),
        ];
        let first = build_page(&groups, "kitten", 0, 1);
        assert_eq!(first.next, Some(PageToken(1)));

        let second = build_page(&groups, "kitten", 1, 1);
        assert_eq!(second.groups[0].raw_label, "more cats");
        assert!(!second.can_load_more);
        assert_eq!(second.label_counts.get("more cats"), Some(1));
    }
}
