//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use history_clusters::controller::{ClusterSource, FetchResponder, RemovalSink};
use history_clusters::models::{Group, LabelCounts, ResultPage, Visit};
use tempfile::NamedTempFile;

pub fn test_time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Builder for visits
pub struct VisitBuilder {
    title: String,
    raw_url: String,
    timestamp: i64,
}

impl VisitBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            raw_url: format!("https://example.com/{}", title.replace(' ', "-")),
            timestamp: 1_700_000_000,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.raw_url = url.to_string();
        self
    }

    pub fn timestamp(mut self, secs: i64) -> Self {
        self.timestamp = secs;
        self
    }

    pub fn build(self) -> Visit {
        Visit::new(self.title, self.raw_url, test_time(self.timestamp))
    }
}

/// Builder for groups
pub struct GroupBuilder {
    raw_label: String,
    visits: Vec<Visit>,
    related: Vec<String>,
}

impl GroupBuilder {
    pub fn new(raw_label: &str) -> Self {
        Self { raw_label: raw_label.to_string(), visits: Vec::new(), related: Vec::new() }
    }

    /// Add visits titled `<label>-<n>`
    pub fn with_visits(mut self, count: usize) -> Self {
        for n in 0..count {
            let title = format!("{}-{}", self.raw_label, n);
            self.visits.push(VisitBuilder::new(&title).build());
        }
        self
    }

    pub fn visit(mut self, visit: Visit) -> Self {
        self.visits.push(visit);
        self
    }

    pub fn related(mut self, searches: &[&str]) -> Self {
        self.related = searches.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> Group {
        let label = history_clusters::models::quote_label(&self.raw_label);
        Group::new(label, self.raw_label, test_time(1_700_000_000), self.visits)
            .with_related_searches(self.related)
    }
}

/// Page with label counts derived from the groups' visit counts
pub fn page(query: &str, groups: Vec<Group>, can_load_more: bool, is_continuation: bool) -> ResultPage {
    let label_counts: LabelCounts =
        groups.iter().map(|g| (g.raw_label.clone(), g.visits().len())).collect();
    let mut page = ResultPage::new(query, groups);
    page.label_counts = label_counts;
    page.can_load_more = can_load_more;
    page.is_continuation = is_continuation;
    page
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Query(String),
    Continue(String),
}

#[derive(Default)]
struct ScriptedState {
    requests: Vec<Request>,
    pending: Vec<FetchResponder>,
    marked: Vec<Visit>,
    commits: usize,
}

/// Data source whose fetches stay pending until the test resolves them
pub struct ScriptedSource {
    state: Rc<RefCell<ScriptedState>>,
}

/// Test-side view of a [`ScriptedSource`] after it was boxed into a controller
#[derive(Clone)]
pub struct SourceHandle {
    state: Rc<RefCell<ScriptedState>>,
}

impl ScriptedSource {
    pub fn new() -> (Self, SourceHandle) {
        let state = Rc::new(RefCell::new(ScriptedState::default()));
        (Self { state: Rc::clone(&state) }, SourceHandle { state })
    }
}

impl RemovalSink for ScriptedSource {
    fn mark_for_removal(&mut self, visit: &Visit) {
        self.state.borrow_mut().marked.push(visit.clone());
    }

    fn commit_removals(&mut self) {
        self.state.borrow_mut().commits += 1;
    }
}

impl ClusterSource for ScriptedSource {
    fn query(&mut self, query: &str, responder: FetchResponder) {
        let mut state = self.state.borrow_mut();
        state.requests.push(Request::Query(query.to_string()));
        state.pending.push(responder);
    }

    fn continue_query(&mut self, previous: &ResultPage, responder: FetchResponder) {
        let mut state = self.state.borrow_mut();
        state.requests.push(Request::Continue(previous.query.clone()));
        state.pending.push(responder);
    }
}

impl SourceHandle {
    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Resolve the most recently issued fetch
    pub fn resolve_latest(&self, page: ResultPage) {
        let responder = self.state.borrow_mut().pending.pop().expect("no pending fetch");
        responder.resolve(Ok(page));
    }

    /// Resolve the oldest outstanding fetch (possibly superseded)
    pub fn resolve_oldest(&self, page: ResultPage) {
        let responder = self.state.borrow_mut().pending.remove(0);
        responder.resolve(Ok(page));
    }

    pub fn reject_latest(&self) {
        let responder = self.state.borrow_mut().pending.pop().expect("no pending fetch");
        responder.resolve(Err(anyhow!("backend unavailable")));
    }

    pub fn oldest_is_cancelled(&self) -> bool {
        self.state.borrow().pending.first().is_some_and(FetchResponder::is_cancelled)
    }

    pub fn marked(&self) -> Vec<Visit> {
        self.state.borrow().marked.clone()
    }

    pub fn commits(&self) -> usize {
        self.state.borrow().commits
    }
}

/// Builder for clusters JSONL files
pub struct ClustersFileBuilder {
    lines: Vec<String>,
}

impl ClustersFileBuilder {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a cluster whose visits are titled after `titles`
    pub fn cluster(mut self, raw_label: &str, titles: &[&str]) -> Self {
        let visits: Vec<String> = titles
            .iter()
            .map(|title| {
                let url = format!("https://{}.example.com/{}", raw_label, title);
                format!(
                    r#"{{"title":"{}","raw_url":"{}","normalized_url":"{}","timestamp":1700000000000}}"#,
                    title, url, url
                )
            })
            .collect();
        self.lines.push(format!(
            r#"{{"raw_label":"{}","timestamp":1700000000000,"visits":[{}]}}"#,
            raw_label,
            visits.join(",")
        ));
        self
    }

    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(self) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create clusters file");
        for line in &self.lines {
            writeln!(file, "{}", line).expect("Failed to write clusters file");
        }
        file
    }
}

impl Default for ClustersFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
