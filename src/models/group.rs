use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::visit::{MatchRange, Visit};

/// A cluster of related visits.
///
/// Built through [`Group::new`] (or deserialization, which goes through it) so every visit
/// gets its `index_in_group` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroupRecord")]
pub struct Group {
    visits: Vec<Visit>,
    pub label: String,
    pub raw_label: String,
    pub match_ranges: Vec<MatchRange>,
    pub timestamp: DateTime<Utc>,
    pub related_searches: Vec<String>,
}

/// Wire shape of a group in a clusters file
#[derive(Debug, Deserialize)]
struct GroupRecord {
    visits: Vec<Visit>,
    #[serde(default)]
    label: String,
    raw_label: String,
    #[serde(default)]
    match_ranges: Vec<MatchRange>,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    related_searches: Vec<String>,
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        let label = if record.label.is_empty() {
            quote_label(&record.raw_label)
        } else {
            record.label
        };
        let mut group = Group::new(label, record.raw_label, record.timestamp, record.visits);
        group.match_ranges = record.match_ranges;
        group.related_searches = record.related_searches;
        group
    }
}

/// Wrap a raw label in typographic quotes, the way cluster labels are shown
pub fn quote_label(raw_label: &str) -> String {
    format!("\u{201C}{}\u{201D}", raw_label)
}

impl Group {
    pub fn new(
        label: impl Into<String>,
        raw_label: impl Into<String>,
        timestamp: DateTime<Utc>,
        visits: Vec<Visit>,
    ) -> Self {
        let visits = visits
            .into_iter()
            .enumerate()
            .map(|(idx, mut visit)| {
                visit.normalize();
                visit.assign_index(idx);
                visit
            })
            .collect();

        Self {
            visits,
            label: label.into(),
            raw_label: raw_label.into(),
            match_ranges: Vec::new(),
            timestamp,
            related_searches: Vec::new(),
        }
    }

    pub fn with_related_searches(mut self, searches: Vec<String>) -> Self {
        self.related_searches = searches;
        self
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Keep only visits matching `predicate`; survivors keep their original `index_in_group`
    pub fn retain_visits(&mut self, predicate: impl FnMut(&Visit) -> bool) {
        self.visits.retain(predicate);
    }

    /// Mutable access to visits for annotation (match ranges, scores), never for reordering
    pub fn visits_mut(&mut self) -> impl Iterator<Item = &mut Visit> {
        self.visits.iter_mut()
    }
}
