use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::display_url_from_raw;

/// Half-open range of `char` offsets into the text it marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Clamp to a text of `len` chars, returning `None` if nothing remains
    pub fn clamped(&self, len: usize) -> Option<Self> {
        let start = self.start.min(len);
        let end = self.end.min(len);
        let clamped = Self { start, end };
        if clamped.is_empty() { None } else { Some(clamped) }
    }
}

/// Another visit to the same page folded into this one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duplicate {
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub url: String,
}

/// A single history visit inside a cluster.
///
/// `index_in_group` is assigned by [`Group::new`](super::Group::new) and never renumbered,
/// so it stays a stable reporting ordinal even after siblings are deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(default)]
    pub score: f32,
    pub normalized_url: String,
    #[serde(default)]
    pub display_url: String,
    pub title: String,
    pub raw_url: String,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub title_match_ranges: Vec<MatchRange>,
    #[serde(default)]
    pub url_match_ranges: Vec<MatchRange>,
    #[serde(default)]
    pub duplicates: Vec<Duplicate>,
    #[serde(skip)]
    index_in_group: usize,
}

impl Visit {
    pub fn new(title: impl Into<String>, raw_url: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let raw_url = raw_url.into();
        Self {
            score: 0.0,
            normalized_url: raw_url.clone(),
            display_url: display_url_from_raw(&raw_url),
            title: title.into(),
            raw_url,
            timestamp,
            title_match_ranges: Vec::new(),
            url_match_ranges: Vec::new(),
            duplicates: Vec::new(),
            index_in_group: 0,
        }
    }

    /// Position inside the owning group at construction time
    pub fn index_in_group(&self) -> usize {
        self.index_in_group
    }

    pub(super) fn assign_index(&mut self, index: usize) {
        self.index_in_group = index;
    }

    /// Fill in fields a data file is allowed to omit
    pub(crate) fn normalize(&mut self) {
        if self.display_url.is_empty() {
            self.display_url = display_url_from_raw(&self.raw_url);
        }
        if self.normalized_url.is_empty() {
            self.normalized_url = self.raw_url.clone();
        }
        self.score = self.score.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_match_range_clamped_inside() {
        let range = MatchRange::new(1, 3);
        assert_eq!(range.clamped(10), Some(MatchRange::new(1, 3)));
    }

    #[test]
    fn test_match_range_clamped_overflow() {
        let range = MatchRange::new(2, 20);
        assert_eq!(range.clamped(5), Some(MatchRange::new(2, 5)));
        assert_eq!(MatchRange::new(7, 9).clamped(5), None);
    }

    #[test]
    fn test_match_range_inverted_is_empty() {
        assert!(MatchRange::new(4, 2).is_empty());
        assert_eq!(MatchRange::new(4, 2).clamped(10), None);
    }

    #[test]
    fn test_visit_new_derives_display_url() {
        let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let visit = Visit::new("Cats", "https://www.example.com/cats%20and%20dogs", ts);
        assert_eq!(visit.display_url, "example.com/cats and dogs");
        assert_eq!(visit.normalized_url, "https://www.example.com/cats%20and%20dogs");
        assert_eq!(visit.index_in_group(), 0);
    }

    #[test]
    fn test_visit_deserialize_minimal() {
        let json = r#"{
            "normalized_url": "https://example.com/a",
            "title": "A page",
            "raw_url": "https://example.com/a?utm=1",
            "timestamp": 1762076480016
        }"#;

        let mut visit: Visit = serde_json::from_str(json).unwrap();
        visit.normalize();
        assert_eq!(visit.title, "A page");
        assert_eq!(visit.display_url, "example.com/a?utm=1");
        assert!(visit.title_match_ranges.is_empty());
        assert!(visit.duplicates.is_empty());
    }

    #[test]
    fn test_visit_normalize_clamps_score() {
        let ts = Utc.timestamp_opt(0, 0).unwrap();
        let mut visit = Visit::new("t", "https://a.test", ts);
        visit.score = 3.5;
        visit.normalize();
        assert_eq!(visit.score, 1.0);
    }
}
