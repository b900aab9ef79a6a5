use serde::{Deserialize, Serialize};

use super::group::Group;

/// Opaque cursor a data source uses to produce the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageToken(pub usize);

/// Insertion-ordered `raw_label -> count` map with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    entries: Vec<(String, usize)>,
}

impl LabelCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update; an existing key keeps its position
    pub fn insert(&mut self, raw_label: impl Into<String>, count: usize) {
        let raw_label = raw_label.into();
        match self.entries.iter_mut().find(|(label, _)| *label == raw_label) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((raw_label, count)),
        }
    }

    pub fn get(&self, raw_label: &str) -> Option<usize> {
        self.entries.iter().find(|(label, _)| label == raw_label).map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for LabelCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = LabelCounts::new();
        for (label, count) in iter {
            counts.insert(label, count);
        }
        counts
    }
}

/// One page of results produced by a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub groups: Vec<Group>,
    pub label_counts: LabelCounts,
    pub query: String,
    pub can_load_more: bool,
    pub is_continuation: bool,
    #[serde(default)]
    pub next: Option<PageToken>,
}

impl ResultPage {
    pub fn new(query: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            groups,
            label_counts: LabelCounts::new(),
            query: query.into(),
            can_load_more: false,
            is_continuation: false,
            next: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_counts_preserve_insertion_order() {
        let counts: LabelCounts = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        let labels: Vec<&str> = counts.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_label_counts_update_keeps_position() {
        let mut counts = LabelCounts::new();
        counts.insert("cats", 3);
        counts.insert("dogs", 1);
        counts.insert("cats", 5);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("cats"), Some(5));
        assert_eq!(counts.iter().next(), Some(("cats", 5)));
    }
}
