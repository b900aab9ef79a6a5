use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};

use crate::models::{Group, MatchRange};

/// Fuzzy matcher for one query that reports matched char ranges
pub struct TextMatcher {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
    indices: Vec<u32>,
}

impl TextMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            pattern: Pattern::parse(query, CaseMatching::Smart, Normalization::Smart),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// `None` when `text` does not match, otherwise the highlighted ranges
    pub fn match_ranges(&mut self, text: &str) -> Option<Vec<MatchRange>> {
        self.indices.clear();
        let haystack = Utf32Str::new(text, &mut self.buf);
        self.pattern.indices(haystack, &mut self.matcher, &mut self.indices)?;
        Some(indices_to_ranges(&mut self.indices))
    }

    /// A copy of `group` annotated with match ranges, or `None` if nothing in it matched.
    ///
    /// A label match keeps every visit; otherwise only matching visits survive (with their
    /// original `index_in_group`).
    pub fn annotate(&mut self, group: &Group) -> Option<Group> {
        let mut group = group.clone();
        let label_ranges = self.match_ranges(&group.label);

        let mut hits = Vec::new();
        for visit in group.visits_mut() {
            let title = self.match_ranges(&visit.title);
            let url = self.match_ranges(&visit.display_url);
            if title.is_some() || url.is_some() {
                hits.push(visit.index_in_group());
            }
            visit.title_match_ranges = title.unwrap_or_default();
            visit.url_match_ranges = url.unwrap_or_default();
        }

        match label_ranges {
            Some(ranges) => group.match_ranges = ranges,
            None => {
                if hits.is_empty() {
                    return None;
                }
                group.retain_visits(|visit| hits.contains(&visit.index_in_group()));
            }
        }
        Some(group)
    }
}

/// Collapse matched char indices into sorted, contiguous ranges
pub fn indices_to_ranges(indices: &mut Vec<u32>) -> Vec<MatchRange> {
    indices.sort_unstable();
    indices.dedup();

    let mut ranges: Vec<MatchRange> = Vec::new();
    for &idx in indices.iter() {
        let idx = idx as usize;
        match ranges.last_mut() {
            Some(range) if range.end == idx => range.end += 1,
            _ => ranges.push(MatchRange::new(idx, idx + 1)),
        }
    }
    ranges
}
