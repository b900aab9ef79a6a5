//! Turns fetched pages into rows.
//!
//! Owns the side tables that outlive a single page of the same query: suggestion headers by
//! raw label, and every expanded group's header and child rows. Both are cleared together
//! on a full reset.

use std::collections::HashMap;

use crate::models::{Group, QueryState, ResultPage, Visit};
use crate::rows::{
    Divider, GroupKey, HeaderAction, HighlightedText, Row, RowId, RowKind, RowModel,
};

/// Bookkeeping for one expanded group
#[derive(Debug)]
pub struct GroupEntry {
    pub group: Group,
    pub header: RowId,
    /// Child rows in display order (visits, then related searches)
    pub children: Vec<RowId>,
    /// The child rows while the group is collapsed
    pub hidden: Option<Vec<Row>>,
}

impl GroupEntry {
    pub fn is_collapsed(&self) -> bool {
        self.hidden.is_some()
    }

    /// A child row, wherever it currently lives
    pub fn child_row<'a>(&'a self, rows: &'a RowModel, id: RowId) -> Option<&'a Row> {
        match &self.hidden {
            Some(hidden) => hidden.iter().find(|row| row.id() == id),
            None => rows.find(id),
        }
    }

    /// Remove a child row from the model (or the hidden list) and from `children`
    pub fn remove_child(&mut self, rows: &mut RowModel, id: RowId) -> Option<Row> {
        self.children.retain(|child| *child != id);
        match &mut self.hidden {
            Some(hidden) => {
                let pos = hidden.iter().position(|row| row.id() == id)?;
                Some(hidden.remove(pos))
            }
            None => {
                let idx = rows.position(id)?;
                Some(rows.remove(idx))
            }
        }
    }

    pub fn set_child_divider(&mut self, rows: &mut RowModel, id: RowId, divider: Divider) {
        match &mut self.hidden {
            Some(hidden) => {
                if let Some(row) = hidden.iter_mut().find(|row| row.id() == id) {
                    row.set_divider(divider);
                }
            }
            None => {
                if let Some(idx) = rows.position(id) {
                    rows.set_divider(idx, divider);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct VisitSlot {
    visit: Visit,
    group: GroupKey,
    row: RowId,
}

/// Result of assembling one page
#[derive(Debug, Default)]
pub struct Assembled {
    pub appended: usize,
    /// Suggestion mode asks for the next page right away
    pub wants_prefetch: bool,
    /// `(row, url)` pairs for icon enrichment
    pub icon_requests: Vec<(RowId, String)>,
}

pub struct ResultAssembler {
    min_group_visits: usize,
    suggestions: HashMap<String, RowId>,
    groups: HashMap<GroupKey, GroupEntry>,
    visits: Vec<VisitSlot>,
    next_group: u64,
}

impl ResultAssembler {
    pub fn new(min_group_visits: usize) -> Self {
        Self {
            min_group_visits,
            suggestions: HashMap::new(),
            groups: HashMap::new(),
            visits: Vec::new(),
            next_group: 0,
        }
    }

    /// Forget everything assembled for the previous query
    pub fn reset(&mut self) {
        self.suggestions.clear();
        self.groups.clear();
        self.visits.clear();
    }

    pub fn group(&self, key: GroupKey) -> Option<&GroupEntry> {
        self.groups.get(&key)
    }

    pub fn group_mut(&mut self, key: GroupKey) -> Option<&mut GroupEntry> {
        self.groups.get_mut(&key)
    }

    pub fn remove_group(&mut self, key: GroupKey) -> Option<GroupEntry> {
        self.visits.retain(|slot| slot.group != key);
        self.groups.remove(&key)
    }

    pub fn suggestion_row(&self, raw_label: &str) -> Option<RowId> {
        self.suggestions.get(raw_label).copied()
    }

    /// Where a visit's row lives, if it is still in the list
    pub fn locate_visit(&self, visit: &Visit) -> Option<(GroupKey, RowId)> {
        self.visits.iter().find(|slot| slot.visit == *visit).map(|slot| (slot.group, slot.row))
    }

    pub fn forget_visit_row(&mut self, row: RowId) {
        self.visits.retain(|slot| slot.row != row);
    }

    /// A row hidden inside a collapsed group
    pub fn hidden_row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.groups
            .values_mut()
            .filter_map(|entry| entry.hidden.as_mut())
            .flat_map(|hidden| hidden.iter_mut())
            .find(|row| row.id() == id)
    }

    /// Append the rows for `page` in front of any footer rows
    pub fn assemble(
        &mut self,
        page: &ResultPage,
        query: &QueryState,
        rows: &mut RowModel,
    ) -> Assembled {
        if page.is_continuation && !page.groups.is_empty() {
            set_content_tail_divider(rows, true);
        }

        let insert_at = rows.content_end();
        let mut assembled = Assembled::default();
        let new_rows = if query.is_suggestion_mode() {
            assembled.wants_prefetch = page.can_load_more && !page.is_continuation;
            self.suggestion_rows(page, rows)
        } else {
            self.expanded_rows(page, rows, &mut assembled.icon_requests)
        };

        assembled.appended = new_rows.len();
        rows.insert_many(insert_at, new_rows);
        set_content_tail_divider(rows, page.can_load_more);

        tracing::debug!(
            query = %page.query,
            continuation = page.is_continuation,
            appended = assembled.appended,
            "assembled page"
        );
        assembled
    }

    fn suggestion_rows(&mut self, page: &ResultPage, rows: &mut RowModel) -> Vec<Row> {
        let mut new_rows: Vec<Row> = Vec::new();

        for (raw_label, count) in page.label_counts.iter() {
            let annotation = count_annotation(count);

            if let Some(existing) = self.suggestions.get(raw_label) {
                if let Some(idx) = rows.position(*existing) {
                    rows.update(idx, |row| row.set_annotation(annotation));
                } else if let Some(row) = new_rows.iter_mut().find(|row| row.id() == *existing) {
                    row.set_annotation(annotation);
                }
                continue;
            }

            let label = page
                .groups
                .iter()
                .find(|group| group.raw_label == raw_label)
                .map(|group| group.label.clone())
                .unwrap_or_else(|| {
                    tracing::warn!(raw_label, "no group carries this label; showing it raw");
                    raw_label.to_string()
                });

            let row = rows.create_row(RowKind::GroupHeader {
                group: None,
                label,
                raw_label: raw_label.to_string(),
                annotation: Some(annotation),
                action: HeaderAction::Search,
            });
            self.suggestions.insert(raw_label.to_string(), row.id());
            new_rows.push(row);
        }

        new_rows
    }

    fn expanded_rows(
        &mut self,
        page: &ResultPage,
        rows: &mut RowModel,
        icon_requests: &mut Vec<(RowId, String)>,
    ) -> Vec<Row> {
        let mut new_rows = Vec::new();

        for group in &page.groups {
            if group.visits().len() < self.min_group_visits {
                continue;
            }

            let key = GroupKey(self.next_group);
            self.next_group += 1;

            let header = rows.create_row(RowKind::GroupHeader {
                group: Some(key),
                label: group.label.clone(),
                raw_label: group.raw_label.clone(),
                annotation: None,
                action: HeaderAction::Collapse,
            });
            let header_id = header.id();
            new_rows.push(header);

            let mut children: Vec<Row> = Vec::with_capacity(group.visits().len() + 1);
            for visit in group.visits() {
                let row = rows.create_row(RowKind::Visit {
                    group: key,
                    visit: visit.clone(),
                    title: HighlightedText::new(&visit.title, &visit.title_match_ranges),
                    url: HighlightedText::new(&visit.display_url, &visit.url_match_ranges),
                    icon: None,
                });
                icon_requests.push((row.id(), visit.raw_url.clone()));
                self.visits.push(VisitSlot { visit: visit.clone(), group: key, row: row.id() });
                children.push(row);
            }

            if !group.related_searches.is_empty() {
                children.push(rows.create_row(RowKind::RelatedSearches {
                    group: key,
                    searches: group.related_searches.clone(),
                }));
            }

            if let Some(last) = children.last_mut() {
                last.set_divider(Divider::THICK);
            }

            self.groups.insert(
                key,
                GroupEntry {
                    group: group.clone(),
                    header: header_id,
                    children: children.iter().map(Row::id).collect(),
                    hidden: None,
                },
            );
            new_rows.extend(children);
        }

        new_rows
    }
}

/// Annotation shown on a suggestion header
pub fn count_annotation(count: usize) -> String {
    if count == 1 { "1 result".to_string() } else { format!("{} results", count) }
}

/// Set the divider on the last content row (skipping footers and the list header).
/// Returns the index of that row, if any.
pub fn set_content_tail_divider(rows: &mut RowModel, visible: bool) -> Option<usize> {
    let idx = rows.iter().rposition(Row::is_content)?;
    let divider = if visible { Divider::THICK } else { Divider::HIDDEN };
    rows.set_divider(idx, divider);
    Some(idx)
}
