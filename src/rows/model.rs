use std::ops::Range;

use super::row::{Divider, Row, RowId, RowKind};

/// Structural change notification for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted { index: usize, count: usize },
    Removed { index: usize, count: usize },
    Changed { index: usize },
    Cleared,
}

/// Observable flat sequence of rows.
///
/// Holds no business logic. Every mutation is appended to a change log which the renderer
/// drains with [`RowModel::drain_changes`].
#[derive(Debug, Default)]
pub struct RowModel {
    rows: Vec<Row>,
    changes: Vec<ListChange>,
    next_id: u64,
}

impl RowModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row with a fresh id (not yet inserted)
    pub fn create_row(&mut self, kind: RowKind) -> Row {
        let id = RowId(self.next_id);
        self.next_id += 1;
        Row::new(id, kind)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn find(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn push(&mut self, row: Row) {
        let index = self.rows.len();
        self.insert(index, row);
    }

    pub fn insert(&mut self, index: usize, row: Row) {
        self.rows.insert(index, row);
        self.changes.push(ListChange::Inserted { index, count: 1 });
    }

    pub fn insert_many(&mut self, index: usize, rows: Vec<Row>) {
        let count = rows.len();
        if count == 0 {
            return;
        }
        self.rows.splice(index..index, rows);
        self.changes.push(ListChange::Inserted { index, count });
    }

    pub fn remove(&mut self, index: usize) -> Row {
        let row = self.rows.remove(index);
        self.changes.push(ListChange::Removed { index, count: 1 });
        row
    }

    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<Row> {
        let index = range.start;
        let removed: Vec<Row> = self.rows.drain(range).collect();
        if !removed.is_empty() {
            self.changes.push(ListChange::Removed { index, count: removed.len() });
        }
        removed
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.changes.push(ListChange::Cleared);
    }

    /// Mutate one row in place; no-op when out of bounds
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut Row)) {
        if let Some(row) = self.rows.get_mut(index) {
            f(row);
            self.changes.push(ListChange::Changed { index });
        }
    }

    pub fn set_divider(&mut self, index: usize, divider: Divider) {
        if self.rows.get(index).is_some_and(|row| row.divider() != divider) {
            self.update(index, |row| row.set_divider(divider));
        }
    }

    /// Index one past the last row that is not a footer row
    pub fn content_end(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| {
                !matches!(row.kind(), RowKind::ProgressFooter(_) | RowKind::EmptyState { .. })
            })
            .map_or(0, |idx| idx + 1)
    }

    pub fn drain_changes(&mut self) -> Vec<ListChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}
