//! Collapse and expand of expanded-mode groups.

use super::assembler::ResultAssembler;
use super::collaborators::SelectionTracker;
use crate::rows::{Divider, GroupKey, HeaderAction, RowModel};

/// Hide a group's children. Returns false if the group is unknown or already collapsed.
pub fn collapse(
    assembler: &mut ResultAssembler,
    rows: &mut RowModel,
    key: GroupKey,
    selection: &mut dyn SelectionTracker,
) -> bool {
    let Some(entry) = assembler.group_mut(key) else {
        return false;
    };
    if entry.is_collapsed() {
        return false;
    }
    let Some(header_idx) = rows.position(entry.header) else {
        return false;
    };

    // Children always sit directly below their header
    let start = header_idx + 1;
    let end = start + entry.children.len();
    let end = end.min(rows.len());
    for visit in rows.rows()[start..end].iter().filter_map(|row| row.visit()) {
        if selection.is_selected(visit) {
            selection.toggle(visit);
        }
    }

    let hidden = rows.remove_range(start..end);
    tracing::debug!(?key, hidden = hidden.len(), "collapsed group");
    entry.hidden = Some(hidden);

    rows.update(header_idx, |row| {
        row.set_header_action(HeaderAction::Expand);
        row.set_divider(Divider::THICK);
    });
    true
}

/// Re-insert a collapsed group's children. Returns false if there was nothing to expand.
pub fn expand(assembler: &mut ResultAssembler, rows: &mut RowModel, key: GroupKey) -> bool {
    let Some(entry) = assembler.group_mut(key) else {
        return false;
    };
    let Some(header_idx) = rows.position(entry.header) else {
        return false;
    };
    let Some(hidden) = entry.hidden.take() else {
        return false;
    };

    tracing::debug!(?key, restored = hidden.len(), "expanded group");
    rows.insert_many(header_idx + 1, hidden);
    rows.update(header_idx, |row| {
        row.set_header_action(HeaderAction::Collapse);
        row.set_divider(Divider::HIDDEN);
    });
    true
}

pub fn toggle(
    assembler: &mut ResultAssembler,
    rows: &mut RowModel,
    key: GroupKey,
    selection: &mut dyn SelectionTracker,
) -> bool {
    let collapsed = assembler.group(key).is_some_and(|entry| entry.is_collapsed());
    if collapsed {
        expand(assembler, rows, key)
    } else {
        collapse(assembler, rows, key, selection)
    }
}
