//! Removal of visit rows after the user deletes them.
//!
//! Only rows are touched here. Telling the data source, announcing the result, and
//! repairing the content tail are left to the caller.

use super::assembler::ResultAssembler;
use crate::models::Visit;
use crate::rows::{Divider, RowKind, RowModel};

/// Remove the rows for `visits` and return the visits that were actually found
pub fn delete_visits(
    assembler: &mut ResultAssembler,
    rows: &mut RowModel,
    visits: &[Visit],
) -> Vec<Visit> {
    let mut removed = Vec::new();

    for visit in visits {
        let Some((key, row_id)) = assembler.locate_visit(visit) else {
            tracing::debug!(url = %visit.raw_url, "visit not in list; skipping");
            continue;
        };
        assembler.forget_visit_row(row_id);

        let Some(entry) = assembler.group_mut(key) else {
            continue;
        };
        let Some(row) = entry.remove_child(rows, row_id) else {
            continue;
        };
        let had_divider = row.divider().visible;

        // A lone related-searches row is not worth keeping
        if let [only] = entry.children[..] {
            let is_related = entry
                .child_row(rows, only)
                .is_some_and(|row| matches!(row.kind(), RowKind::RelatedSearches { .. }));
            if is_related {
                entry.remove_child(rows, only);
            }
        }

        match entry.children.last().copied() {
            None => {
                let header = entry.header;
                if let Some(idx) = rows.position(header) {
                    rows.remove(idx);
                }
                assembler.remove_group(key);
                tracing::debug!(?key, "removed emptied group");
            }
            Some(last) if had_divider => entry.set_child_divider(rows, last, Divider::THICK),
            Some(_) => {}
        }

        removed.push(visit.clone());
    }

    removed
}
