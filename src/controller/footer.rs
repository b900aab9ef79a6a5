use crate::models::ResultPage;
use crate::rows::{FooterState, Row, RowId, RowKind, RowModel};

/// Inputs the footer rows are derived from
#[derive(Debug, Clone, Copy)]
pub struct FooterInputs<'a> {
    pub fetch_in_flight: bool,
    pub can_load_more: bool,
    pub last_result: Option<&'a ResultPage>,
    pub scroll_pagination_disabled: bool,
    pub is_searching: bool,
}

/// Which footer rows should be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterPlan {
    pub progress: Option<FooterState>,
    pub show_empty: bool,
}

impl FooterPlan {
    pub fn derive(inputs: &FooterInputs<'_>) -> Self {
        let show_spinner = inputs.fetch_in_flight;
        let show_button =
            !inputs.fetch_in_flight && inputs.can_load_more && inputs.scroll_pagination_disabled;
        // Only an empty first page means "no results"; an empty continuation just ends the list
        let show_empty = inputs.is_searching
            && inputs
                .last_result
                .is_some_and(|page| !page.is_continuation && page.groups.is_empty());

        let progress = if show_spinner {
            Some(FooterState::Loading)
        } else if show_button {
            Some(FooterState::Button)
        } else {
            None
        };

        Self { progress, show_empty }
    }
}

/// Remove any footer rows and re-add the ones `plan` calls for.
///
/// Both rows use reserved ids, so applying the same plan twice leaves the same rows.
pub fn reconcile_footer(rows: &mut RowModel, plan: FooterPlan, empty_text: &str) {
    for id in [RowId::PROGRESS_FOOTER, RowId::EMPTY_STATE] {
        if let Some(idx) = rows.position(id) {
            rows.remove(idx);
        }
    }

    if plan.show_empty {
        rows.push(Row::new(RowId::EMPTY_STATE, RowKind::EmptyState { text: empty_text.to_string() }));
    }
    if let Some(state) = plan.progress {
        rows.push(Row::new(RowId::PROGRESS_FOOTER, RowKind::ProgressFooter(state)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_inputs(page: Option<&ResultPage>) -> FooterInputs<'_> {
        FooterInputs {
            fetch_in_flight: false,
            can_load_more: false,
            last_result: page,
            scroll_pagination_disabled: false,
            is_searching: true,
        }
    }

    #[test]
    fn test_spinner_while_fetching() {
        let inputs = FooterInputs { fetch_in_flight: true, ..create_test_inputs(None) };
        assert_eq!(
            FooterPlan::derive(&inputs),
            FooterPlan { progress: Some(FooterState::Loading), show_empty: false }
        );
    }

    #[test]
    fn test_button_only_when_scroll_pagination_disabled() {
        let scrolling = FooterInputs { can_load_more: true, ..create_test_inputs(None) };
        assert_eq!(FooterPlan::derive(&scrolling).progress, None);

        let button = FooterInputs { scroll_pagination_disabled: true, ..scrolling };
        assert_eq!(FooterPlan::derive(&button).progress, Some(FooterState::Button));
    }

    #[test]
    fn test_empty_state_needs_empty_first_page() {
        let empty = ResultPage::new("zzz", vec![]);
        assert!(FooterPlan::derive(&create_test_inputs(Some(&empty))).show_empty);

        let not_searching = FooterInputs { is_searching: false, ..create_test_inputs(Some(&empty)) };
        assert!(!FooterPlan::derive(&not_searching).show_empty);

        let mut continuation = ResultPage::new("zzz", vec![]);
        continuation.is_continuation = true;
        assert!(!FooterPlan::derive(&create_test_inputs(Some(&continuation))).show_empty);

        // No result yet is not the same as an empty result
        assert!(!FooterPlan::derive(&create_test_inputs(None)).show_empty);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut rows = RowModel::new();
        let plan = FooterPlan { progress: Some(FooterState::Button), show_empty: true };

        reconcile_footer(&mut rows, plan, "No results");
        let first: Vec<Row> = rows.rows().to_vec();
        reconcile_footer(&mut rows, plan, "No results");

        assert_eq!(rows.rows(), first.as_slice());
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows.get(0).unwrap().kind(), RowKind::EmptyState { .. }));
        assert!(matches!(rows.get(1).unwrap().kind(), RowKind::ProgressFooter(FooterState::Button)));
    }

    #[test]
    fn test_reconcile_removes_stale_footer() {
        let mut rows = RowModel::new();
        reconcile_footer(&mut rows, FooterPlan { progress: Some(FooterState::Loading), show_empty: false }, "");
        reconcile_footer(&mut rows, FooterPlan { progress: None, show_empty: false }, "");
        assert!(rows.is_empty());
    }
}
