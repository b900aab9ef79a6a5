use std::fmt::Write;

use crate::rows::{DividerEmphasis, FooterState, HeaderAction, Row, RowKind};
use crate::utils::sanitize_line;

const SEPARATOR_WIDTH: usize = 40;

/// Render the row sequence as plain text, one line per row
pub fn format_rows(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{}", format_row(row));
        if row.divider().visible {
            let ch = match row.divider().emphasis {
                DividerEmphasis::Thick => "=",
                DividerEmphasis::Thin => "-",
            };
            let _ = writeln!(out, "{}", ch.repeat(SEPARATOR_WIDTH));
        }
    }
    out
}

fn format_row(row: &Row) -> String {
    match row.kind() {
        RowKind::Header { title } => format!("# {}", sanitize_line(title)),
        RowKind::GroupHeader { label, annotation, action, .. } => {
            let marker = match action {
                HeaderAction::Search => "?",
                HeaderAction::Collapse => "v",
                HeaderAction::Expand => ">",
            };
            match annotation {
                Some(annotation) => format!(
                    "{} {} ({})",
                    marker,
                    sanitize_line(label),
                    sanitize_line(annotation)
                ),
                None => format!("{} {}", marker, sanitize_line(label)),
            }
        }
        RowKind::Visit { title, url, .. } => {
            format!("    {} | {}", sanitize_line(&title.text), sanitize_line(&url.text))
        }
        RowKind::RelatedSearches { searches, .. } => {
            let searches: Vec<String> = searches.iter().map(|s| sanitize_line(s)).collect();
            format!("    related: {}", searches.join(", "))
        }
        RowKind::ProgressFooter(FooterState::Loading) => "    Loading\u{2026}".to_string(),
        RowKind::ProgressFooter(FooterState::Button) => "    [Load more]".to_string(),
        RowKind::EmptyState { text } => format!("    {}", sanitize_line(text)),
    }
}
