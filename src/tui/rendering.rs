use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{MessageType, StatusMessage};
use super::layout::AppLayout;
use super::timestamps::{format_full_time, format_visit_time};
use crate::controller::{QueryPhase, SelectionTracker};
use crate::rows::{
    DividerEmphasis, FooterState, HeaderAction, HighlightedText, Row, RowKind,
};
use crate::utils::sanitize_line;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const MATCH: Color = Color::Rgb(250, 204, 21);
const ERROR: Color = Color::Rgb(239, 68, 68);
const BAR: Color = Color::Rgb(24, 24, 27);

/// Everything a frame needs, borrowed from the app
pub struct RenderState<'a> {
    pub rows: &'a [Row],
    pub selected_idx: usize,
    pub search_query: &'a str,
    pub searching: bool,
    pub phase: QueryPhase,
    pub selection: &'a dyn SelectionTracker,
    /// Label of the group the selected row belongs to
    pub group_label: Option<&'a str>,
    pub status_message: Option<&'a StatusMessage>,
}

pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_search_box(frame, layout.search_area, state);
    render_rows(frame, layout.rows_area, state);
    render_preview(frame, layout.preview_area, state);
    render_status_bar(frame, layout.status_area, state);
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(title)
}

fn render_search_box(frame: &mut Frame, area: Rect, state: &RenderState) {
    let text = if state.searching {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(MUTED)),
            Span::styled(sanitize_line(state.search_query), Style::default().fg(BRIGHT)),
            Span::styled("_", Style::default().fg(ACCENT)),
        ])
    } else {
        Line::from(Span::styled("Type to search your history", Style::default().fg(MUTED)))
    };
    frame.render_widget(Paragraph::new(text).block(bordered(" History ")), area);
}

fn render_rows(frame: &mut Frame, area: Rect, state: &RenderState) {
    let inner_width = area.width.saturating_sub(2);
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| {
            let checked = row.visit().is_some_and(|visit| state.selection.is_selected(visit));
            row_item(row, checked, inner_width)
        })
        .collect();

    let list = List::new(items)
        .block(bordered(" Results "))
        .highlight_style(Style::default().bg(ACCENT).fg(BRIGHT).add_modifier(Modifier::BOLD));

    let selected = (!state.rows.is_empty()).then_some(state.selected_idx);
    let mut list_state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// One row, plus its separator line when the divider is visible
pub fn row_item(row: &Row, checked: bool, width: u16) -> ListItem<'static> {
    let mut lines = vec![row_line(row, checked)];
    if row.divider().visible {
        let ch = match row.divider().emphasis {
            DividerEmphasis::Thick => "━",
            DividerEmphasis::Thin => "─",
        };
        lines.push(Line::from(Span::styled(ch.repeat(width as usize), Style::default().fg(MUTED))));
    }
    ListItem::new(Text::from(lines))
}

fn row_line(row: &Row, checked: bool) -> Line<'static> {
    match row.kind() {
        RowKind::Header { title } => Line::from(Span::styled(
            sanitize_line(title),
            Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        RowKind::GroupHeader { label, annotation, action, .. } => {
            let marker = match action {
                HeaderAction::Search => "› ",
                HeaderAction::Collapse => "▾ ",
                HeaderAction::Expand => "▸ ",
            };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(ACCENT)),
                Span::styled(sanitize_line(label), Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD)),
            ];
            if let Some(annotation) = annotation {
                spans.push(Span::styled(format!("  {}", annotation), Style::default().fg(MUTED)));
            }
            Line::from(spans)
        }
        RowKind::Visit { visit, title, url, icon, .. } => {
            let mut spans = vec![Span::raw(if checked { "  [x] " } else { "  [ ] " })];
            let glyph = icon.as_ref().map(|icon| icon.glyph.as_str()).unwrap_or("·");
            spans.push(Span::styled(format!("{} ", glyph), Style::default().fg(ACCENT)));
            spans.extend(highlighted_spans(title, Style::default().fg(BRIGHT)));
            spans.push(Span::styled("  ", Style::default()));
            spans.extend(highlighted_spans(url, Style::default().fg(MUTED)));
            spans.push(Span::styled(
                format!("  {}", format_visit_time(&visit.timestamp)),
                Style::default().fg(MUTED),
            ));
            Line::from(spans)
        }
        RowKind::RelatedSearches { searches, .. } => {
            let joined: Vec<String> = searches.iter().map(|s| sanitize_line(s)).collect();
            Line::from(vec![
                Span::styled("  Related: ", Style::default().fg(MUTED)),
                Span::styled(joined.join(" · "), Style::default().fg(ACCENT)),
            ])
        }
        RowKind::ProgressFooter(FooterState::Loading) => {
            Line::from(Span::styled("  Loading…", Style::default().fg(MUTED)))
        }
        RowKind::ProgressFooter(FooterState::Button) => Line::from(Span::styled(
            "  [ Load more ]",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        RowKind::EmptyState { text } => {
            Line::from(Span::styled(format!("  {}", sanitize_line(text)), Style::default().fg(MUTED)))
        }
    }
}

fn highlighted_spans(text: &HighlightedText, base: Style) -> Vec<Span<'static>> {
    text.segments()
        .into_iter()
        .map(|(segment, highlighted)| {
            let style = if highlighted {
                base.fg(MATCH).add_modifier(Modifier::BOLD)
            } else {
                base
            };
            Span::styled(sanitize_line(&segment), style)
        })
        .collect()
}

fn field(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(MUTED)),
        Span::raw(value),
    ])
}

fn render_preview(frame: &mut Frame, area: Rect, state: &RenderState) {
    let row = state.rows.get(state.selected_idx);
    let lines: Vec<Line> = match row.map(Row::kind) {
        Some(RowKind::Visit { visit, .. }) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    sanitize_line(&visit.title),
                    Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                field("URL", sanitize_line(&visit.raw_url)),
                field("Visited", format_full_time(&visit.timestamp)),
            ];
            if let Some(label) = state.group_label {
                lines.push(field("Cluster", sanitize_line(label)));
            }
            if !visit.duplicates.is_empty() {
                lines.push(field("Also visited", format!("{} more times", visit.duplicates.len())));
            }
            lines
        }
        Some(RowKind::GroupHeader { label, raw_label, action, .. }) => {
            let hint = match action {
                HeaderAction::Search => "Enter: search this topic",
                HeaderAction::Collapse => "Enter: collapse",
                HeaderAction::Expand => "Enter: expand",
            };
            vec![
                Line::from(Span::styled(
                    sanitize_line(label),
                    Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
                )),
                field("Topic", sanitize_line(raw_label)),
                Line::from(""),
                Line::from(Span::styled(hint, Style::default().fg(MUTED))),
            ]
        }
        Some(RowKind::RelatedSearches { searches, .. }) => {
            let mut lines = vec![Line::from(Span::styled("Related searches", Style::default().fg(MUTED)))];
            lines.extend(searches.iter().map(|s| Line::from(format!("  {}", sanitize_line(s)))));
            lines
        }
        Some(RowKind::ProgressFooter(FooterState::Button)) => {
            vec![Line::from("Enter: load more results")]
        }
        _ => vec![Line::from(Span::styled("Nothing selected", Style::default().fg(MUTED)))],
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(bordered(" Preview "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    if let Some(message) = state.status_message {
        let fg = match message.message_type {
            MessageType::Success => BRIGHT,
            MessageType::Error => ERROR,
        };
        let paragraph =
            Paragraph::new(format!(" {} ", message.text)).style(Style::default().fg(fg).bg(BAR));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut parts = Vec::new();
    parts.push(if state.searching { "[SEARCH]".to_string() } else { "[BROWSE]".to_string() });
    match state.phase {
        QueryPhase::Debouncing | QueryPhase::Fetching => parts.push("searching…".to_string()),
        QueryPhase::FetchingMore => parts.push("loading more…".to_string()),
        QueryPhase::Idle => {}
    }
    let selected = state.selection.selected_items().len();
    if selected > 0 {
        parts.push(format!("{} selected", selected));
    }
    parts.push("Tab: select".to_string());
    parts.push("Ctrl+D: delete".to_string());
    parts.push("Ctrl+Y: copy URL".to_string());
    parts.push(if state.searching { "Esc: end search" } else { "Esc: quit" }.to_string());

    let paragraph =
        Paragraph::new(format!(" {} ", parts.join(" | "))).style(Style::default().fg(BRIGHT).bg(BAR));
    frame.render_widget(paragraph, area);
}
