use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas: search box on top, rows and preview side by side, status line at the bottom
pub struct AppLayout {
    pub search_area: Rect,
    pub rows_area: Rect,
    pub preview_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(vertical[1]);

        Self {
            search_area: vertical[0],
            rows_area: main[0],
            preview_area: main[1],
            status_area: vertical[2],
        }
    }

    /// Rows visible in the list (inside its border)
    pub fn visible_rows(&self) -> usize {
        self.rows_area.height.saturating_sub(2) as usize
    }
}
