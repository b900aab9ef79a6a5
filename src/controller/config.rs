use std::time::Duration;

/// Debounce applied to search text before a query is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(60);
/// Groups with fewer visits are not worth expanding
pub const DEFAULT_MIN_GROUP_VISITS: usize = 2;
pub const DEFAULT_EMPTY_STATE_TEXT: &str = "No results found";
pub const DEFAULT_ICON_SIZE_HINT: u16 = 16;

/// Tunables for [`ClusterListController`](super::ClusterListController)
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub debounce: Duration,
    pub min_group_visits: usize,
    /// Adds a `Header` row at the top of the list when set
    pub header_title: Option<String>,
    /// Used when the query state does not supply its own text
    pub empty_state_text: String,
    pub icon_size_hint: u16,
    /// Accessibility or external-keyboard mode: no scroll pagination, show a button instead
    pub scroll_pagination_disabled: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_group_visits: DEFAULT_MIN_GROUP_VISITS,
            header_title: None,
            empty_state_text: DEFAULT_EMPTY_STATE_TEXT.to_string(),
            icon_size_hint: DEFAULT_ICON_SIZE_HINT,
            scroll_pagination_disabled: false,
        }
    }
}
