/// What the list is currently showing results for.
///
/// Two queryless states are distinct: not searching at all (always with an empty query)
/// and searching with no text typed yet. The fields are private so the first state can
/// never carry a query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    query: String,
    empty_state_text: Option<String>,
    is_searching: bool,
}

impl QueryState {
    pub fn queryless() -> Self {
        Self::default()
    }

    pub fn searching(query: impl Into<String>) -> Self {
        Self { query: query.into(), empty_state_text: None, is_searching: true }
    }

    pub fn with_empty_state_text(mut self, text: impl Into<String>) -> Self {
        self.empty_state_text = Some(text.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn empty_state_text(&self) -> Option<&str> {
        self.empty_state_text.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    /// One row per distinct label instead of fully expanded groups
    pub fn is_suggestion_mode(&self) -> bool {
        !self.is_searching || self.query.is_empty()
    }
}
