use crate::models::{MatchRange, Visit};

/// Stable identity of a row for the lifetime of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub(crate) u64);

impl RowId {
    /// Reserved ids: these rows are removed and re-added wholesale, so they keep one identity
    pub const HEADER: RowId = RowId(u64::MAX);
    pub const PROGRESS_FOOTER: RowId = RowId(u64::MAX - 1);
    pub const EMPTY_STATE: RowId = RowId(u64::MAX - 2);
}

/// Identity of an assembled group (expanded mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerEmphasis {
    Thin,
    Thick,
}

/// Separator drawn below a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divider {
    pub visible: bool,
    pub emphasis: DividerEmphasis,
}

impl Divider {
    pub const HIDDEN: Divider = Divider { visible: false, emphasis: DividerEmphasis::Thin };
    pub const THICK: Divider = Divider { visible: true, emphasis: DividerEmphasis::Thick };
}

impl Default for Divider {
    fn default() -> Self {
        Divider::HIDDEN
    }
}

/// What activating a group header does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Suggestion mode: search for this label
    Search,
    /// Expanded mode, children visible
    Collapse,
    /// Expanded mode, children hidden
    Expand,
}

/// Sub-state of the progress footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterState {
    Loading,
    Button,
}

/// Text plus the char ranges to emphasize
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightedText {
    pub text: String,
    pub highlights: Vec<MatchRange>,
}

impl HighlightedText {
    /// Build from raw match ranges: clamped to the text, empty ranges dropped, sorted
    pub fn new(text: impl Into<String>, ranges: &[MatchRange]) -> Self {
        let text = text.into();
        let len = text.chars().count();
        let mut highlights: Vec<MatchRange> =
            ranges.iter().filter_map(|range| range.clamped(len)).collect();
        highlights.sort_by_key(|range| (range.start, range.end));
        Self { text, highlights }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), highlights: Vec::new() }
    }

    /// Split into `(segment, highlighted)` pieces, merging overlapping ranges
    pub fn segments(&self) -> Vec<(String, bool)> {
        let chars: Vec<char> = self.text.chars().collect();
        let mut marked = vec![false; chars.len()];
        for range in &self.highlights {
            for flag in &mut marked[range.start..range.end] {
                *flag = true;
            }
        }

        let mut segments: Vec<(String, bool)> = Vec::new();
        for (ch, flag) in chars.into_iter().zip(marked) {
            match segments.last_mut() {
                Some((segment, last_flag)) if *last_flag == flag => segment.push(ch),
                _ => segments.push((ch.to_string(), flag)),
            }
        }
        segments
    }
}

/// Display attribute delivered by the icon enrichment channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub glyph: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Header {
        title: String,
    },
    GroupHeader {
        group: Option<GroupKey>,
        label: String,
        raw_label: String,
        annotation: Option<String>,
        action: HeaderAction,
    },
    Visit {
        group: GroupKey,
        visit: Visit,
        title: HighlightedText,
        url: HighlightedText,
        icon: Option<Icon>,
    },
    RelatedSearches {
        group: GroupKey,
        searches: Vec<String>,
    },
    ProgressFooter(FooterState),
    EmptyState {
        text: String,
    },
}

/// One renderable unit of the flat list
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    kind: RowKind,
    divider: Divider,
}

impl Row {
    pub(crate) fn new(id: RowId, kind: RowKind) -> Self {
        Self { id, kind, divider: Divider::HIDDEN }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn kind(&self) -> &RowKind {
        &self.kind
    }

    pub fn divider(&self) -> Divider {
        self.divider
    }

    pub(crate) fn set_divider(&mut self, divider: Divider) {
        self.divider = divider;
    }

    /// Rows that take part in the content-tail divider rule
    pub fn is_content(&self) -> bool {
        matches!(
            self.kind,
            RowKind::GroupHeader { .. } | RowKind::Visit { .. } | RowKind::RelatedSearches { .. }
        )
    }

    pub fn visit(&self) -> Option<&Visit> {
        match &self.kind {
            RowKind::Visit { visit, .. } => Some(visit),
            _ => None,
        }
    }

    pub fn group_key(&self) -> Option<GroupKey> {
        match &self.kind {
            RowKind::GroupHeader { group, .. } => *group,
            RowKind::Visit { group, .. } | RowKind::RelatedSearches { group, .. } => Some(*group),
            _ => None,
        }
    }

    pub(crate) fn set_header_action(&mut self, new_action: HeaderAction) {
        if let RowKind::GroupHeader { action, .. } = &mut self.kind {
            *action = new_action;
        }
    }

    pub(crate) fn set_annotation(&mut self, text: String) {
        if let RowKind::GroupHeader { annotation, .. } = &mut self.kind {
            *annotation = Some(text);
        }
    }

    /// Only visit rows carry icons; returns whether the row accepted it
    pub(crate) fn set_icon(&mut self, new_icon: Icon) -> bool {
        match &mut self.kind {
            RowKind::Visit { icon, .. } => {
                *icon = Some(new_icon);
                true
            }
            _ => false,
        }
    }
}
