//! The flat, renderable row sequence.
//!
//! [`RowModel`] is a thin observable `Vec<Row>`: indexed insert, remove, range-remove and
//! clear, each recorded as a [`ListChange`]. All topology decisions live in the controller.

pub mod model;
pub mod row;

pub use model::{ListChange, RowModel};
pub use row::{
    Divider, DividerEmphasis, FooterState, GroupKey, HeaderAction, HighlightedText, Icon, Row,
    RowId, RowKind,
};
