//! JSONL parser for clusters data files
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI tools:
//!
//! - **Individual line failures**: Malformed JSON lines are logged with `tracing::warn!` and
//!   skipped, so a single bad cluster does not hide the rest of the history.
//!
//! - **Catastrophic failure detection**: If >50% of lines fail to parse, or if >100 consecutive
//!   errors occur, the parser returns an error instead of serving a mostly-empty data set.
//!
//! - **Error propagation**: Uses `anyhow::Result` with context at the I/O boundary.

pub mod clusters;
pub mod deserializers;

pub use clusters::{parse_clusters, parse_clusters_file};
