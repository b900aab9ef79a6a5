//! History Clusters - Browse and search clustered browsing history
//!
//! This library turns paginated, clustered browsing history into a flat list of renderable
//! rows and keeps that list consistent as the user searches, scrolls, collapses groups and
//! deletes visits. It provides:
//!
//! - Parsing clusters from a JSONL data file
//! - A local, fuzzy-matching data source that serves results a page at a time
//! - The poll-driven [`ClusterListController`] that owns the row sequence
//! - A terminal browser and a headless `query` command built on top of it
//!
//! # Example
//!
//! ```no_run
//! use history_clusters::{ClusterListController, ControllerConfig, LocalClusterSource, QueryState};
//! use std::path::Path;
//! use std::time::Instant;
//!
//! let source = LocalClusterSource::from_file(Path::new("/tmp/clusters.jsonl"))?;
//! let mut controller = ClusterListController::new(ControllerConfig::default(), Box::new(source));
//! controller.set_query_state(QueryState::searching("rust"));
//! while !controller.is_settled() {
//!     controller.tick(Instant::now());
//! }
//! println!("{} rows", controller.rows().len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod controller;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod rows;
pub mod source;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use controller::{ClusterListController, ClusterSource, ControllerConfig};
pub use models::{Group, QueryState, ResultPage, Visit};
pub use parsers::parse_clusters_file;
pub use rows::{Row, RowKind, RowModel};
pub use source::LocalClusterSource;
pub use utils::paths::format_path_with_tilde;
