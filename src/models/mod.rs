//! Data models for clustered browsing history.
//!
//! - [`Visit`] - One visited page inside a cluster
//! - [`Group`] - A cluster: ordered visits, a label, optional related searches
//! - [`ResultPage`] - One page of groups returned by a data source
//! - [`QueryState`] - The query the list is showing results for
//!
//! Groups, visits and pages are immutable inputs produced by a data source. Custom
//! timestamp deserialization lives in the `parsers::deserializers` module.

pub mod group;
pub mod page;
pub mod query;
pub mod visit;

pub use group::{Group, quote_label};
pub use page::{LabelCounts, PageToken, ResultPage};
pub use query::QueryState;
pub use visit::{Duplicate, MatchRange, Visit};
