//! Data sources backed by a local clusters file.
//!
//! - [`LocalClusterSource`] - paginated fuzzy search over parsed groups
//! - [`GlyphIconFetcher`] - letter icons for visit rows

pub mod icons;
pub mod local;
pub mod matching;

pub use icons::GlyphIconFetcher;
pub use local::{DEFAULT_PAGE_SIZE, LocalClusterSource, build_page};
pub use matching::TextMatcher;
