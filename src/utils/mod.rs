pub mod environment;
pub mod paths;
pub mod terminal;
pub mod urls;

pub use environment::{DATA_PATH_ENV_VAR, resolve_data_path};
pub use paths::{format_path_with_tilde, validate_file_size};
pub use terminal::{sanitize_line, strip_ansi_codes};
pub use urls::{display_url_from_raw, host_of};
