use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable overriding the clusters data file location
pub const DATA_PATH_ENV_VAR: &str = "HISTORY_CLUSTERS_DATA";

const APP_DIR_NAME: &str = "history-clusters";
const DATA_FILE_NAME: &str = "clusters.jsonl";

/// Resolve the clusters data file: explicit path, then env var, then the platform data dir
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = env::var_os(DATA_PATH_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_dir().context("Could not determine the platform data directory")?;
    Ok(data_dir.join(APP_DIR_NAME).join(DATA_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = PathBuf::from("/tmp/explicit.jsonl");
        let resolved = resolve_data_path(Some(&path)).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn test_env_var_and_default_resolution() {
        // Save original value
        let original = env::var_os(DATA_PATH_ENV_VAR);

        // SAFETY: Setting environment variables in tests is safe as long as:
        // 1. Only this test touches this variable
        // 2. We restore the original value afterwards
        unsafe {
            env::set_var(DATA_PATH_ENV_VAR, "/custom/clusters.jsonl");
        }
        let resolved = resolve_data_path(None).unwrap();
        assert_eq!(resolved, PathBuf::from("/custom/clusters.jsonl"));

        unsafe {
            env::remove_var(DATA_PATH_ENV_VAR);
        }
        if let Ok(default) = resolve_data_path(None) {
            assert!(default.ends_with("history-clusters/clusters.jsonl"));
        }

        // Restore original value
        if let Some(value) = original {
            unsafe {
                env::set_var(DATA_PATH_ENV_VAR, value);
            }
        }
    }
}
