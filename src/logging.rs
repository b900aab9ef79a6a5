//! Tracing subscriber setup for the binary.
//!
//! Filter priority, highest first:
//!
//! 1. `HISTORY_CLUSTERS_LOG` (per-target directives, e.g. `history_clusters=debug,warn`)
//! 2. `RUST_LOG`
//! 3. CLI flags (`-v` debug, `-q` error)
//! 4. `warn`

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV_VAR: &str = "HISTORY_CLUSTERS_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// Verbose wins when both flags are given
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; used while the TUI owns the terminal
    File(PathBuf),
    /// No subscriber at all
    Off,
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(verbosity: Verbosity, target: LogTarget) -> Result<()> {
    let filter = build_env_filter(verbosity);

    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_ansi(use_ansi).without_time().compact())
                .try_init()
                .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(true))
                .try_init()
                .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
        }
    }
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // An unparseable HISTORY_CLUSTERS_LOG falls through rather than failing
    if let Ok(directives) = std::env::var(LOG_ENV_VAR)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = verbosity.default_level();
    let directive = if verbosity == Verbosity::Verbose {
        format!("{},history_clusters=debug", level)
    } else {
        level.to_string()
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
