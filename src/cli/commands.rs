use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

use super::output::format_rows;
use crate::controller::{ClusterListController, ControllerConfig};
use crate::logging::{LogTarget, Verbosity, init_logging};
use crate::models::QueryState;
use crate::source::{DEFAULT_PAGE_SIZE, LocalClusterSource};
use crate::tui::{format_full_time, run_browse};
use crate::utils::{format_path_with_tilde, resolve_data_path};

/// Upper bound on waiting for a headless query to settle
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);
const SETTLE_POLL: Duration = Duration::from_millis(2);

#[derive(Parser)]
#[command(name = "history-clusters")]
#[command(version)]
#[command(about = "Browse and search clustered browsing history", long_about = None)]
pub struct Cli {
    /// Clusters file (JSONL, one cluster per line)
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by the list-driving commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Groups per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Delay before typed text becomes a query
    #[arg(long, default_value_t = 60)]
    pub debounce_ms: u64,

    /// Replace scroll pagination with a "Load more" row
    #[arg(long)]
    pub accessible: bool,
}

impl ListArgs {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            scroll_pagination_disabled: self.accessible,
            ..ControllerConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive browser
    Browse(ListArgs),
    /// Print the list for a query without a UI
    Query {
        /// Search text; omit for the topic suggestions
        text: Option<String>,

        /// Keep loading until there are no more pages
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Show statistics about the clusters file
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);

    // The browser owns the terminal, so it only ever logs to a file
    let target = match (&cli.command, &cli.log_file) {
        (_, Some(path)) => LogTarget::File(path.clone()),
        (Some(Commands::Browse(_)), None) => LogTarget::Off,
        _ => LogTarget::Stderr,
    };
    init_logging(verbosity, target)?;

    let data_path = || resolve_data_path(cli.data.as_deref());

    match &cli.command {
        Some(Commands::Browse(list)) => {
            let source = LocalClusterSource::from_file(&data_path()?)?.with_page_size(list.page_size);
            run_browse(list.controller_config(), Box::new(source))?;
        }
        Some(Commands::Query { text, all, list }) => {
            let state = match text {
                Some(text) => QueryState::searching(text.as_str()),
                None => QueryState::queryless(),
            };
            let output = run_query(&data_path()?, state, *all, list)?;
            print!("{}", output);
        }
        Some(Commands::Stats) => show_stats(&data_path()?)?,
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Drive a controller over `data_path` until it settles and render its rows as text
pub fn run_query(
    data_path: &Path,
    state: QueryState,
    all: bool,
    list: &ListArgs,
) -> Result<String> {
    let source = LocalClusterSource::from_file(data_path)?.with_page_size(list.page_size);
    let mut controller = ClusterListController::new(list.controller_config(), Box::new(source));

    controller.set_query_state(state);
    settle(&mut controller)?;

    while all && controller.can_load_more() {
        controller.on_load_more_clicked();
        settle(&mut controller)?;
    }

    let output = format_rows(controller.rows().rows());
    controller.teardown();
    Ok(output)
}

fn settle(controller: &mut ClusterListController) -> Result<()> {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    loop {
        let now = Instant::now();
        controller.tick(now);
        if controller.is_settled() {
            return Ok(());
        }
        if now >= deadline {
            bail!("Timed out waiting for results ({:?})", controller.phase());
        }
        thread::sleep(SETTLE_POLL);
    }
}

fn show_stats(data_path: &Path) -> Result<()> {
    let source = LocalClusterSource::from_file(data_path)?;
    let groups = source.groups();

    let visits: usize = groups.iter().map(|g| g.visits().len()).sum();
    let labels: HashSet<&str> = groups.iter().map(|g| g.raw_label.as_str()).collect();
    let timestamps = || groups.iter().flat_map(|g| g.visits()).map(|v| v.timestamp);

    println!("History Cluster Statistics");
    println!("==========================");
    println!("Clusters: {}", groups.len());
    println!("Visits: {}", visits);
    println!("Distinct topics: {}", labels.len());
    println!();
    println!("Data file: {}", format_path_with_tilde(data_path));

    let oldest = timestamps().min();
    let newest = timestamps().max();
    if let Some(oldest) = oldest {
        println!("Oldest visit: {}", format_full_time(&oldest));
    }
    if let Some(newest) = newest {
        println!("Newest visit: {}", format_full_time(&newest));
    }

    Ok(())
}
