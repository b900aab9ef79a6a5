// Interactive browser for clustered history
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
pub use app::App;
pub use timestamps::{format_full_time, format_visit_time};

use self::terminal::TerminalManager;
use crate::controller::{ClusterSource, ControllerConfig};

/// Run the interactive browser until the user quits
pub fn run_browse(config: ControllerConfig, source: Box<dyn ClusterSource>) -> Result<()> {
    let mut manager = TerminalManager::new()?;
    let mut app = App::new(config, source);

    let result = app.run(manager.terminal_mut());
    manager.restore()?;
    result
}
