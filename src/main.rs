//! citview - Terminal workspace browser for the cit version tool
//!
//! Browses a workspace directory as a lazily expanded tree and drives the
//! external `cit` tool (init, add, commit, switch) on the selected entry.
//!
//! # Usage
//!
//! ```bash
//! citview                        # Browse the current directory
//! citview /path/to/workspace     # Browse another directory
//! citview --tool ./bin/cit       # Use a different tool binary
//! ```

mod app;
mod cit;
mod config;
mod logging;
mod prompt;
mod ui;
mod workspace;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::config::Config;

/// Terminal workspace browser for the cit version tool
#[derive(Parser, Debug)]
#[command(name = "citview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workspace directory (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Tool executable to run (overrides the config file)
    #[arg(short, long)]
    tool: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the platform data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve the workspace path
    let workspace = args.path.canonicalize()
        .unwrap_or_else(|_| args.path.clone());

    let log_file = logging::init(args.log_file.as_deref())?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(tool) = args.tool {
        config.tool = tool;
    }

    info!(
        workspace = %workspace.display(),
        tool = %config.tool,
        log_file = ?log_file,
        "starting citview"
    );

    // Create and run the application
    let mut app = app::App::new(workspace, config)?;
    app.run()?;

    Ok(())
}
