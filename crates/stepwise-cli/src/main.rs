//! Stepwise CLI application
//!
//! Runs chain-of-thought reasoning sessions from the terminal.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/stepwise-cli
//! ```
//!
//! # Commands
//!
//! - `stepwise ask "<query>"` streams each reasoning step as it arrives,
//!   then the final answer and the total thinking time.
//! - `stepwise config show` lists the settings from `.env` with keys masked.
//! - `stepwise config set KEY VALUE` persists a setting to `.env`.
//!
//! Logs go to stderr (`RUST_LOG` controls the level) and to
//! `logs/stepwise_<timestamp>.log` unless `--no-log-file` is given.

// Allow common clippy lints that are stylistic preferences
#![allow(clippy::collapsible_if)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::too_many_arguments)]

mod args;
mod backend;
mod commands;
mod console;
mod logging;
mod render;
mod router;

use crate::args::Cli;
use crate::console::CLIConsole;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = (!cli.no_log_file).then_some(cli.log_dir.as_path());
    let log_path = logging::init(cli.verbose, log_dir)?;
    tracing::info!(log_file = ?log_path, "starting stepwise");

    match router::route(&cli).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            tracing::error!(error = %e, "fatal error, exiting");
            CLIConsole::new(true).error(&e.to_string());
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            Err(e.into())
        }
    }
}
