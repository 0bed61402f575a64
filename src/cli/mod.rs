//! cli
//!
//! Command-line interface layer for gitgraph.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It builds a [`commands::Context`] from the flags
//! and dispatches. Graph state is only ever changed through the store's
//! operations, driven by a script.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::ui::{logging, output::Verbosity};
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = commands::Context {
        config_path: cli.config.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };
    logging::init(ctx.verbosity);

    commands::dispatch(cli.command, &ctx)
}
