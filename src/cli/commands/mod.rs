//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration from the context
//! 2. Builds a fresh store and applies the script, if any
//! 3. Formats and displays output
//!
//! Every script gets its own store; nothing is shared between invocations.

mod check;
mod completion;
mod config_cmd;
mod layout;

pub use check::check;
pub use completion::completion;
pub use config_cmd::config;
pub use layout::layout;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::args::Command;
use crate::core::config::Config;
use crate::core::ops::Script;
use crate::core::store::GraphStore;
use crate::ui::output::{self, Verbosity};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Config file given with `--config`
    pub config_path: Option<PathBuf>,
    /// Output verbosity
    pub verbosity: Verbosity,
}

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Layout {
            script,
            orientation,
            compact,
        } => layout::layout(ctx, &script, orientation.map(Into::into), compact),
        Command::Check { script } => check::check(ctx, &script),
        Command::Config { write } => config_cmd::config(ctx, write.as_deref()),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load the configuration, reporting any warnings.
fn load_config(ctx: &Context) -> Result<Config> {
    let loaded = Config::load(ctx.config_path.as_deref()).context("Failed to load config")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            ctx.verbosity,
        );
    }
    if let Some(path) = loaded.config.loaded_from() {
        output::debug(format!("config: {}", path.display()), ctx.verbosity);
    }
    Ok(loaded.config)
}

/// Build a fresh store from the config and apply a script to it.
fn build_store(config: &Config, path: &Path) -> Result<GraphStore> {
    let script = Script::load(path)?;
    let mut store = config.new_store();
    script
        .apply(&mut store)
        .with_context(|| format!("Failed to apply '{}'", path.display()))?;
    Ok(store)
}
