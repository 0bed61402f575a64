//! config command - Print the effective configuration

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{load_config, Context};
use crate::core::config::Config;
use crate::ui::output;

/// Print the effective configuration, optionally saving it.
pub fn config(ctx: &Context, write: Option<&Path>) -> Result<()> {
    let config = load_config(ctx)?;
    let effective = config.effective();

    let text = toml::to_string_pretty(&effective).context("Failed to serialize config")?;
    print!("{}", text);

    if let Some(path) = write {
        Config::write_atomic(path, &effective)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        output::debug(format!("wrote {}", path.display()), ctx.verbosity);
    }
    Ok(())
}
