//! layout command - Print diagram geometry as JSON

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{build_store, load_config, Context};
use crate::core::types::Orientation;
use crate::layout::{layout as compute, measure::MonospaceMeasurer};
use crate::ui::output;

/// Apply a script and print its layout.
pub fn layout(
    ctx: &Context,
    script: &Path,
    orientation: Option<Orientation>,
    compact: bool,
) -> Result<()> {
    let config = load_config(ctx)?;
    let mut store = build_store(&config, script)?;
    if let Some(orientation) = orientation {
        store.set_orientation(orientation);
    }

    let geometry = compute(&store, &config.layout_config(), &MonospaceMeasurer::default())
        .context("Failed to lay out graph")?;

    for path in geometry.degraded_paths() {
        output::warn(
            format!("path {} -> {} could not avoid every commit", path.from, path.to),
            ctx.verbosity,
        );
    }

    output::json(&geometry, !compact).context("Failed to write layout")?;
    Ok(())
}
