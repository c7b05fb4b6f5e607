use anyhow::{Context as AnyhowContext, Result};

use crate::Context;
use crate::commands::Setup;
use crate::generator::ConfigGenerator;
use crate::ui;

/// Regenerate the loader without touching any checkout
pub fn run(ctx: &Context) -> Result<()> {
    let setup = Setup::load(ctx)?;

    setup
        .loader()
        .rebuild(&setup.registry)
        .context("Failed to rebuild configuration")?;

    if !ctx.quiet {
        ui::success(&format!(
            "Wrote {} ({} plugins)",
            setup.paths.loader.display(),
            setup.registry.len()
        ));
    }
    Ok(())
}
