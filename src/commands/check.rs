use anyhow::{Context as AnyhowContext, Result};
use reconcile::{DiskInstallDir, Engine, Mode, Options};

use crate::Context;
use crate::cli::CheckArgs;
use crate::commands::Setup;
use crate::ui;

/// Reconcile the selected plugins, sweep orphans, and rebuild the loader
pub fn run(ctx: &Context, args: CheckArgs) -> Result<()> {
    let setup = Setup::load(ctx)?;
    let records = setup.registry.select(&args.names)?;

    let install = DiskInstallDir::new(&setup.paths.install_dir);
    install.ensure().with_context(|| {
        format!(
            "Failed to create install directory {}",
            setup.paths.install_dir.display()
        )
    })?;

    let options = Options {
        mode: Mode::Reconcile,
        jobs: args.jobs.unwrap_or(setup.settings.jobs),
        show_branch: args.branch,
        clone_retries: args.retries.unwrap_or(setup.settings.clone_retries),
        ..Options::default()
    };

    // the sweep compares against everything registered, not just the selection
    let registered = setup.registry.names();
    let registered = (!args.no_prune).then_some(&registered);

    let client = setup.client();
    let engine = Engine::new(&client, &install, options);
    let summary = engine.run(&records, registered, |report| ui::report(&report))?;

    log::info!(
        "{} cloned, {} ok, {} updated, {} errors, {} deleted",
        summary.cloned,
        summary.ok,
        summary.updated,
        summary.errors,
        summary.deleted
    );
    if !ctx.quiet && ctx.verbose > 0 && summary.errors == 0 && summary.sweep_failures == 0 {
        ui::success(&format!("{} plugins checked", summary.entries()));
    }

    setup.rebuild_loader();
    Ok(())
}
