use anyhow::Result;
use reconcile::{DiskInstallDir, Engine, Mode, Options};

use crate::Context;
use crate::cli::RevisionsArgs;
use crate::commands::Setup;
use crate::ui;

/// Print `NAME COMMIT` for every selected plugin
pub fn run(ctx: &Context, args: RevisionsArgs) -> Result<()> {
    let setup = Setup::load(ctx)?;
    let records = setup.registry.select(&args.names)?;

    let install = DiskInstallDir::new(&setup.paths.install_dir);
    let options = Options {
        mode: Mode::Revisions,
        jobs: args.jobs.unwrap_or(setup.settings.jobs),
        ..Options::default()
    };

    let client = setup.client();
    Engine::new(&client, &install, options).run(&records, None, |report| ui::report(&report))?;
    Ok(())
}
