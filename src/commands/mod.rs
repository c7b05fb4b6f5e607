pub mod check;
pub mod freeze;
pub mod rebuild;
pub mod revisions;
pub mod verify;

use crate::Context;
use crate::generator::{ConfigGenerator, PackLoader};
use crate::paths::{self, Paths};
use crate::settings::Settings;
use crate::ui;
use anyhow::{Context as AnyhowContext, Result};
use gitkit::{Client, GitCli};
use registry::Registry;

/// Settings, resolved locations and the loaded registry
pub struct Setup {
    pub settings: Settings,
    pub paths: Paths,
    pub registry: Registry,
}

impl Setup {
    /// Everything a command needs before it can start; any failure is fatal
    pub fn load(ctx: &Context) -> Result<Self> {
        let settings_path = paths::settings_file(ctx.paths.settings.as_deref())?;
        let settings = Settings::load(&settings_path)?;
        let paths = Paths::resolve(&ctx.paths, &settings)?;

        let registry = Registry::load(&paths.registry)
            .with_context(|| format!("Failed to load registry {}", paths.registry.display()))?;

        Ok(Self {
            settings,
            paths,
            registry,
        })
    }

    /// A git client honouring the configured time budget
    pub fn client(&self) -> Client {
        let cli = GitCli::new().with_timeout(self.settings.timeout());
        Client::with_backend(Box::new(cli))
    }

    pub fn loader(&self) -> PackLoader {
        PackLoader::new(&self.paths.loader, &self.paths.plugin_configs)
    }

    /// Rebuild the loader, reporting but not propagating failures
    pub fn rebuild_loader(&self) {
        if let Err(e) = self.loader().rebuild(&self.registry) {
            log::warn!("{e:#}");
            ui::error(&format!("Failed to rebuild configuration: {e:#}"));
        }
    }
}
