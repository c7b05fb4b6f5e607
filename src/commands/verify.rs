use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use reconcile::{DiskInstallDir, InstallDir, sweep};
use registry::Registry;
use std::path::PathBuf;

use crate::Context;
use crate::cli::VerifyArgs;
use crate::commands::Setup;
use crate::ui;

/// Registry compared with the install root
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pub total: usize,
    pub on_disk: usize,
    /// Directories with no registered plugin
    pub orphans: Vec<String>,
    /// Registered plugins with no directory
    pub missing: Vec<String>,
    pub pinned: usize,
    pub disabled: usize,
    pub colorscheme: usize,
}

impl Inventory {
    pub fn collect(registry: &Registry, install: &dyn InstallDir) -> std::io::Result<Self> {
        let on_disk = install.list()?;
        let orphans = sweep::orphans(install, &registry.names())?;
        let missing = registry
            .records()
            .filter(|r| !on_disk.contains(&r.name))
            .map(|r| r.name.clone())
            .collect();

        Ok(Self {
            total: registry.len(),
            on_disk: on_disk.len(),
            orphans,
            missing,
            pinned: registry.records().filter(|r| r.is_pinned()).count(),
            disabled: registry.records().filter(|r| !r.enabled).count(),
            colorscheme: registry.records().filter(|r| r.colorscheme).count(),
        })
    }
}

pub fn run(ctx: &Context, args: VerifyArgs) -> Result<()> {
    let setup = Setup::load(ctx)?;
    let install = DiskInstallDir::new(&setup.paths.install_dir);

    let inventory = Inventory::collect(&setup.registry, &install).with_context(|| {
        format!(
            "Cannot read plugin directory {}",
            setup.paths.install_dir.display()
        )
    })?;

    ui::header("Plugins");
    ui::kv("total", &inventory.total.to_string());
    ui::kv("on-disk", &inventory.on_disk.to_string());
    if inventory.total != inventory.on_disk {
        println!("    - {} total should equal on-disk", "ERROR".red());
    }

    for name in &inventory.orphans {
        let path = install.path_of(name);
        print!("    - {} {name} [{}]", "INSTALLED".yellow(), path.display());
        if args.delete {
            match install.remove(name) {
                Ok(()) => print!("...REMOVING"),
                Err(e) => print!("...{} ({e})", "REMOVE FAILED".red()),
            }
        }
        println!();
    }
    for name in &inventory.missing {
        println!("    - {} {name}", "UNINSTALLED".yellow());
    }

    ui::kv("colorscheme", &inventory.colorscheme.to_string());
    ui::kv("disabled", &inventory.disabled.to_string());
    ui::kv("frozen", &inventory.pinned.to_string());

    let loader_dir = setup
        .paths
        .loader
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let required = [
        loader_dir,
        setup.paths.plugin_configs.clone(),
        setup.paths.install_dir.clone(),
    ];
    let missing_dirs: Vec<_> = required.iter().filter(|d| !d.is_dir()).collect();

    ui::header("Sanity check");
    if missing_dirs.is_empty() {
        ui::success("all directories present");
    } else {
        for dir in missing_dirs {
            ui::warn(&format!("{} is MISSING", dir.display()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry::PluginRecord;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inventory_counts() {
        let temp = TempDir::new().unwrap();
        for dir in ["a", "b", "orphan"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }
        let registry = Registry::from_records([
            PluginRecord::new("a", "https://example.com/a").pinned("v1"),
            PluginRecord::new("b", "https://example.com/b").disabled(),
            PluginRecord::new("c", "https://example.com/c"),
        ])
        .unwrap();

        let install = DiskInstallDir::new(temp.path());
        let inventory = Inventory::collect(&registry, &install).unwrap();

        assert_eq!(
            inventory,
            Inventory {
                total: 3,
                on_disk: 3,
                orphans: vec!["orphan".to_string()],
                missing: vec!["c".to_string()],
                pinned: 1,
                disabled: 1,
                colorscheme: 0,
            }
        );
    }
}
