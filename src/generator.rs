//! Loader file generation
//!
//! After the registry changes, the editor's loader file is rebuilt so that
//! enabled plugins are added to the runtime path and their config modules
//! are required.

use anyhow::{Context, Result};
use registry::{PluginRecord, Registry};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Something that regenerates editor configuration from the registry
pub trait ConfigGenerator {
    fn rebuild(&self, registry: &Registry) -> Result<()>;
}

/// Writes a Lua file of `packadd!` lines plus per-plugin `require`s
#[derive(Debug, Clone)]
pub struct PackLoader {
    path: PathBuf,
    plugin_configs: PathBuf,
}

impl PackLoader {
    pub fn new(path: impl Into<PathBuf>, plugin_configs: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            plugin_configs: plugin_configs.into(),
        }
    }

    /// Loader contents for `registry`
    pub fn render(&self, registry: &Registry) -> String {
        let mut out = String::from("-- load plugins\nvim.cmd[[\n");
        for record in registry.records() {
            if record.enabled {
                let _ = writeln!(out, "packadd! {}", record.name);
            } else {
                let _ = writeln!(out, "\" packadd! {}", record.name);
            }
        }
        out.push_str("]]\n\n-- config files\n");

        for record in registry.records() {
            let module = module_name(&record.name);
            if record.enabled && self.has_config(record) {
                let _ = writeln!(out, "require'plugins.{module}'");
            } else {
                let _ = writeln!(out, "-- require'plugins.{module}'");
            }
        }
        out
    }

    /// Config file for `record`: `PLUGIN_CONFIGS/<module>.lua`
    pub fn config_path(&self, record: &PluginRecord) -> PathBuf {
        self.plugin_configs
            .join(format!("{}.lua", module_name(&record.name)))
    }

    fn has_config(&self, record: &PluginRecord) -> bool {
        fs::metadata(self.config_path(record)).is_ok_and(|m| m.is_file() && m.len() > 0)
    }
}

impl ConfigGenerator for PackLoader {
    fn rebuild(&self, registry: &Registry) -> Result<()> {
        let content = self.render(registry);
        write_atomic(&self.path, &content)
            .with_context(|| format!("Failed to write loader {}", self.path.display()))?;
        log::debug!(
            "Wrote loader for {} plugins to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Lua module name for a plugin: dots become dashes
fn module_name(name: &str) -> String {
    name.replace('.', "-")
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "all.lua".to_string());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&tmp, content)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}
