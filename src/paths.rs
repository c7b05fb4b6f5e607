//! Path resolution for plugsync
//!
//! Every location can be given explicitly (flag or `PLUGSYNC_*` environment
//! variable, handled by clap), set in the settings file, or left to the
//! defaults below.
//!
//! # Defaults
//!
//! - registry: `DATA/nvim/plugins/registry.json`
//! - install root: `CONFIG/nvim/pack/git-plugins/opt`
//! - loader: `CONFIG/nvim/lua/all.lua`
//! - plugin config files: `CONFIG/nvim/lua/plugins`
//! - settings: `CONFIG/plugsync/settings.toml`
//!
//! `CONFIG` is `XDG_CONFIG_HOME`, falling back to `~/.config` (`%APPDATA%`
//! on Windows). `DATA` is `XDG_DATA_HOME`, falling back to `~/.local/share`
//! (`%LOCALAPPDATA%` on Windows).

use crate::cli::PathArgs;
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Every location a command may touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub registry: PathBuf,
    pub install_dir: PathBuf,
    pub loader: PathBuf,
    /// Per-plugin Lua config files referenced by the loader
    pub plugin_configs: PathBuf,
}

impl Paths {
    /// Resolve with priority flag/env, then settings, then defaults
    pub fn resolve(args: &PathArgs, settings: &Settings) -> Result<Self> {
        let config = config_home()?;
        let data = data_home()?;
        Ok(Self::resolve_with(args, settings, &config, &data))
    }

    fn resolve_with(args: &PathArgs, settings: &Settings, config: &Path, data: &Path) -> Self {
        let pick = |flag: &Option<PathBuf>, setting: &Option<String>, default: PathBuf| {
            let path = match (flag, setting) {
                (Some(flag), _) => expand(&flag.to_string_lossy()),
                (None, Some(setting)) => expand(setting),
                (None, None) => default,
            };
            log::debug!("Resolved {}", path.display());
            path
        };

        let nvim = config.join("nvim");
        Self {
            registry: pick(
                &args.registry,
                &settings.registry,
                data.join("nvim").join("plugins").join("registry.json"),
            ),
            install_dir: pick(
                &args.install_dir,
                &settings.install_dir,
                nvim.join("pack").join("git-plugins").join("opt"),
            ),
            loader: pick(
                &args.loader,
                &settings.loader,
                nvim.join("lua").join("all.lua"),
            ),
            plugin_configs: nvim.join("lua").join("plugins"),
        }
    }
}

/// The settings file: explicit path, else `CONFIG/plugsync/settings.toml`
pub fn settings_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(expand(&path.to_string_lossy()));
    }
    Ok(config_home()?.join("plugsync").join("settings.toml"))
}

/// Base directory for configuration
pub fn config_home() -> Result<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        log::debug!("Using XDG_CONFIG_HOME: {xdg_config}");
        return Ok(PathBuf::from(xdg_config));
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config"))
}

/// Base directory for data files
pub fn data_home() -> Result<PathBuf> {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME")
        && !xdg_data.is_empty()
    {
        log::debug!("Using XDG_DATA_HOME: {xdg_data}");
        return Ok(PathBuf::from(xdg_data));
    }

    #[cfg(windows)]
    {
        if let Some(local) = dirs::data_local_dir() {
            return Ok(local);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".local").join("share"))
}

/// Expand `~` and environment variables in a path.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
