use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Optional `settings.toml`
///
/// ```toml
/// timeout_secs = 60
/// jobs = 8
/// clone_retries = 2
/// install_dir = "~/.config/nvim/pack/git-plugins/opt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Time budget for each git command
    pub timeout_secs: u64,

    /// Worker threads for `check`; 0 means one per plugin
    pub jobs: usize,

    /// Extra attempts for clones that fail with network errors
    pub clone_retries: usize,

    pub install_dir: Option<String>,
    pub registry: Option<String>,
    pub loader: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            jobs: 0,
            clone_retries: 0,
            install_dir: None,
            registry: None,
            loader: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read settings file: {}", path.display()))?;

        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in settings file: {}", path.display()))?;
        if settings.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1 in {}", path.display());
        }
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
