//! # Registry
//!
//! The persisted list of editor plugins managed by plugsync.
//!
//! The registry is a small JSON document:
//!
//! ```json
//! {
//!   "plugins": [
//!     { "name": "plenary.nvim", "url": "https://github.com/nvim-lua/plenary.nvim" },
//!     { "name": "lualine.nvim", "url": "git@github.com:nvim-lualine/lualine.nvim", "pin": "v1.2.0" }
//!   ]
//! }
//! ```
//!
//! Records are kept sorted by name and written atomically.
//!
//! ## Example
//!
//! ```no_run
//! use registry::Registry;
//! use std::path::Path;
//!
//! let path = Path::new("registry.json");
//! let mut registry = Registry::load(path)?;
//! registry.set_pin("lualine.nvim", Some("v1.2.0"))?;
//! registry.save(path)?;
//! # Ok::<(), registry::Error>(())
//! ```

mod error;
mod types;

pub use error::{Error, Result};
pub use types::PluginRecord;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// On-disk shape of the registry
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    plugins: Vec<PluginRecord>,
}

/// All registered plugins, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    plugins: BTreeMap<String, PluginRecord>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting invalid and duplicate names
    pub fn from_records(records: impl IntoIterator<Item = PluginRecord>) -> Result<Self> {
        let mut registry = Self::new();
        for record in records {
            if registry.contains(&record.name) {
                return Err(Error::DuplicateName(record.name));
            }
            registry.insert(record)?;
        }
        Ok(registry)
    }

    /// Load the registry document at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Document =
            serde_json::from_str(&content).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let registry = Self::from_records(document.plugins)?;
        log::debug!(
            "Loaded {} plugins from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Write the registry to `path` via a sibling temp file and a rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let document = Document {
            plugins: self.plugins.values().cloned().collect(),
        };
        let mut content =
            serde_json::to_string_pretty(&document).map_err(|source| Error::Serialize {
                path: path.to_path_buf(),
                source,
            })?;
        content.push('\n');

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "registry.json".to_string());
        let tmp = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp, content).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        log::debug!("Saved {} plugins to {}", self.len(), path.display());
        Ok(())
    }

    /// Add or replace a record
    pub fn insert(&mut self, record: PluginRecord) -> Result<Option<PluginRecord>> {
        validate_name(&record.name)?;
        let mut record = record;
        record.pin = types::normalize_pin(record.pin.take());
        Ok(self.plugins.insert(record.name.clone(), record))
    }

    /// Number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Look up a record by name
    pub fn get(&self, name: &str) -> Option<&PluginRecord> {
        self.plugins.get(name)
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Records in name order
    pub fn records(&self) -> impl Iterator<Item = &PluginRecord> {
        self.plugins.values()
    }

    /// Registered names
    pub fn names(&self) -> BTreeSet<String> {
        self.plugins.keys().cloned().collect()
    }

    /// The records for `names`, or every record when `names` is empty.
    ///
    /// Any unknown name fails the whole selection.
    pub fn select(&self, names: &[String]) -> Result<Vec<PluginRecord>> {
        if names.is_empty() {
            return Ok(self.plugins.values().cloned().collect());
        }

        let mut selected = Vec::with_capacity(names.len());
        let mut seen = BTreeSet::new();
        for name in names {
            let record = self
                .get(name)
                .ok_or_else(|| Error::UnknownPlugin(name.clone()))?;
            if seen.insert(name.as_str()) {
                selected.push(record.clone());
            }
        }
        Ok(selected)
    }

    /// Freeze `name` to `pin`, or unfreeze it with `None` or an empty pin
    pub fn set_pin(&mut self, name: &str, pin: Option<&str>) -> Result<()> {
        let record = self
            .plugins
            .get_mut(name)
            .ok_or_else(|| Error::UnknownPlugin(name.to_string()))?;
        record.pin = types::normalize_pin(pin.map(str::to_string));
        Ok(())
    }
}

/// Check that `name` is usable as a single directory name
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        Err(Error::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Registry {
        Registry::from_records([
            PluginRecord::new("plugin1.nvim", "https://github.com/user/plugin1.nvim"),
            PluginRecord::new("plugin-a", "git@github.com:SomeUser/plugin-a").pinned("v1.2.0"),
            PluginRecord::new("other.nvim", "git@github.com:Other/other.nvim").disabled(),
        ])
        .unwrap()
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("registry.json");

        let registry = sample();
        registry.save(&path).unwrap();
        let loaded = Registry::load(&path).unwrap();

        assert_eq!(loaded, registry);
        assert!(!temp.path().join("nested").join(".registry.json.tmp").exists());
    }

    #[test]
    fn test_load_defaults_and_empty_pin() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");
        fs::write(
            &path,
            r#"{"plugins": [
                {"name": "a", "url": "https://example.com/a"},
                {"name": "b", "url": "https://example.com/b", "pin": ""}
            ]}"#,
        )
        .unwrap();

        let registry = Registry::load(&path).unwrap();
        let a = registry.get("a").unwrap();
        assert!(a.enabled);
        assert!(!a.colorscheme);
        assert!(!a.is_pinned());
        assert_eq!(registry.get("b").unwrap().pin, None);
    }

    #[test]
    fn test_duplicate_names_fail_to_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");
        fs::write(
            &path,
            r#"{"plugins": [
                {"name": "a", "url": "https://example.com/a"},
                {"name": "a", "url": "https://example.com/other"}
            ]}"#,
        )
        .unwrap();

        let err = Registry::load(&path).unwrap_err();
        assert!(matches!(err, Error::DuplicateName(name) if name == "a"));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            Registry::load(&missing).unwrap_err(),
            Error::Read { .. }
        ));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            Registry::load(&broken).unwrap_err(),
            Error::Parse { .. }
        ));
    }

    #[test]
    fn test_invalid_names_rejected() {
        for name in ["", "  ", ".", "..", "a/b", "a\\b"] {
            let result = Registry::from_records([PluginRecord::new(name, "x")]);
            assert!(
                matches!(result, Err(Error::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_select_all_in_name_order() {
        let registry = sample();
        let names: Vec<_> = registry
            .select(&[])
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["other.nvim", "plugin-a", "plugin1.nvim"]);
    }

    #[test]
    fn test_select_named_dedupes_and_rejects_unknown() {
        let registry = sample();
        let selected = registry
            .select(&["plugin-a".to_string(), "plugin-a".to_string()])
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].pin.as_deref(), Some("v1.2.0"));

        let err = registry.select(&["nope".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnknownPlugin(name) if name == "nope"));
    }

    #[test]
    fn test_set_pin_and_unpin() {
        let mut registry = sample();
        registry.set_pin("plugin1.nvim", Some("stable")).unwrap();
        assert_eq!(
            registry.get("plugin1.nvim").unwrap().pin.as_deref(),
            Some("stable")
        );

        registry.set_pin("plugin1.nvim", Some("")).unwrap();
        assert!(!registry.get("plugin1.nvim").unwrap().is_pinned());

        registry.set_pin("plugin-a", None).unwrap();
        assert!(!registry.get("plugin-a").unwrap().is_pinned());

        assert!(registry.set_pin("nope", Some("v1")).is_err());
    }

    #[test]
    fn test_serialize_error_is_not_reported_as_invalid_registry() {
        let source = serde_json::from_str::<Document>("{").unwrap_err();
        let err = Error::Serialize {
            path: "registry.json".into(),
            source,
        };
        let message = err.to_string();
        assert!(message.starts_with("unable to serialize registry registry.json"));
        assert!(!message.contains("invalid registry"));
    }

    #[test]
    fn test_saved_document_omits_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("registry.json");
        Registry::from_records([PluginRecord::new("a", "https://example.com/a")])
            .unwrap()
            .save(&path)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("pin"));
        assert!(!content.contains("colorscheme"));
        assert!(content.contains("\"enabled\": true"));
    }
}
