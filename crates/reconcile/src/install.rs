//! The install root as an injected capability.
//!
//! Protocol and sweep logic only see the [`InstallDir`] trait, so tests can
//! substitute an in-memory directory set.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding one checkout per plugin
pub trait InstallDir: Send + Sync {
    /// The install root itself
    fn root(&self) -> &Path;

    /// Whether a directory for `name` exists
    fn contains(&self, name: &str) -> bool;

    /// Names of all directories directly under the root, sorted
    fn list(&self) -> io::Result<Vec<String>>;

    /// Delete the directory for `name` and everything in it
    fn remove(&self, name: &str) -> io::Result<()>;

    /// Path of the checkout for `name`
    fn path_of(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }
}

/// The real filesystem
#[derive(Debug, Clone)]
pub struct DiskInstallDir {
    root: PathBuf,
}

impl DiskInstallDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root if it does not exist yet
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }
}

impl InstallDir for DiskInstallDir {
    fn root(&self) -> &Path {
        &self.root
    }

    fn contains(&self, name: &str) -> bool {
        is_plain_name(name) && self.root.join(name).is_dir()
    }

    fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("Skipping non UTF-8 directory name {raw:?}"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        if !is_plain_name(name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to remove {name:?}"),
            ));
        }
        fs::remove_dir_all(self.root.join(name))
    }
}

/// A single, non-special path component
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
