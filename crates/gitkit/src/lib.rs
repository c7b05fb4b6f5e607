//! # gitkit
//!
//! A thin, synchronous wrapper around the `git` executable.
//!
//! Every command runs in a given working directory with its own time budget
//! and returns combined output or a typed [`Error`]. There are no retries at
//! this layer; retry policy belongs to the caller, which can ask an error for
//! its [`ErrorCategory`].
//!
//! ## Example
//!
//! ```no_run
//! use gitkit::{Client, RefKind, RefSelector};
//! use std::path::Path;
//!
//! let client = Client::new();
//! let dir = Path::new("/home/me/.config/nvim/pack/git-plugins/opt/telescope.nvim");
//!
//! let symref = client.symbolic_head(dir)?;
//! let branch = gitkit::refs::branch_leaf(&symref);
//! let local = client.rev_parse_head(dir)?;
//! let refs = client.ls_remote(dir, RefKind::Heads, "origin", branch)?;
//! let remote = gitkit::refs::select(&refs, branch, RefSelector::Exact(&symref)).unwrap();
//! println!("up to date: {}", local == remote.commit);
//! # Ok::<(), gitkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod refs;

pub use backend::Backend;
pub use backend::cli::GitCli;
pub use error::{Error, ErrorCategory, Result};
pub use refs::{RefKind, RefSelector, RemoteRef, ResolutionError};

use std::path::Path;

/// High-level client exposing the git verbs the reconciler needs.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client over the real git CLI with the default time budget.
    pub fn new() -> Self {
        Self::with_backend(Box::new(backend::default_backend()))
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// `git clone [--branch BRANCH] LOCATOR NAME`, run inside `parent`.
    pub fn clone_repo(
        &self,
        parent: &Path,
        locator: &str,
        name: &str,
        branch: Option<&str>,
    ) -> Result<String> {
        let mut args = vec!["clone"];
        if let Some(branch) = branch {
            args.push("--branch");
            args.push(branch);
        }
        args.push(locator);
        args.push(name);
        self.backend.run(parent, &args)
    }

    /// `git symbolic-ref HEAD`: the full name of the checked-out branch.
    pub fn symbolic_head(&self, dir: &Path) -> Result<String> {
        self.backend.run(dir, &["symbolic-ref", "HEAD"])
    }

    /// `git config KEY`.
    pub fn config_get(&self, dir: &Path, key: &str) -> Result<String> {
        self.backend.run(dir, &["config", key])
    }

    /// URL of the remote the given branch tracks.
    ///
    /// Reads `branch.BRANCH.remote`, then `remote.REMOTE.url`.
    pub fn branch_remote_url(&self, dir: &Path, branch: &str) -> Result<String> {
        let remote = self.config_get(dir, &format!("branch.{branch}.remote"))?;
        self.config_get(dir, &format!("remote.{remote}.url"))
    }

    /// `git rev-parse HEAD`.
    pub fn rev_parse_head(&self, dir: &Path) -> Result<String> {
        self.backend.run(dir, &["rev-parse", "HEAD"])
    }

    /// `git ls-remote --heads|--refs LOCATOR PATTERN`, parsed.
    pub fn ls_remote(
        &self,
        dir: &Path,
        kind: RefKind,
        locator: &str,
        pattern: &str,
    ) -> Result<Vec<RemoteRef>> {
        let output = self
            .backend
            .run(dir, &["ls-remote", kind.flag(), locator, pattern])?;
        Ok(refs::parse_ls_remote(&output))
    }

    /// `git pull --rebase LOCATOR BRANCH`.
    pub fn pull_rebase(&self, dir: &Path, locator: &str, branch: &str) -> Result<String> {
        self.backend
            .run(dir, &["pull", "--rebase", locator, branch])
    }

    /// `git reset --hard REFERENCE`.
    pub fn reset_hard(&self, dir: &Path, reference: &str) -> Result<String> {
        self.backend.run(dir, &["reset", "--hard", reference])
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
