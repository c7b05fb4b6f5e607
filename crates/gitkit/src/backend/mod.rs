//! Backend abstraction for git invocations.
//!
//! The [`Backend`] trait is the single seam between the reconciler and the
//! outside world's version control, allowing for different implementations
//! (real CLI, scripted fakes for testing).

pub mod cli;

use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Runs one git command.
///
/// Implementations must be usable from many threads at once: the reconciler
/// calls the same backend from every worker.
pub trait Backend: Send + Sync {
    /// Run `git <args>` with `dir` as the working directory.
    ///
    /// Returns combined stdout and stderr with trailing newlines trimmed.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        (**self).run(dir, args)
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        (**self).run(dir, args)
    }
}

/// Get the default backend (real git CLI, 30 second budget per command).
pub fn default_backend() -> cli::GitCli {
    cli::GitCli::new()
}
