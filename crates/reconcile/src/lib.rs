//! # Reconcile
//!
//! Brings a set of installed editor plugins in line with their git remotes.
//!
//! For every selected [`registry::PluginRecord`] a worker decides whether the
//! plugin is missing (clone it), current (report OK), or behind (pull with
//! rebase, and reset when pinned). Workers run in parallel and a failure in
//! one never affects another: each record produces exactly one [`Event`].
//! Alongside the workers, an optional sweep removes directories from the
//! install root that no registered record claims.
//!
//! Git and the filesystem are reached only through [`gitkit::Client`] and
//! the [`InstallDir`] trait.
//!
//! ## Example
//!
//! ```no_run
//! use reconcile::{DiskInstallDir, Engine, Options, Report};
//! use registry::Registry;
//! use std::path::Path;
//!
//! let registry = Registry::load(Path::new("registry.json"))?;
//! let install = DiskInstallDir::new("/home/me/.config/nvim/pack/git-plugins/opt");
//! let client = gitkit::Client::new();
//!
//! let engine = Engine::new(&client, &install, Options::default());
//! let records = registry.select(&[])?;
//! let names = registry.names();
//! engine.run(&records, Some(&names), |report| match report {
//!     Report::Entry(event) => println!("{} {}", event.outcome.verb(), event.name),
//!     Report::Deleted(name) => println!("DELETE {name}"),
//!     Report::SweepFailed { target, error } => eprintln!("{target}: {error}"),
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod engine;
mod error;
mod install;
mod protocol;
pub mod sweep;
mod types;

#[cfg(test)]
mod testing;

pub use engine::Engine;
pub use error::{EntryError, Error, Result};
pub use install::{DiskInstallDir, InstallDir};
pub use types::{Event, Mode, Options, Outcome, Report, Summary};
