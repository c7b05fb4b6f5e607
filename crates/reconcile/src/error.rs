//! Error types for reconciliation.
//!
//! [`EntryError`] never escapes a worker: it becomes the `Error` outcome of
//! that entry's event. [`Error`] is reserved for failures of the run itself.

use thiserror::Error;

/// Why a single entry could not be reconciled.
#[derive(Debug, Error)]
pub enum EntryError {
    /// A git invocation failed or timed out
    #[error(transparent)]
    Gateway(#[from] gitkit::Error),

    /// The remote head for the branch could not be determined
    #[error(transparent)]
    Resolution(#[from] gitkit::ResolutionError),

    /// The entry has no directory under the install root
    #[error("not installed")]
    NotInstalled,

    /// The worker panicked before producing an outcome
    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl EntryError {
    /// Whether a git command timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_timeout())
    }

    /// Whether the failure came from remote head resolution rather than git.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

/// Failures that abort a whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// The worker pool could not be created
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for engine runs.
pub type Result<T> = std::result::Result<T, Error>;
