//! Error types for git invocations.
//!
//! Every failure carries the command line and working directory so the
//! caller can report it against the entry it was working on.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Categories of git failures, used by callers to decide on retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The command exceeded its time budget and was killed
    Timeout,
    /// Network-related failure (DNS, TLS, connection refused, ...)
    Network,
    /// Remote repository or reference does not exist
    NotFound,
    /// Anything else
    Other,
}

impl ErrorCategory {
    /// Whether this category is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Timeout => "Command timed out",
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Repository or reference not found",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors that can occur while running git.
#[derive(Debug, Error)]
pub enum Error {
    /// The git executable could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status
    #[error("`{command}` failed in {}{}", .dir.display(), render_output(.output))]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Working directory of the command
        dir: PathBuf,
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Combined stdout and stderr, trailing newlines trimmed
        output: String,
    },

    /// git did not finish within its time budget
    #[error("`{command}` timed out after {}s in {}", .timeout.as_secs(), .dir.display())]
    TimedOut {
        /// Command line that timed out
        command: String,
        /// Working directory of the command
        dir: PathBuf,
        /// Budget that was exceeded
        timeout: Duration,
    },

    /// IO error while waiting on or reading from the child process
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn render_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(": {output}")
    }
}

impl Error {
    /// Classify this error for retry decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::TimedOut { .. } => ErrorCategory::Timeout,
            Error::CommandFailed { output, .. } => categorize_output(output),
            Error::Spawn { .. } | Error::Io(_) => ErrorCategory::Other,
        }
    }

    /// Whether the failure is worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Whether the command was killed because it ran too long.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TimedOut { .. })
    }
}

/// Classify git output text.
pub fn categorize_output(output: &str) -> ErrorCategory {
    let lower = output.to_lowercase();

    let network_patterns = [
        "could not resolve",
        "connection refused",
        "connection timed out",
        "connection reset",
        "ssl",
        "unable to access",
        "temporary failure",
        "network is unreachable",
        "early eof",
    ];
    if network_patterns.iter().any(|p| lower.contains(p)) {
        return ErrorCategory::Network;
    }

    let not_found_patterns = [
        "repository not found",
        "does not appear to be a git repository",
        "not found in upstream",
        "couldn't find remote ref",
    ];
    if not_found_patterns.iter().any(|p| lower.contains(p)) {
        return ErrorCategory::NotFound;
    }

    ErrorCategory::Other
}

/// Result type for git operations.
pub type Result<T> = std::result::Result<T, Error>;
