//! Error types for the registry crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur loading, editing or saving the registry
#[derive(Error, Debug)]
pub enum Error {
    /// Registry file could not be read
    #[error("unable to read registry {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not a valid document
    #[error("invalid registry {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Registry could not be serialized
    #[error("unable to serialize registry {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Registry file could not be written
    #[error("unable to write registry {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two records share a name
    #[error("duplicate plugin name: {0}")]
    DuplicateName(String),

    /// A name that cannot be used as a directory name
    #[error("invalid plugin name: {0:?}")]
    InvalidName(String),

    /// A name that is not registered
    #[error("no such plugin: {0}")]
    UnknownPlugin(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;
