use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Cannot access {}: {source}", path.display())]
    PathAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create or access default path: {}. Error: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch editor \"{command}\": {source}")]
    Editor {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error)]
pub(crate) enum PersistenceError {
    #[error("Failed to read state from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save state to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed state in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode state key \"{key}\": {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
