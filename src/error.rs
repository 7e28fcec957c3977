use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to create preferences directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} could not be read, change kept in memory only")]
    Unreadable { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize namespace {namespace}: {source}")]
    Serialize {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("preferences writer is no longer running")]
    WriterGone,
}

pub type Result<T> = std::result::Result<T, PrefsError>;
