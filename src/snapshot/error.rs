//! Snapshot error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or packaging a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// I/O operation failed
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite failed while writing or serializing the snapshot
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// CSV input could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV header does not contain the expected columns
    #[error("Missing column in CSV header: {0}")]
    MissingColumn(String),
}

/// Result type alias for snapshot operations
pub type SnapshotResult<T> = Result<T, SnapshotError>;
