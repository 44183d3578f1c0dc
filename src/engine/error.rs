//! Query engine error types

use thiserror::Error;

/// Errors raised by the query engine binding
#[derive(Error, Debug)]
pub enum EngineError {
    /// Snapshot bytes are missing or empty
    #[error("Snapshot unavailable")]
    SnapshotUnavailable,

    /// Bytes could not be opened as a database
    #[error("Engine initialization failed: {0}")]
    Init(String),

    /// Query failed against the snapshot (schema mismatch, bad projection)
    #[error("Query execution failed: {0}")]
    QueryExec(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
