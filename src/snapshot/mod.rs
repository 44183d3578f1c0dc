//! Price Snapshot
//!
//! A snapshot is a complete SQLite database serialized to bytes. It is built
//! once (from CSV, at packaging time) and loaded read-only at runtime:
//!
//! - **loader**: `BinarySnapshot` byte buffer and file loading
//! - **builder**: Packaging price rows into a snapshot
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! prices(date INTEGER NOT NULL, price REAL NOT NULL)   -- sorted by date ASC
//! ```

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::{
    parse_timestamp, CsvImportReport, SnapshotBuilder, DEFAULT_PRICE_COLUMN, DEFAULT_TABLE,
    DEFAULT_TIMESTAMP_COLUMN,
};
pub use error::{SnapshotError, SnapshotResult};
pub use loader::{BinarySnapshot, SnapshotLoader};
