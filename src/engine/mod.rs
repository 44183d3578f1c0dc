//! Query Engine Binding
//!
//! Wraps an in-process, read-only SQLite engine built from a
//! [`BinarySnapshot`](crate::snapshot::BinarySnapshot):
//!
//! - **binding**: `QueryEngine` load/execute
//! - **result**: `ResultSet` and scalar `Value` types
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use holdings::engine::{QueryEngine, DEFAULT_QUERY};
//! use holdings::snapshot::SnapshotBuilder;
//!
//! let snapshot = SnapshotBuilder::new().row(1609459200, 29000.0).build()?;
//! if let Some(engine) = QueryEngine::load(Some(&snapshot))? {
//!     let result = engine.execute(DEFAULT_QUERY)?;
//!     assert_eq!(result.row_count(), 1);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binding;
pub mod error;
pub mod result;

pub use binding::{price_query, QueryEngine, DEFAULT_QUERY};
pub use error::{EngineError, EngineResult};
pub use result::{PriceRow, ResultSet, Value};
