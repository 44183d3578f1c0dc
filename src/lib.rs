//! # Holdings
//!
//! Charts the value of a Bitcoin holding over time. A price history ships
//! as a serialized SQLite snapshot, is queried once per load, and every
//! change of the holdings amount only re-derives the series.
//!
//! ## Features
//!
//! - **Embedded snapshot**: The whole price table travels as one SQLite image
//! - **Reactive loading**: Load states published on a watch channel, stale loads dropped
//! - **Cheap re-derivation**: Amount changes never re-run the query
//! - **Log-scale chart**: SVG with year ticks and nearest-in-x tooltips
//!
//! ## Modules
//!
//! - [`snapshot`]: Snapshot bytes, file loading and packaging
//! - [`engine`]: SQLite binding over the snapshot
//! - [`executor`]: Load/query state machine
//! - [`series`]: Price rows to holdings series
//! - [`input`]: Holdings amount entry
//! - [`chart`]: Scales, tooltips and SVG rendering
//! - [`session`]: One interactive chart tying it all together
//! - [`api`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use holdings::session::Session;
//! use holdings::config::Config;
//! use holdings::snapshot::SnapshotLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let mut session = Session::from_config(&config);
//!
//!     // Load the price snapshot and run the query
//!     let snapshot = SnapshotLoader::from_path(&config.snapshot.path).await?;
//!     session.load(snapshot);
//!     session.settled().await;
//!
//!     // Chart half a bitcoin
//!     session.set_pending("0.5");
//!     session.confirm()?;
//!     std::fs::write("holdings.svg", session.render())?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod engine;
pub mod executor;
pub mod input;
pub mod logging;
pub mod series;
pub mod session;
pub mod snapshot;

// Re-export top-level types for convenience
pub use snapshot::{BinarySnapshot, SnapshotBuilder, SnapshotError, SnapshotLoader, SnapshotResult};

pub use engine::{EngineError, EngineResult, QueryEngine, ResultSet, Value, DEFAULT_QUERY};

pub use executor::{ExecutorState, QueryOutcome, ReactiveQuery};

pub use series::{transform, Series, SeriesMemo, SeriesStyle, TimeSeriesPoint};

pub use input::{HoldingsInput, InputError};

pub use chart::{ChartOptions, ChartView, SvgRenderer, Tooltip};

pub use session::Session;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
