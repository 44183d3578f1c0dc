//! Series Transformer
//!
//! Turns the raw `(timestamp, price)` result plus the committed multiplier
//! into the chart's time series:
//!
//! - **types**: `TimeSeriesPoint`, `Series`, `SeriesStyle`
//! - **transform**: The pure transform
//! - **memo**: Single-slot cache keyed on (result generation, multiplier)
//!
//! The multiplier never reaches the query layer; changing it only re-runs
//! the transform.

pub mod memo;
pub mod transform;
pub mod types;

pub use memo::SeriesMemo;
pub use transform::{transform, transform_styled};
pub use types::{Series, SeriesStyle, TimeSeriesPoint, DEFAULT_SERIES_COLOR, DEFAULT_SERIES_LABEL};
