//! Series data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default dataset label
pub const DEFAULT_SERIES_LABEL: &str = "Holdings value";
/// Default line colour
pub const DEFAULT_SERIES_COLOR: &str = "#f2a900";

/// One point of the derived series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    /// `raw_value * multiplier`
    pub derived_value: f64,
    pub raw_value: f64,
}

/// Display metadata attached to a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    pub label: String,
    pub color: String,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            label: DEFAULT_SERIES_LABEL.to_string(),
            color: DEFAULT_SERIES_COLOR.to_string(),
        }
    }
}

/// Ordered derived points plus display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl Series {
    /// A series with no points
    pub fn empty(style: &SeriesStyle) -> Self {
        Self {
            label: style.label.clone(),
            color: style.color.clone(),
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last timestamps
    pub fn time_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.timestamp, last.timestamp))
    }

    /// Smallest and largest strictly positive derived values
    pub fn positive_value_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| p.derived_value)
            .filter(|v| *v > 0.0 && v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
