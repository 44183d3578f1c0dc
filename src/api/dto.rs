//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::chart::Tooltip;
use crate::series::Series;
use serde::{Deserialize, Serialize};

// ============================================
// SERIES / CHART DTOs
// ============================================

/// Query parameters carrying a holdings amount
#[derive(Debug, Default, Deserialize)]
pub struct AmountParams {
    /// Holdings amount (default: `[holdings] default_amount`)
    #[serde(default)]
    pub amount: Option<String>,
}

/// Derived series response
#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    /// Executor state name
    pub state: String,
    /// Load generation the series was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    /// Multiplier applied to every price
    pub multiplier: f64,
    /// Number of points
    pub count: usize,
    pub series: Series,
}

// ============================================
// TOOLTIP DTOs
// ============================================

/// Tooltip query parameters
#[derive(Debug, Default, Deserialize)]
pub struct TooltipParams {
    #[serde(default)]
    pub amount: Option<String>,
    /// Instant to hover: Unix seconds, `YYYY-MM-DD`, `MM/DD/YYYY` or RFC 3339
    #[serde(default)]
    pub at: Option<String>,
    /// Pixel column on the rendered chart, used when `at` is absent
    #[serde(default)]
    pub x: Option<f64>,
}

/// Tooltip response
#[derive(Debug, Serialize)]
pub struct TooltipResponse {
    /// Index of the nearest point
    pub index: usize,
    pub tooltip: Tooltip,
}

// ============================================
// PAGE DTOs
// ============================================

/// Form fields of the chart page
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Pending text typed by the user
    #[serde(default)]
    pub amount: Option<String>,
    /// Amount committed before this submission
    #[serde(default)]
    pub committed: Option<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, loading, degraded
    pub status: String,
    /// Executor state name
    pub executor: String,
    /// Current load generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    /// Rows in the query result, once queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Why the last load failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
