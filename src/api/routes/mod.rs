//! API Routes
//!
//! Route handlers organized by functionality.

pub mod chart;
pub mod health;
pub mod page;
pub mod series;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::input::parse_amount;

/// Amount from a query string; absent or blank means the configured default
pub(crate) fn resolve_amount(state: &AppState, amount: Option<&str>) -> ApiResult<f64> {
    match amount {
        Some(text) if !text.trim().is_empty() => Ok(parse_amount(text)?),
        _ => Ok(state.default_amount()),
    }
}
