//! Chart Route
//!
//! - GET /api/v1/chart.svg?amount= - Standalone SVG chart

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::api::dto::AmountParams;
use crate::api::error::ApiResult;
use crate::api::routes::resolve_amount;
use crate::api::state::AppState;

/// GET /api/v1/chart.svg
pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AmountParams>,
) -> ApiResult<impl IntoResponse> {
    let multiplier = resolve_amount(&state, params.amount.as_deref())?;
    let series = state.series(multiplier).await;
    let svg = state.renderer.render(&series);

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        svg,
    ))
}
