//! Series Routes
//!
//! - GET /api/v1/series?amount= - Derived series as JSON
//! - GET /api/v1/tooltip?amount=&at=|x= - Tooltip for the nearest point

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::api::dto::{AmountParams, SeriesResponse, TooltipParams, TooltipResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::resolve_amount;
use crate::api::state::AppState;
use crate::chart::{nearest_index, Tooltip};
use crate::snapshot::parse_timestamp;

/// GET /api/v1/series
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AmountParams>,
) -> ApiResult<Json<SeriesResponse>> {
    let multiplier = resolve_amount(&state, params.amount.as_deref())?;
    let executor = state.executor_state();
    let series = state.series(multiplier).await;

    Ok(Json(SeriesResponse {
        state: executor.name().to_string(),
        generation: executor.outcome().map(|o| o.generation),
        multiplier,
        count: series.len(),
        series: series.as_ref().clone(),
    }))
}

/// GET /api/v1/tooltip
pub async fn get_tooltip(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TooltipParams>,
) -> ApiResult<Json<TooltipResponse>> {
    let multiplier = resolve_amount(&state, params.amount.as_deref())?;
    let series = state.series(multiplier).await;

    let at: DateTime<Utc> = match (params.at.as_deref(), params.x) {
        (Some(at), _) => parse_timestamp(at.trim())
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .ok_or_else(|| ApiError::Validation(format!("Unrecognised instant: {:?}", at)))?,
        (None, Some(x)) => match state.renderer.layout(&series).x {
            Some(scale) => scale.invert(x),
            None => return Err(ApiError::NotFound("No data points to hover".to_string())),
        },
        (None, None) => {
            return Err(ApiError::Validation(
                "Either 'at' or 'x' is required".to_string(),
            ))
        }
    };

    let index = nearest_index(&series.points, at)
        .ok_or_else(|| ApiError::NotFound("No data points to hover".to_string()))?;

    let tooltip = Tooltip::for_point(
        &series.label,
        &state.renderer.options().tooltip.raw_label,
        &series.points[index],
    );

    Ok(Json(TooltipResponse { index, tooltip }))
}
