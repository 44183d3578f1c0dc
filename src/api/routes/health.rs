//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (price query has run)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::executor::ExecutorState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the executor has queried the snapshot. A failed load
/// stays unready; the chart would only ever be empty.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.executor_state() {
        ExecutorState::Queried(_) => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with executor details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let executor = state.executor_state();

    let status = match &executor {
        ExecutorState::Queried(_) => "healthy",
        ExecutorState::Failed { .. } => "degraded",
        _ => "loading",
    };

    Json(HealthResponse {
        status: status.to_string(),
        executor: executor.name().to_string(),
        generation: executor.generation(),
        rows: executor.outcome().map(|o| o.result.row_count()),
        reason: executor.failure().map(str::to_string),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
