//! Holdings HTTP API
//!
//! Serves the chart page and its data, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Holdings form with the chart inline
//!
//! ## Data
//! - `GET /api/v1/series?amount=` - Derived series as JSON
//! - `GET /api/v1/chart.svg?amount=` - Chart as SVG
//! - `GET /api/v1/tooltip?amount=&at=` - Tooltip for the point nearest to `at` (or pixel `x`)
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use holdings::api::{serve, AppState};
//! use holdings::config::Config;
//! use holdings::snapshot::SnapshotLoader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let state = AppState::new(config.clone());
//!
//!     let path = config.snapshot.path.clone();
//!     state.query.load_from(async move { SnapshotLoader::from_path(&path).await.ok().flatten() });
//!
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/series", get(routes::series::get_series))
        .route("/tooltip", get(routes::series::get_tooltip))
        .route("/chart.svg", get(routes::chart::chart_svg));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.api_config().cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::page::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// `*` allows any origin; otherwise only the listed origins may read
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.api_config().addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Holdings API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Holdings API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::snapshot::{BinarySnapshot, SnapshotBuilder};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn snapshot() -> BinarySnapshot {
        SnapshotBuilder::new()
            .row(1609459200, 29000.0)
            .row(1640995200, 47000.0)
            .build()
            .unwrap()
    }

    async fn create_test_app(snapshot: Option<BinarySnapshot>) -> Router {
        let state = AppState::new(Config::default());
        state.query.load(snapshot);
        state.query.settled().await;
        build_router(state)
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_after_query() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_not_ready_before_load() {
        let app = build_router(AppState::new(Config::default()));
        let response = get(app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["rows"], 2);
    }

    #[tokio::test]
    async fn test_series_applies_amount() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/api/v1/series?amount=0.5").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["state"], "queried");
        assert_eq!(body["count"], 2);
        assert_eq!(body["series"]["points"][0]["derived_value"], 14500.0);
        assert_eq!(body["series"]["points"][1]["raw_value"], 47000.0);
        assert_eq!(body["series"]["label"], "Holdings value");
    }

    #[tokio::test]
    async fn test_series_default_amount() {
        let app = create_test_app(Some(snapshot())).await;
        let body = body_json(get(app, "/api/v1/series").await).await;
        assert_eq!(body["multiplier"], 1.0);
        assert_eq!(body["series"]["points"][1]["derived_value"], 47000.0);
    }

    #[tokio::test]
    async fn test_invalid_configured_amount_falls_back() {
        let mut config = Config::default();
        config.holdings.default_amount = f64::NAN;
        let state = AppState::new(config);
        state.query.load(Some(snapshot()));
        state.query.settled().await;

        let body = body_json(get(build_router(state), "/api/v1/series").await).await;
        assert_eq!(body["multiplier"], 1.0);
        assert_eq!(body["series"]["points"][0]["derived_value"], 29000.0);
    }

    #[tokio::test]
    async fn test_series_invalid_amount() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/api/v1/series?amount=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_AMOUNT");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_series_without_snapshot_is_empty() {
        let app = create_test_app(None).await;
        let body = body_json(get(app, "/api/v1/series").await).await;
        assert_eq!(body["state"], "failed");
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_chart_svg() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/api/v1/chart.svg?amount=2").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );

        let svg = body_text(response).await;
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("class=\"series\""));
    }

    #[tokio::test]
    async fn test_tooltip_nearest_point() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/api/v1/tooltip?amount=0.5&at=2021-12-01").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["index"], 1);
        assert_eq!(body["tooltip"]["title"], "01/01/2022");
        assert_eq!(body["tooltip"]["lines"][0], "Holdings value: $23,500.00");
        assert_eq!(body["tooltip"]["lines"][1], "Bitcoin price: $47,000.00");
    }

    #[tokio::test]
    async fn test_tooltip_requires_position() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/api/v1/tooltip").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tooltip_on_empty_chart() {
        let app = create_test_app(Some(SnapshotBuilder::new().build().unwrap())).await;
        let response = get(app, "/api/v1/tooltip?x=100").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_keeps_committed_on_invalid_amount() {
        let app = create_test_app(Some(snapshot())).await;
        let response = get(app, "/?amount=abc&committed=0.5").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("name=\"committed\" type=\"hidden\" value=\"0.5\""));
        assert!(html.contains("class=\"notice\""));
        assert!(html.contains("value=\"abc\""));
    }

    #[tokio::test]
    async fn test_page_shows_failure_banner() {
        let app = create_test_app(Some(BinarySnapshot::from(vec![9u8; 1024]))).await;
        let html = body_text(get(app, "/").await).await;
        assert!(html.contains("Price history unavailable"));
        assert!(html.contains("<svg"));
    }
}
