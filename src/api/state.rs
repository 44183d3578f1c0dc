//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::chart::SvgRenderer;
use crate::config::{ApiConfig, Config};
use crate::engine::price_query;
use crate::executor::{ExecutorState, ReactiveQuery};
use crate::input::valid_amount_or_default;
use crate::series::{Series, SeriesMemo};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Executor holding the loaded snapshot and its query result
    pub query: Arc<ReactiveQuery>,
    /// Last derived series, shared by every request
    pub memo: Arc<Mutex<SeriesMemo>>,
    /// Chart renderer built from `[chart]`
    pub renderer: Arc<SvgRenderer>,
    /// Full configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state with a fresh executor for the configured query
    pub fn new(config: Config) -> Self {
        let snapshot = &config.snapshot;
        let query = ReactiveQuery::new(price_query(
            &snapshot.table,
            &snapshot.timestamp_column,
            &snapshot.price_column,
        ));
        Self::with_query(Arc::new(query), config)
    }

    /// Create state around an existing executor
    pub fn with_query(query: Arc<ReactiveQuery>, mut config: Config) -> Self {
        config.holdings.default_amount = valid_amount_or_default(config.holdings.default_amount);
        Self {
            query,
            memo: Arc::new(Mutex::new(SeriesMemo::new(config.series.clone()))),
            renderer: Arc::new(SvgRenderer::new(config.chart.clone())),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn api_config(&self) -> &ApiConfig {
        &self.config.api
    }

    /// Amount used when a request does not carry one
    pub fn default_amount(&self) -> f64 {
        self.config.holdings.default_amount
    }

    /// Current executor state
    pub fn executor_state(&self) -> ExecutorState {
        self.query.state()
    }

    /// Derived series for `multiplier` over the current result
    pub async fn series(&self, multiplier: f64) -> Arc<Series> {
        let outcome = self.query.outcome();
        self.memo.lock().await.get(outcome.as_ref(), multiplier)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
