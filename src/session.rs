//! Session
//!
//! The single controlling context for one interactive chart: it owns the
//! executor (and through it the engine), the holdings input, the series
//! memo and the chart view. Nothing here is global; every session gets its
//! own engine instance.
//!
//! ```text
//! snapshot ─▶ ReactiveQuery ─▶ SeriesMemo ─▶ ChartView
//!                                  ▲
//!               HoldingsInput ─────┘  (committed multiplier only)
//! ```

use crate::chart::{ChartOptions, ChartView, SvgRenderer, Tooltip};
use crate::config::Config;
use crate::engine::price_query;
use crate::executor::{ExecutorState, ReactiveQuery};
use crate::input::{HoldingsInput, InputError};
use crate::series::{Series, SeriesMemo, SeriesStyle};
use crate::snapshot::BinarySnapshot;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// One interactive holdings chart
#[derive(Debug)]
pub struct Session {
    query: ReactiveQuery,
    input: HoldingsInput,
    memo: SeriesMemo,
    view: ChartView,
}

impl Session {
    pub fn new(query: impl Into<String>, options: ChartOptions, style: SeriesStyle) -> Self {
        Self {
            query: ReactiveQuery::new(query),
            input: HoldingsInput::default(),
            memo: SeriesMemo::new(style),
            view: ChartView::new(SvgRenderer::new(options)),
        }
    }

    /// Build a session from the `[snapshot]`, `[holdings]`, `[series]` and `[chart]` config
    pub fn from_config(config: &Config) -> Self {
        let snapshot = &config.snapshot;
        let mut session = Self::new(
            price_query(&snapshot.table, &snapshot.timestamp_column, &snapshot.price_column),
            config.chart.clone(),
            config.series.clone(),
        );
        session.input = HoldingsInput::new(config.holdings.default_amount);
        session
    }

    /// Start loading already-available snapshot bytes
    pub fn load(&self, snapshot: Option<BinarySnapshot>) -> JoinHandle<()> {
        self.query.load(snapshot)
    }

    /// Start loading a snapshot that arrives asynchronously
    pub fn load_from<F>(&self, source: F) -> JoinHandle<()>
    where
        F: Future<Output = Option<BinarySnapshot>> + Send + 'static,
    {
        self.query.load_from(source)
    }

    /// Wait until the current load is queried or failed
    pub async fn settled(&self) -> ExecutorState {
        self.query.settled().await
    }

    pub fn state(&self) -> ExecutorState {
        self.query.state()
    }

    /// Why the chart is empty, if the load failed
    pub fn diagnostic(&self) -> Option<String> {
        self.query.state().failure().map(str::to_string)
    }

    pub fn input(&self) -> &HoldingsInput {
        &self.input
    }

    pub fn set_pending(&mut self, text: impl Into<String>) {
        self.input.set_pending(text);
    }

    pub fn can_confirm(&self) -> bool {
        self.input.can_confirm()
    }

    /// Commit the pending amount; invalid text leaves everything unchanged
    pub fn confirm(&mut self) -> Result<f64, InputError> {
        self.input.confirm().inspect_err(|e| {
            tracing::debug!(error = %e, committed = self.input.committed(), "Holdings amount rejected");
        })
    }

    /// Derived series for the current result and committed multiplier
    pub fn series(&mut self) -> Arc<Series> {
        let outcome = self.query.outcome();
        self.memo.get(outcome.as_ref(), self.input.committed())
    }

    /// Times the transform actually ran in this session
    pub fn computations(&self) -> u64 {
        self.memo.computations()
    }

    /// Times the chart view was rebuilt in this session
    pub fn view_resets(&self) -> u64 {
        self.view.resets()
    }

    fn refresh_view(&mut self) {
        let outcome = self.query.outcome();
        let multiplier = self.input.committed();
        let series = self.memo.get(outcome.as_ref(), multiplier);
        self.view.sync(outcome.map(|o| o.generation), multiplier, series);
    }

    /// Current chart as SVG
    pub fn render(&mut self) -> String {
        self.refresh_view();
        self.view.svg().to_string()
    }

    /// Hover the point nearest to `at`
    pub fn tooltip_at(&mut self, at: DateTime<Utc>) -> Option<Tooltip> {
        self.refresh_view();
        self.view.hover_at(at)
    }

    /// Hover the point nearest to pixel column `x`
    pub fn tooltip_at_x(&mut self, x: f64) -> Option<Tooltip> {
        self.refresh_view();
        self.view.hover_at_x(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DEFAULT_QUERY;
    use crate::snapshot::SnapshotBuilder;
    use chrono::TimeZone;

    fn session() -> Session {
        Session::new(DEFAULT_QUERY, ChartOptions::default(), SeriesStyle::default())
    }

    fn scenario_snapshot() -> BinarySnapshot {
        SnapshotBuilder::new()
            .row(1609459200, 29000.0)
            .row(1640995200, 47000.0)
            .build()
            .unwrap()
    }

    fn derived(series: &Series) -> Vec<f64> {
        series.points.iter().map(|p| p.derived_value).collect()
    }

    #[tokio::test]
    async fn test_scenario_a_and_b() {
        let mut session = session();
        session.load(Some(scenario_snapshot()));
        session.settled().await;

        let series = session.series();
        assert_eq!(derived(&series), vec![29000.0, 47000.0]);
        assert_eq!(
            series.points[0].timestamp,
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );

        session.set_pending("0.5");
        assert_eq!(session.confirm(), Ok(0.5));
        let series = session.series();
        assert_eq!(derived(&series), vec![14500.0, 23500.0]);
        assert_eq!(series.points[1].raw_value, 47000.0);
    }

    #[tokio::test]
    async fn test_scenario_c_empty_snapshot() {
        let mut session = session();
        session.load(Some(SnapshotBuilder::new().build().unwrap()));
        let state = session.settled().await;

        assert!(state.outcome().unwrap().result.is_empty());
        assert!(session.series().is_empty());
        let svg = session.render();
        assert!(!svg.contains("class=\"series\""));
        assert!(!svg.contains("x-axis"));
    }

    #[tokio::test]
    async fn test_scenario_d_invalid_input() {
        let mut session = session();
        session.load(Some(scenario_snapshot()));
        session.settled().await;
        session.render();
        let computations = session.computations();
        let resets = session.view_resets();

        session.set_pending("abc");
        assert!(session.confirm().is_err());
        assert_eq!(session.input().committed(), 1.0);

        session.render();
        assert_eq!(session.computations(), computations);
        assert_eq!(session.view_resets(), resets);
    }

    #[tokio::test]
    async fn test_scenario_e_malformed_snapshot() {
        let mut session = session();
        session.load(Some(BinarySnapshot::from(vec![7u8; 2048])));
        let state = session.settled().await;

        assert!(state.outcome().is_none());
        assert!(session.diagnostic().is_some());
        assert!(session.series().is_empty());
        assert!(session.render().starts_with("<svg"));
    }

    #[tokio::test]
    async fn test_multiplier_change_does_not_requery() {
        let mut session = session();
        session.load(Some(scenario_snapshot()));
        session.settled().await;
        let generation = session.state().generation();

        session.render();
        session.set_pending("2");
        session.confirm().unwrap();
        session.render();

        assert_eq!(session.state().generation(), generation);
        assert_eq!(session.computations(), 2);
        assert_eq!(session.view_resets(), 2);
    }

    #[tokio::test]
    async fn test_tooltip_through_session() {
        let mut session = session();
        session.load(Some(scenario_snapshot()));
        session.settled().await;

        let tooltip = session
            .tooltip_at(Utc.with_ymd_and_hms(2021, 12, 1, 0, 0, 0).unwrap())
            .unwrap();
        assert_eq!(tooltip.title, "01/01/2022");
        assert!(session.render().contains("class=\"tooltip\""));
    }

    #[tokio::test]
    async fn test_series_before_load_is_empty() {
        let mut session = session();
        assert!(session.series().is_empty());
        assert!(matches!(session.state(), ExecutorState::Uninitialized));
    }
}
