//! Chart view state
//!
//! Holds the chart currently on screen. The view is keyed on the series'
//! load generation and the committed multiplier; when either changes the
//! whole view is rebuilt (scales, cached SVG, hover) instead of patched,
//! because a new multiplier moves the log-axis domain non-linearly.

use crate::chart::render::{PlotLayout, SvgRenderer};
use crate::chart::tooltip::{nearest_index, Tooltip};
use crate::series::Series;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
    generation: Option<u64>,
    multiplier_bits: u64,
}

/// The rendered chart and its interaction state
#[derive(Debug)]
pub struct ChartView {
    renderer: SvgRenderer,
    key: Option<ViewKey>,
    series: Arc<Series>,
    layout: Option<PlotLayout>,
    svg: Option<String>,
    hover: Option<usize>,
    resets: u64,
}

impl ChartView {
    pub fn new(renderer: SvgRenderer) -> Self {
        Self {
            renderer,
            key: None,
            series: Arc::new(Series::empty(&Default::default())),
            layout: None,
            svg: None,
            hover: None,
            resets: 0,
        }
    }

    pub fn renderer(&self) -> &SvgRenderer {
        &self.renderer
    }

    /// Point the view at `series`; returns `true` if the view was reset
    pub fn sync(&mut self, generation: Option<u64>, multiplier: f64, series: Arc<Series>) -> bool {
        let key = ViewKey {
            generation,
            multiplier_bits: multiplier.to_bits(),
        };

        if self.key == Some(key) {
            return false;
        }

        self.key = Some(key);
        self.series = series;
        self.layout = None;
        self.svg = None;
        self.hover = None;
        self.resets += 1;
        tracing::debug!(?generation, multiplier, resets = self.resets, "Chart view reset");
        true
    }

    /// Number of full resets so far
    pub fn resets(&self) -> u64 {
        self.resets
    }

    pub fn series(&self) -> &Arc<Series> {
        &self.series
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover
    }

    fn layout(&mut self) -> PlotLayout {
        match self.layout {
            Some(layout) => layout,
            None => {
                let layout = self.renderer.layout(&self.series);
                self.layout = Some(layout);
                layout
            }
        }
    }

    /// Current SVG, rendered on first use after a reset or hover change
    pub fn svg(&mut self) -> &str {
        if self.svg.is_none() {
            let layout = self.layout();
            self.svg = Some(self.renderer.render_with(&self.series, &layout, self.hover));
        }
        self.svg.as_deref().unwrap_or_default()
    }

    /// Hover the point nearest to `at`
    pub fn hover_at(&mut self, at: DateTime<Utc>) -> Option<Tooltip> {
        let idx = nearest_index(&self.series.points, at);
        self.set_hover(idx);
        let point = self.series.points.get(idx?)?;
        Some(Tooltip::for_point(
            &self.series.label,
            &self.renderer.options().tooltip.raw_label,
            point,
        ))
    }

    /// Hover the point nearest to pixel column `x`
    pub fn hover_at_x(&mut self, x: f64) -> Option<Tooltip> {
        let scale = self.layout().x?;
        self.hover_at(scale.invert(x))
    }

    /// Clear the hover highlight
    pub fn leave(&mut self) {
        self.set_hover(None);
    }

    fn set_hover(&mut self, idx: Option<usize>) {
        if self.hover != idx {
            self.hover = idx;
            self.svg = None;
        }
    }
}
