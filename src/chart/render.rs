//! SVG rendering
//!
//! Draws a series as a standalone SVG document: grid, year ticks on x, log
//! ticks on y, the connecting line, and one invisible hover region per point
//! spanning the midpoints to its neighbours. Each region carries the point's
//! tooltip, which gives nearest-in-x hovering without needing to touch the
//! line.

use crate::chart::format;
use crate::chart::options::{ChartOptions, TimeUnit};
use crate::chart::scale::{LogScale, TimeScale};
use crate::chart::tooltip::Tooltip;
use crate::series::Series;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

const FONT: &str = "12px sans-serif";
const TOOLTIP_LINE_HEIGHT: f64 = 18.0;
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;

/// Plot area and the scales fitted to one series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// `None` when the series has no points
    pub x: Option<TimeScale>,
    /// `None` when the series has no strictly positive value
    pub y: Option<LogScale>,
}

impl PlotLayout {
    pub fn has_data(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// Renders series to SVG according to [`ChartOptions`]
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    options: ChartOptions,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(ChartOptions::default())
    }
}

impl SvgRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Fit scales to the series
    pub fn layout(&self, series: &Series) -> PlotLayout {
        let left = MARGIN_LEFT;
        let top = MARGIN_TOP;
        let right = (self.options.width as f64 - MARGIN_RIGHT).max(left + 1.0);
        let bottom = (self.options.height as f64 - MARGIN_BOTTOM).max(top + 1.0);

        let x = series
            .time_bounds()
            .map(|(start, end)| TimeScale::new(start, end, left, right));
        let y = series
            .positive_value_bounds()
            .and_then(|(lo, hi)| LogScale::new(lo, hi, top, bottom));

        PlotLayout {
            left,
            top,
            right,
            bottom,
            x,
            y,
        }
    }

    /// Render without a hovered point
    pub fn render(&self, series: &Series) -> String {
        self.render_with(series, &self.layout(series), None)
    }

    /// Render with a precomputed layout, optionally highlighting a point
    pub fn render_with(&self, series: &Series, layout: &PlotLayout, hover: Option<usize>) -> String {
        let opts = &self.options;
        let mut svg = String::with_capacity(256 + series.len() * 160);

        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" style=\"font: {font}\">\n",
            w = opts.width,
            h = opts.height,
            font = FONT,
        ));
        svg.push_str("<style>.hover{fill:transparent}.hover:hover{fill:rgba(255,255,255,0.04)}</style>\n");
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            escape_xml(&opts.background)
        ));

        let (Some(x), Some(y)) = (layout.x, layout.y) else {
            if !series.is_empty() {
                tracing::warn!(
                    points = series.len(),
                    "No positive values to place on a logarithmic axis"
                );
            }
            self.push_frame(&mut svg, layout);
            svg.push_str("</svg>\n");
            return svg;
        };

        self.push_value_axis(&mut svg, layout, &y);
        self.push_time_axis(&mut svg, layout, &x);
        self.push_frame(&mut svg, layout);
        self.push_line(&mut svg, series, &x, &y);
        if opts.point_radius > 0.0 {
            self.push_markers(&mut svg, series, &x, &y);
        }
        self.push_hover_regions(&mut svg, series, layout, &x);
        if let Some(idx) = hover {
            self.push_hover_tooltip(&mut svg, series, layout, &x, &y, idx);
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn push_frame(&self, svg: &mut String, layout: &PlotLayout) {
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"{}\"/>\n",
            layout.left,
            layout.top,
            layout.right - layout.left,
            layout.bottom - layout.top,
            escape_xml(&self.options.x_axis.grid_color),
        ));
    }

    fn push_value_axis(&self, svg: &mut String, layout: &PlotLayout, y: &LogScale) {
        let axis = &self.options.y_axis;
        if !axis.display {
            return;
        }

        svg.push_str("<g class=\"y-axis\">\n");
        for tick in y.ticks() {
            let Some(py) = y.map(tick) else { continue };
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{py:.1}\" x2=\"{:.1}\" y2=\"{py:.1}\" stroke=\"{}\"/>\n",
                layout.left,
                layout.right,
                escape_xml(&axis.grid_color),
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\">{}</text>\n",
                layout.left - 8.0,
                py + 4.0,
                escape_xml(&axis.tick_color),
                format::axis_number(tick),
            ));
        }
        svg.push_str("</g>\n");
    }

    fn push_time_axis(&self, svg: &mut String, layout: &PlotLayout, x: &TimeScale) {
        let axis = &self.options.x_axis;
        if !axis.display {
            return;
        }

        svg.push_str("<g class=\"x-axis\">\n");
        for tick in x.ticks(axis.unit) {
            let px = x.map(tick);
            let label = match axis.unit {
                TimeUnit::Year => format::year_label(tick),
                TimeUnit::Month => format::month_label(tick),
            };
            svg.push_str(&format!(
                "<line x1=\"{px:.1}\" y1=\"{:.1}\" x2=\"{px:.1}\" y2=\"{:.1}\" stroke=\"{}\"/>\n",
                layout.top,
                layout.bottom,
                escape_xml(&axis.grid_color),
            ));
            svg.push_str(&format!(
                "<text x=\"{px:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\">{}</text>\n",
                layout.bottom + 20.0,
                escape_xml(&axis.tick_color),
                label,
            ));
        }
        svg.push_str("</g>\n");
    }

    fn push_line(&self, svg: &mut String, series: &Series, x: &TimeScale, y: &LogScale) {
        let mut path = String::with_capacity(series.len() * 16);
        let mut pen_down = false;
        let mut skipped = 0usize;

        for point in &series.points {
            match y.map(point.derived_value) {
                Some(py) => {
                    let cmd = if pen_down { 'L' } else { 'M' };
                    path.push_str(&format!("{}{:.2},{:.2}", cmd, x.map(point.timestamp), py));
                    pen_down = true;
                }
                None => {
                    skipped += 1;
                    pen_down = false;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped non-positive values on logarithmic axis");
        }

        svg.push_str(&format!(
            "<path class=\"series\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\"/>\n",
            path,
            escape_xml(&series.color),
            self.options.line_width,
        ));
    }

    fn push_markers(&self, svg: &mut String, series: &Series, x: &TimeScale, y: &LogScale) {
        for point in &series.points {
            if let Some(py) = y.map(point.derived_value) {
                svg.push_str(&format!(
                    "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\"/>\n",
                    x.map(point.timestamp),
                    py,
                    self.options.point_radius,
                    escape_xml(&series.color),
                ));
            }
        }
    }

    fn push_hover_regions(&self, svg: &mut String, series: &Series, layout: &PlotLayout, x: &TimeScale) {
        let xs: Vec<f64> = series.points.iter().map(|p| x.map(p.timestamp)).collect();

        svg.push_str("<g class=\"hover-regions\">\n");
        for (idx, point) in series.points.iter().enumerate() {
            let start = if idx == 0 {
                layout.left
            } else {
                (xs[idx - 1] + xs[idx]) / 2.0
            };
            let end = if idx + 1 == xs.len() {
                layout.right
            } else {
                (xs[idx] + xs[idx + 1]) / 2.0
            };

            let tooltip = Tooltip::for_point(&series.label, &self.options.tooltip.raw_label, point);
            svg.push_str(&format!(
                "<rect class=\"hover\" data-index=\"{}\" x=\"{:.2}\" y=\"{:.1}\" width=\"{:.2}\" height=\"{:.1}\"><title>{}</title></rect>\n",
                idx,
                start,
                layout.top,
                (end - start).max(0.0),
                layout.bottom - layout.top,
                escape_xml(&tooltip.to_string()),
            ));
        }
        svg.push_str("</g>\n");
    }

    fn push_hover_tooltip(
        &self,
        svg: &mut String,
        series: &Series,
        layout: &PlotLayout,
        x: &TimeScale,
        y: &LogScale,
        idx: usize,
    ) {
        let Some(point) = series.points.get(idx) else {
            return;
        };
        let px = x.map(point.timestamp);
        let tooltip = Tooltip::for_point(&series.label, &self.options.tooltip.raw_label, point);

        let widest = std::iter::once(&tooltip.title)
            .chain(tooltip.lines.iter())
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let box_w = widest as f64 * TOOLTIP_CHAR_WIDTH + 16.0;
        let box_h = TOOLTIP_LINE_HEIGHT * (tooltip.lines.len() + 1) as f64 + 8.0;
        let box_x = if px + 12.0 + box_w > layout.right {
            px - 12.0 - box_w
        } else {
            px + 12.0
        };
        let box_y = layout.top + 8.0;

        svg.push_str("<g class=\"tooltip\">\n");
        svg.push_str(&format!(
            "<line x1=\"{px:.2}\" y1=\"{:.1}\" x2=\"{px:.2}\" y2=\"{:.1}\" stroke=\"{}\"/>\n",
            layout.top,
            layout.bottom,
            escape_xml(&self.options.y_axis.tick_color),
        ));
        if let Some(py) = y.map(point.derived_value) {
            svg.push_str(&format!(
                "<circle cx=\"{px:.2}\" cy=\"{py:.2}\" r=\"4\" fill=\"{}\"/>\n",
                escape_xml(&series.color),
            ));
        }
        svg.push_str(&format!(
            "<rect x=\"{box_x:.1}\" y=\"{box_y:.1}\" width=\"{box_w:.1}\" height=\"{box_h:.1}\" rx=\"4\" fill=\"{}\"/>\n",
            escape_xml(&self.options.tooltip.background),
        ));

        let text_x = box_x + 8.0;
        svg.push_str(&format!(
            "<text x=\"{text_x:.1}\" y=\"{:.1}\" fill=\"#ffffff\" font-weight=\"bold\">{}</text>\n",
            box_y + TOOLTIP_LINE_HEIGHT,
            escape_xml(&tooltip.title),
        ));
        for (line_idx, line) in tooltip.lines.iter().enumerate() {
            svg.push_str(&format!(
                "<text x=\"{text_x:.1}\" y=\"{:.1}\" fill=\"#ffffff\">{}</text>\n",
                box_y + TOOLTIP_LINE_HEIGHT * (line_idx + 2) as f64,
                escape_xml(line),
            ));
        }
        svg.push_str("</g>\n");
    }
}

/// Escape text for XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
    out
}
