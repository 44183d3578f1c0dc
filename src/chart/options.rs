//! Chart options
//!
//! Describes the holdings chart: time axis bucketed by year, logarithmic
//! value axis, nearest-in-x tooltips, no point markers. Deserializable so
//! the `[chart]` config section can override any field.

use serde::{Deserialize, Serialize};

/// Tick bucketing for the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Year,
    Month,
}

/// Full chart description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Stroke width of the series line
    pub line_width: f64,
    /// Marker radius; 0 draws the line only
    pub point_radius: f64,
    pub x_axis: TimeAxisOptions,
    pub y_axis: LogAxisOptions,
    pub tooltip: TooltipOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeAxisOptions {
    pub display: bool,
    pub unit: TimeUnit,
    pub grid_color: String,
    pub tick_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogAxisOptions {
    pub display: bool,
    pub grid_color: String,
    pub tick_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipOptions {
    pub background: String,
    /// Label of the underlying price line in the tooltip
    pub raw_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 700,
            background: "#17171a".to_string(),
            line_width: 3.0,
            point_radius: 0.0,
            x_axis: TimeAxisOptions::default(),
            y_axis: LogAxisOptions::default(),
            tooltip: TooltipOptions::default(),
        }
    }
}

impl Default for TimeAxisOptions {
    fn default() -> Self {
        Self {
            display: true,
            unit: TimeUnit::Year,
            grid_color: "#222531".to_string(),
            tick_color: "#858ca2".to_string(),
        }
    }
}

impl Default for LogAxisOptions {
    fn default() -> Self {
        Self {
            display: true,
            grid_color: "#222531".to_string(),
            tick_color: "#858ca2".to_string(),
        }
    }
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            background: "#222531".to_string(),
            raw_label: "Bitcoin price".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ChartOptions::default();
        assert_eq!(options.point_radius, 0.0);
        assert_eq!(options.x_axis.unit, TimeUnit::Year);
        assert_eq!(options.tooltip.raw_label, "Bitcoin price");
    }

    #[test]
    fn test_partial_toml_override() {
        let options: ChartOptions = toml::from_str(
            r##"
            width = 800
            [x_axis]
            unit = "month"
            [tooltip]
            raw_label = "Ether price"
            "##,
        )
        .unwrap();

        assert_eq!(options.width, 800);
        assert_eq!(options.height, 700);
        assert_eq!(options.x_axis.unit, TimeUnit::Month);
        assert_eq!(options.x_axis.grid_color, "#222531");
        assert_eq!(options.tooltip.raw_label, "Ether price");
        assert_eq!(options.tooltip.background, "#222531");
    }
}
