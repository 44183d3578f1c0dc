//! Nearest-in-x tooltips
//!
//! Hovering anywhere along the x axis selects the point whose timestamp is
//! closest; the pointer does not have to intersect the line.

use crate::chart::format;
use crate::series::{Series, TimeSeriesPoint};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Tooltip contents for one point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// Date, `MM/DD/YYYY`
    pub title: String,
    /// Derived value line, then raw value line
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn for_point(series_label: &str, raw_label: &str, point: &TimeSeriesPoint) -> Self {
        Self {
            title: format::tooltip_date(point.timestamp),
            lines: vec![
                format!("{}: {}", series_label, format::usd(point.derived_value)),
                format!("{}: {}", raw_label, format::usd(point.raw_value)),
            ],
        }
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// Index of the point closest to `at`; ties go to the earlier point
///
/// Points must be in ascending timestamp order.
pub fn nearest_index(points: &[TimeSeriesPoint], at: DateTime<Utc>) -> Option<usize> {
    if points.is_empty() {
        return None;
    }

    let idx = points.partition_point(|p| p.timestamp < at);
    if idx == 0 {
        return Some(0);
    }
    if idx == points.len() {
        return Some(points.len() - 1);
    }

    let before = at - points[idx - 1].timestamp;
    let after = points[idx].timestamp - at;
    Some(if after < before { idx } else { idx - 1 })
}

/// Tooltip for the point nearest to `at`
pub fn tooltip_at(series: &Series, raw_label: &str, at: DateTime<Utc>) -> Option<Tooltip> {
    let idx = nearest_index(&series.points, at)?;
    Some(Tooltip::for_point(&series.label, raw_label, &series.points[idx]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn points() -> Vec<TimeSeriesPoint> {
        vec![
            TimeSeriesPoint {
                timestamp: ymd(2021, 1, 1),
                derived_value: 14500.0,
                raw_value: 29000.0,
            },
            TimeSeriesPoint {
                timestamp: ymd(2022, 1, 1),
                derived_value: 23500.0,
                raw_value: 47000.0,
            },
        ]
    }

    #[test]
    fn test_nearest_index() {
        let pts = points();
        assert_eq!(nearest_index(&[], ymd(2021, 1, 1)), None);
        assert_eq!(nearest_index(&pts, ymd(2019, 5, 5)), Some(0));
        assert_eq!(nearest_index(&pts, ymd(2021, 3, 1)), Some(0));
        assert_eq!(nearest_index(&pts, ymd(2021, 11, 1)), Some(1));
        assert_eq!(nearest_index(&pts, ymd(2030, 1, 1)), Some(1));
        assert_eq!(nearest_index(&pts, ymd(2022, 1, 1)), Some(1));
    }

    #[test]
    fn test_tooltip_contents() {
        let series = Series {
            label: "Holdings value".to_string(),
            color: "#f2a900".to_string(),
            points: points(),
        };

        let tooltip = tooltip_at(&series, "Bitcoin price", ymd(2021, 2, 1)).unwrap();
        assert_eq!(tooltip.title, "01/01/2021");
        assert_eq!(
            tooltip.lines,
            vec!["Holdings value: $14,500.00", "Bitcoin price: $29,000.00"]
        );
        assert_eq!(
            tooltip.to_string(),
            "01/01/2021\nHoldings value: $14,500.00\nBitcoin price: $29,000.00"
        );
    }
}
