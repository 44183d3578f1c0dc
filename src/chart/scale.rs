//! Axis scales
//!
//! `TimeScale` maps instants linearly onto the x range and buckets ticks by
//! calendar year (or month). `LogScale` maps strictly positive values onto
//! the y range with its domain snapped outward to whole decades.

use crate::chart::options::TimeUnit;
use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Continuous time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    left: f64,
    right: f64,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, left: f64, right: f64) -> Self {
        Self {
            start,
            end,
            left,
            right,
        }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Instant → x pixel; a single-instant domain maps to the centre
    pub fn map(&self, ts: DateTime<Utc>) -> f64 {
        let span = (self.end - self.start).num_seconds();
        if span == 0 {
            return (self.left + self.right) / 2.0;
        }
        let offset = (ts - self.start).num_seconds() as f64;
        self.left + offset / span as f64 * (self.right - self.left)
    }

    /// x pixel → instant, clamped to the domain
    pub fn invert(&self, x: f64) -> DateTime<Utc> {
        let width = self.right - self.left;
        if width <= 0.0 {
            return self.start;
        }
        let fraction = ((x - self.left) / width).clamp(0.0, 1.0);
        let span = (self.end - self.start).num_seconds() as f64;
        let secs = self.start.timestamp() + (fraction * span).round() as i64;
        DateTime::from_timestamp(secs, 0).unwrap_or(self.start)
    }

    /// Bucket boundaries inside the domain
    pub fn ticks(&self, unit: TimeUnit) -> Vec<DateTime<Utc>> {
        let mut ticks = Vec::new();
        let (mut year, mut month) = match unit {
            TimeUnit::Year => (self.start.year(), 1),
            TimeUnit::Month => (self.start.year(), self.start.month()),
        };

        while year <= self.end.year() {
            if let Some(tick) = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single() {
                if tick > self.end {
                    break;
                }
                if tick >= self.start {
                    ticks.push(tick);
                }
            }

            match unit {
                TimeUnit::Year => year += 1,
                TimeUnit::Month if month == 12 => {
                    year += 1;
                    month = 1;
                }
                TimeUnit::Month => month += 1,
            }
        }

        ticks
    }
}

/// Base-10 logarithmic value axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    min_exp: i32,
    max_exp: i32,
    top: f64,
    bottom: f64,
}

impl LogScale {
    /// Build from the smallest and largest positive data values
    ///
    /// Returns `None` when the bounds are not strictly positive and finite.
    pub fn new(min: f64, max: f64, top: f64, bottom: f64) -> Option<Self> {
        if !(min > 0.0 && max >= min && max.is_finite()) {
            return None;
        }

        let min_exp = min.log10().floor() as i32;
        let mut max_exp = max.log10().ceil() as i32;
        if max_exp <= min_exp {
            max_exp = min_exp + 1;
        }

        Some(Self {
            min_exp,
            max_exp,
            top,
            bottom,
        })
    }

    /// Snapped domain, e.g. `(10_000.0, 100_000.0)`
    pub fn domain(&self) -> (f64, f64) {
        (10f64.powi(self.min_exp), 10f64.powi(self.max_exp))
    }

    /// Value → y pixel; `None` for values a log axis cannot show
    pub fn map(&self, value: f64) -> Option<f64> {
        if !(value > 0.0 && value.is_finite()) {
            return None;
        }
        let span = (self.max_exp - self.min_exp) as f64;
        let fraction = (value.log10() - self.min_exp as f64) / span;
        Some(self.bottom - fraction * (self.bottom - self.top))
    }

    /// Ticks at 1, 2 and 5 times each power of ten in the domain
    pub fn ticks(&self) -> Vec<f64> {
        let mut ticks = Vec::new();
        for exp in self.min_exp..self.max_exp {
            let decade = 10f64.powi(exp);
            for mantissa in [1.0, 2.0, 5.0] {
                ticks.push(mantissa * decade);
            }
        }
        ticks.push(10f64.powi(self.max_exp));
        ticks
    }
}
