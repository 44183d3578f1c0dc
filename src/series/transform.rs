//! Result set → series transform
//!
//! Pure: no I/O, no hidden state. Rows are emitted in input order, which is
//! chronological because the fixed query orders by timestamp.

use crate::engine::ResultSet;
use crate::series::{Series, SeriesStyle, TimeSeriesPoint};
use chrono::DateTime;

/// Transform with the default label and colour
pub fn transform(result: Option<&ResultSet>, multiplier: f64) -> Series {
    transform_styled(result, multiplier, &SeriesStyle::default())
}

/// Transform a `(timestamp, price)` result into a derived series
///
/// A missing or empty result yields an empty series.
pub fn transform_styled(result: Option<&ResultSet>, multiplier: f64, style: &SeriesStyle) -> Series {
    let mut series = Series::empty(style);

    let Some(result) = result else {
        return series;
    };

    series.points = result
        .price_rows()
        .filter_map(|row| {
            // `price_rows` only yields timestamps chrono can represent.
            let timestamp = DateTime::from_timestamp(row.timestamp, 0)?;
            Some(TimeSeriesPoint {
                timestamp,
                derived_value: multiplier * row.price,
                raw_value: row.price,
            })
        })
        .collect();

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Value;
    use chrono::{TimeZone, Utc};

    fn scenario_result() -> ResultSet {
        ResultSet::new(
            vec!["date".to_string(), "price".to_string()],
            vec![
                vec![Value::Integer(1609459200), Value::Real(29000.0)],
                vec![Value::Integer(1640995200), Value::Real(47000.0)],
            ],
        )
    }

    #[test]
    fn test_scenario_unit_multiplier() {
        let series = transform(Some(&scenario_result()), 1.0);

        assert_eq!(
            series.points,
            vec![
                TimeSeriesPoint {
                    timestamp: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
                    derived_value: 29000.0,
                    raw_value: 29000.0,
                },
                TimeSeriesPoint {
                    timestamp: Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
                    derived_value: 47000.0,
                    raw_value: 47000.0,
                },
            ]
        );
    }

    #[test]
    fn test_scenario_half_multiplier() {
        let series = transform(Some(&scenario_result()), 0.5);

        let derived: Vec<f64> = series.points.iter().map(|p| p.derived_value).collect();
        let raw: Vec<f64> = series.points.iter().map(|p| p.raw_value).collect();
        assert_eq!(derived, vec![14500.0, 23500.0]);
        assert_eq!(raw, vec![29000.0, 47000.0]);
    }

    #[test]
    fn test_missing_and_empty_results() {
        for m in [0.0, 1.0, 0.12345678, 1e6] {
            assert!(transform(None, m).is_empty());
            assert!(transform(Some(&ResultSet::default()), m).is_empty());
        }
    }

    #[test]
    fn test_derived_matches_row_order() {
        let rows: Vec<Vec<Value>> = (0..500)
            .map(|i| vec![Value::Integer(1_400_000_000 + i * 86_400), Value::Real(100.0 + i as f64 * 1.37)])
            .collect();
        let result = ResultSet::new(vec!["date".into(), "price".into()], rows);

        for m in [0.0, 0.5, 2.12345679, 21.0] {
            let series = transform(Some(&result), m);
            assert_eq!(series.len(), result.row_count());
            for (point, row) in series.points.iter().zip(result.price_rows()) {
                assert_eq!(point.timestamp.timestamp(), row.timestamp);
                assert_eq!(point.raw_value, row.price);
                assert_eq!(point.derived_value, m * row.price);
            }
        }
    }

    #[test]
    fn test_transform_is_idempotent() {
        let result = scenario_result();
        assert_eq!(transform(Some(&result), 0.3), transform(Some(&result), 0.3));
    }

    #[test]
    fn test_style_is_applied() {
        let style = SeriesStyle {
            label: "Portfolio".to_string(),
            color: "#123456".to_string(),
        };
        let series = transform_styled(Some(&scenario_result()), 1.0, &style);
        assert_eq!(series.label, "Portfolio");
        assert_eq!(series.color, "#123456");
    }
}
