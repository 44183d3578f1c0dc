//! Query result types

use crate::engine::{EngineError, EngineResult};
use chrono::DateTime;
use rusqlite::types::ValueRef;
use serde::Serialize;

/// A scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value (integers widen to f64)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Integer view of the value (whole reals narrow to i64)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(r) if r.fract() == 0.0 && r.is_finite() => Some(*r as i64),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                Value::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

/// Columns in projection order plus positionally aligned rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// One `(timestamp, price)` row of the fixed price query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    /// Unix seconds
    pub timestamp: i64,
    pub price: f64,
}

impl PriceRow {
    fn from_values(values: &[Value]) -> Option<Self> {
        let timestamp = values.first()?.as_i64()?;
        DateTime::from_timestamp(timestamp, 0)?;
        let price = values.get(1)?.as_f64()?;
        Some(Self { timestamp, price })
    }
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows that match the `(timestamp, price)` projection
    pub fn price_rows(&self) -> impl Iterator<Item = PriceRow> + '_ {
        self.rows.iter().filter_map(|row| PriceRow::from_values(row))
    }

    /// Check the result against the price query contract
    ///
    /// Position 0 must be an integer Unix timestamp that maps to a calendar
    /// date, position 1 a number.
    pub fn validate_price_projection(&self) -> EngineResult<()> {
        if self.columns.len() < 2 {
            return Err(EngineError::QueryExec(format!(
                "expected (timestamp, price) projection, got {} column(s)",
                self.columns.len()
            )));
        }

        for (idx, row) in self.rows.iter().enumerate() {
            if PriceRow::from_values(row).is_none() {
                return Err(EngineError::QueryExec(format!(
                    "row {} is not a (timestamp, price) pair: {:?}",
                    idx, row
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_result(rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet::new(vec!["date".to_string(), "price".to_string()], rows)
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Real(2.0).as_i64(), Some(2));
        assert_eq!(Value::Real(2.5).as_i64(), None);
        assert_eq!(Value::Text("1".into()).as_f64(), None);
        assert_eq!(Value::Null.as_i64(), None);
    }

    #[test]
    fn test_price_rows_accepts_integer_prices() {
        let result = price_result(vec![
            vec![Value::Integer(1609459200), Value::Integer(29000)],
            vec![Value::Integer(1640995200), Value::Real(47000.5)],
        ]);

        let rows: Vec<_> = result.price_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price, 29000.0);
        assert_eq!(rows[1].timestamp, 1640995200);
        assert!(result.validate_price_projection().is_ok());
    }

    #[test]
    fn test_validation_rejects_text_price() {
        let result = price_result(vec![vec![Value::Integer(1), Value::Text("n/a".into())]]);
        assert!(matches!(
            result.validate_price_projection(),
            Err(EngineError::QueryExec(_))
        ));
    }

    #[test]
    fn test_validation_rejects_unrepresentable_timestamp() {
        let result = price_result(vec![
            vec![Value::Integer(1609459200), Value::Real(29000.0)],
            vec![Value::Integer(i64::MAX), Value::Real(47000.0)],
        ]);
        assert!(matches!(
            result.validate_price_projection(),
            Err(EngineError::QueryExec(_))
        ));
        assert_eq!(result.price_rows().count(), 1);
    }

    #[test]
    fn test_validation_rejects_single_column() {
        let result = ResultSet::new(vec!["date".to_string()], vec![]);
        assert!(result.validate_price_projection().is_err());
    }

    #[test]
    fn test_empty_result_is_valid() {
        assert!(price_result(vec![]).validate_price_projection().is_ok());
    }
}
