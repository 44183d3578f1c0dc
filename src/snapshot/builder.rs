//! Snapshot packaging
//!
//! Builds the read-only price database that the pipeline later loads. Rows
//! are kept ordered by timestamp so the fixed query's ascending order holds
//! even when the source file is unordered. A repeated timestamp keeps the
//! last price seen.

use crate::snapshot::{BinarySnapshot, SnapshotError, SnapshotResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, DatabaseName};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Default table holding the price history
pub const DEFAULT_TABLE: &str = "prices";
/// Default Unix-epoch timestamp column
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "date";
/// Default price column
pub const DEFAULT_PRICE_COLUMN: &str = "price";

/// Calendar formats accepted in the CSV date column
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"];

/// Accumulates price rows and packages them as a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    table: String,
    timestamp_column: String,
    price_column: String,
    rows: BTreeMap<i64, f64>,
}

/// Outcome of a CSV import
#[derive(Debug, Default)]
pub struct CsvImportReport {
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
            rows: BTreeMap::new(),
        }
    }

    /// Set the table name
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    /// Set the timestamp and price column names
    pub fn with_columns(mut self, timestamp_column: &str, price_column: &str) -> Self {
        self.timestamp_column = timestamp_column.to_string();
        self.price_column = price_column.to_string();
        self
    }

    /// Builder method: add a row
    pub fn row(mut self, unix_seconds: i64, price: f64) -> Self {
        self.push(unix_seconds, price);
        self
    }

    pub fn push(&mut self, unix_seconds: i64, price: f64) {
        self.rows.insert(unix_seconds, price);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Import rows from CSV with a header row
    ///
    /// `date_column` and `price_column` name the header fields to read.
    pub fn import_csv<R: Read>(
        &mut self,
        reader: R,
        date_column: &str,
        price_column: &str,
    ) -> SnapshotResult<CsvImportReport> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| SnapshotError::MissingColumn(name.to_string()))
        };
        let date_idx = find(date_column)?;
        let price_idx = find(price_column)?;

        let mut report = CsvImportReport::default();

        for (line, record) in csv_reader.records().enumerate() {
            report.rows_processed += 1;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    report.rows_failed += 1;
                    report.errors.push(format!("row {}: {}", line + 1, e));
                    continue;
                }
            };

            let date = record.get(date_idx).unwrap_or_default();
            let price = record.get(price_idx).unwrap_or_default();

            match (parse_timestamp(date), price.parse::<f64>()) {
                (Some(ts), Ok(p)) if p.is_finite() => self.push(ts, p),
                (None, _) => {
                    report.rows_failed += 1;
                    report
                        .errors
                        .push(format!("row {}: could not parse date {:?}", line + 1, date));
                }
                _ => {
                    report.rows_failed += 1;
                    report
                        .errors
                        .push(format!("row {}: could not parse price {:?}", line + 1, price));
                }
            }
        }

        tracing::info!(
            processed = report.rows_processed,
            failed = report.rows_failed,
            "CSV import finished"
        );

        Ok(report)
    }

    /// Serialize the rows into an in-memory database image
    pub fn build(&self) -> SnapshotResult<BinarySnapshot> {
        let mut conn = Connection::open_in_memory()?;
        self.populate(&mut conn)?;
        let data = conn.serialize(DatabaseName::Main)?;
        Ok(BinarySnapshot::new(data.to_vec()))
    }

    /// Write the database image to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> SnapshotResult<BinarySnapshot> {
        let snapshot = self.build()?;
        std::fs::write(path, snapshot.as_bytes()).map_err(|e| SnapshotError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!(path = ?path, rows = self.rows.len(), "Wrote snapshot");
        Ok(snapshot)
    }

    fn populate(&self, conn: &mut Connection) -> rusqlite::Result<()> {
        let table = quote_ident(&self.table);
        let ts_col = quote_ident(&self.timestamp_column);
        let price_col = quote_ident(&self.price_column);

        conn.execute(
            &format!(
                "CREATE TABLE {} ({} INTEGER NOT NULL PRIMARY KEY, {} REAL NOT NULL)",
                table, ts_col, price_col
            ),
            [],
        )?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}, {}) VALUES (?, ?)",
                table, ts_col, price_col
            ))?;
            for (ts, price) in &self.rows {
                stmt.execute(params![ts, price])?;
            }
        }
        tx.commit()
    }
}

/// Quote an SQL identifier
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Parse a CSV date cell into Unix seconds (UTC, midnight for plain dates)
pub fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(ts) = s.parse::<i64>() {
        return Some(ts);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp())
}
