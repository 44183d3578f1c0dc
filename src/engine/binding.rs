//! SQLite engine instance
//!
//! The snapshot image is copied into SQLite-owned memory and attached as the
//! read-only `main` schema of an in-memory connection. SQLite frees that
//! memory when the connection closes, so dropping a `QueryEngine` releases
//! everything it allocated.

use crate::engine::{EngineError, EngineResult, ResultSet, Value};
use crate::snapshot::builder::quote_ident;
use crate::snapshot::{BinarySnapshot, DEFAULT_PRICE_COLUMN, DEFAULT_TABLE, DEFAULT_TIMESTAMP_COLUMN};
use rusqlite::serialize::OwnedData;
use rusqlite::{ffi, Connection, DatabaseName, OpenFlags};
use std::ptr::NonNull;

/// The fixed price query against the default snapshot layout
pub const DEFAULT_QUERY: &str = "SELECT \"date\", \"price\" FROM \"prices\" ORDER BY \"date\" ASC;";

/// Build the fixed price query for a custom table layout
pub fn price_query(table: &str, timestamp_column: &str, price_column: &str) -> String {
    if table == DEFAULT_TABLE
        && timestamp_column == DEFAULT_TIMESTAMP_COLUMN
        && price_column == DEFAULT_PRICE_COLUMN
    {
        return DEFAULT_QUERY.to_string();
    }

    let ts = quote_ident(timestamp_column);
    format!(
        "SELECT {}, {} FROM {} ORDER BY {} ASC;",
        ts,
        quote_ident(price_column),
        quote_ident(table),
        ts
    )
}

/// A loaded, read-only snapshot ready for queries
pub struct QueryEngine {
    conn: Connection,
    snapshot_len: usize,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("snapshot_len", &self.snapshot_len)
            .finish()
    }
}

impl QueryEngine {
    /// Instantiate an engine from snapshot bytes
    ///
    /// Missing or empty bytes yield `Ok(None)`. Bytes that SQLite cannot read
    /// as a database fail with [`EngineError::Init`].
    pub fn load(snapshot: Option<&BinarySnapshot>) -> EngineResult<Option<Self>> {
        let snapshot = match snapshot {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(None),
        };

        let mut conn = Connection::open_with_flags(
            ":memory:",
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| EngineError::Init(e.to_string()))?;

        let data = copy_to_sqlite_memory(snapshot.as_bytes())?;
        conn.deserialize(DatabaseName::Main, data, true)
            .map_err(|e| EngineError::Init(e.to_string()))?;

        // Deserialize does not look at the header; the first read does.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| EngineError::Init(e.to_string()))?;

        tracing::debug!(bytes = snapshot.len(), "Query engine loaded");

        Ok(Some(Self {
            conn,
            snapshot_len: snapshot.len(),
        }))
    }

    /// Size of the snapshot this engine was built from
    pub fn snapshot_len(&self) -> usize {
        self.snapshot_len
    }

    /// Execute a query and collect the full result
    pub fn execute(&self, sql: &str) -> EngineResult<ResultSet> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| EngineError::QueryExec(e.to_string()))?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt
            .query([])
            .map_err(|e| EngineError::QueryExec(e.to_string()))?;

        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| EngineError::QueryExec(e.to_string()))?
        {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| EngineError::QueryExec(e.to_string()))?;
                values.push(Value::from(value));
            }
            out.push(values);
        }

        tracing::debug!(rows = out.len(), columns = width, "Query executed");

        Ok(ResultSet::new(columns, out))
    }
}

/// Copy bytes into a buffer allocated by SQLite so it can take ownership
fn copy_to_sqlite_memory(bytes: &[u8]) -> EngineResult<OwnedData> {
    let len = bytes.len();
    // SAFETY: sqlite3_malloc64 returns either null or a writable block of
    // `len` bytes; null is rejected below.
    let ptr = unsafe { ffi::sqlite3_malloc64(len as ffi::sqlite3_uint64) } as *mut u8;
    let ptr = NonNull::new(ptr)
        .ok_or_else(|| EngineError::Init(format!("failed to allocate {} bytes", len)))?;

    // SAFETY: `ptr` points to `len` freshly allocated bytes that do not
    // overlap `bytes`; OwnedData frees them with sqlite3_free.
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), len);
        Ok(OwnedData::from_raw_nonnull(ptr, len))
    }
}
