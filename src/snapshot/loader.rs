//! Snapshot loading
//!
//! Obtains the snapshot bytes and hands them to the query engine as an
//! immutable, cheaply cloneable buffer.

use crate::snapshot::{SnapshotError, SnapshotResult};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Immutable serialized database image
#[derive(Clone, PartialEq, Eq)]
pub struct BinarySnapshot {
    bytes: Arc<[u8]>,
}

impl BinarySnapshot {
    /// Wrap raw bytes
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for BinarySnapshot {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for BinarySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinarySnapshot")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Reads snapshots from disk
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Read a snapshot file
    ///
    /// A missing file is not an error: it yields `None`, which the pipeline
    /// treats as "snapshot unavailable" and renders an empty chart for.
    pub async fn from_path(path: &Path) -> SnapshotResult<Option<BinarySnapshot>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                tracing::debug!(path = ?path, bytes = bytes.len(), "Read snapshot");
                Ok(Some(BinarySnapshot::from(bytes)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = ?path, "Snapshot file not found");
                Ok(None)
            }
            Err(e) => Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}
