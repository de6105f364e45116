//! Snapshot persistence for the flat index.
//!
//! Snapshots are written as a single `postcard`-encoded binary blob:
//! the vector width followed by the row data in insertion order.

use crate::error::{Error, Result};
use crate::index::FlatIndex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// On-disk representation of an index snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct IndexSnapshot {
    dimensions: usize,
    data: Vec<f32>,
}

/// Save an index snapshot to `path`, creating parent directories as needed.
pub async fn save_index(path: &Path, index: &FlatIndex) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let snapshot = IndexSnapshot {
        dimensions: index.dimensions(),
        data: index.data().to_vec(),
    };
    let encoded = postcard::to_allocvec(&snapshot)
        .map_err(|e| Error::Persistence(format!("Failed to serialize index: {}", e)))?;
    tokio::fs::write(path, encoded).await?;

    debug!(path = %path.display(), vectors = index.len(), "Saved index snapshot");
    Ok(())
}

/// Load an index snapshot from `path`.
///
/// # Errors
///
/// Returns [`Error::Persistence`] when the snapshot is corrupt or
/// truncated, and [`Error::Io`] when the file cannot be read.
pub async fn load_index(path: &Path) -> Result<FlatIndex> {
    let encoded = tokio::fs::read(path).await?;
    let snapshot: IndexSnapshot = postcard::from_bytes(&encoded)
        .map_err(|e| Error::Persistence(format!("Failed to parse index snapshot: {}", e)))?;

    let index = FlatIndex::from_parts(snapshot.dimensions, snapshot.data)
        .map_err(|e| Error::Persistence(format!("Inconsistent index snapshot: {}", e)))?;

    info!(
        path = %path.display(),
        vectors = index.len(),
        dimensions = index.dimensions(),
        "Loaded index snapshot"
    );
    Ok(index)
}
