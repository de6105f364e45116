//! Mutable vector index store with parallel metadata.
//!
//! Wraps a [`FlatIndex`] and a parallel list of [`ChunkRecord`]s behind a
//! single read-write lock. The record at position `i` always describes
//! the vector at position `i`. The index has no native point deletion:
//! removing a source file re-embeds the surviving chunk texts and
//! rebuilds the index from scratch, which also guards against silent
//! drift if the embedding model changed between runs.

use crate::rag::embeddings::EmbeddingProvider;
use crate::types::{ChunkRecord, Result, RetrievalError, RetrievedChunk};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vera_index::FlatIndex;

struct StoreState {
    index: Option<FlatIndex>,
    metadata: Vec<ChunkRecord>,
}

/// Vector index plus parallel metadata with durable persistence.
///
/// All mutations (`add`, `remove_by_source`) hold the write guard for
/// their full duration, including re-embedding and disk I/O, so two
/// mutations can never interleave and readers never observe partial
/// state. `search` takes the read guard and may run concurrently with
/// other reads.
pub struct VectorStore {
    index_path: PathBuf,
    metadata_path: PathBuf,
    embedder: Arc<dyn EmbeddingProvider>,
    state: RwLock<StoreState>,
}

impl VectorStore {
    /// Create an empty store backed by the given snapshot paths.
    ///
    /// The embedding provider is needed for rebuild-on-delete. Call
    /// [`load`](Self::load) to restore a previous snapshot.
    pub fn new(
        index_path: PathBuf,
        metadata_path: PathBuf,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            index_path,
            metadata_path,
            embedder,
            state: RwLock::new(StoreState {
                index: None,
                metadata: Vec::new(),
            }),
        }
    }

    /// Load index and metadata from disk if present.
    ///
    /// A missing snapshot leaves the store empty. Malformed persisted
    /// state (corrupt snapshot, unparseable metadata, or a length
    /// divergence between the two) is logged and treated as an empty
    /// store: availability over strict fidelity after corruption.
    pub async fn load(&self) -> Result<()> {
        let mut state = self.state.write().await;

        if self.index_path.exists() {
            match vera_index::load_index(&self.index_path).await {
                Ok(index) => {
                    info!(vectors = index.len(), "Loaded vector index");
                    state.index = Some(index);
                }
                Err(vera_index::Error::Persistence(reason)) => {
                    warn!(reason = %reason, "Corrupt index snapshot, starting empty");
                    state.index = None;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if self.metadata_path.exists() {
            let raw = tokio::fs::read_to_string(&self.metadata_path).await?;
            match parse_metadata(&raw) {
                Ok(records) => {
                    info!(records = records.len(), "Loaded metadata records");
                    state.metadata = records;
                }
                Err(e) => {
                    warn!(error = %e, "Corrupt metadata file, starting empty");
                    state.index = None;
                    state.metadata.clear();
                }
            }
        }

        let vectors = state.index.as_ref().map_or(0, FlatIndex::len);
        if vectors != state.metadata.len() {
            warn!(
                vectors,
                records = state.metadata.len(),
                "Index/metadata length mismatch, starting empty"
            );
            state.index = None;
            state.metadata.clear();
        }

        Ok(())
    }

    /// Append vectors and their metadata records in lock-step, then
    /// persist.
    ///
    /// Vectors are normalized to unit length on insertion (zero vectors
    /// are stored as-is). The first non-empty batch fixes the index
    /// width; later batches must match or the call fails with
    /// [`RetrievalError::DimensionMismatch`] and the index is left
    /// unchanged. Empty input is a no-op.
    pub async fn add(&self, vectors: Vec<Vec<f32>>, records: Vec<ChunkRecord>) -> Result<()> {
        if vectors.is_empty() {
            return Ok(());
        }
        if vectors.len() != records.len() {
            return Err(RetrievalError::InvalidInput(format!(
                "Vector count ({}) does not match record count ({})",
                vectors.len(),
                records.len()
            )));
        }

        let mut state = self.state.write().await;

        if state.index.is_none() {
            let dimensions = vectors[0].len();
            info!(dimensions, "Creating new flat index");
            state.index = Some(FlatIndex::new(dimensions)?);
        }
        if let Some(index) = state.index.as_mut() {
            index.add(&vectors)?;
        }
        state.metadata.extend(records);

        debug!(
            added = vectors.len(),
            total = state.metadata.len(),
            "Added vectors to index"
        );
        self.persist_locked(&state).await
    }

    /// Return at most `top_k` records ranked by descending cosine
    /// similarity against `query`.
    ///
    /// The chunk text is stripped out of each record into the result's
    /// top-level `text` field. An empty or uninitialized store, or
    /// `top_k == 0`, yields an empty list.
    pub async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let state = self.state.read().await;

        let Some(index) = state.index.as_ref() else {
            return Ok(Vec::new());
        };
        if index.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let hits = index.search(query, top_k)?;
        let results: Vec<RetrievedChunk> = hits
            .into_iter()
            .filter_map(|(position, score)| {
                state.metadata.get(position).map(|record| {
                    let mut meta = record.clone();
                    let text = std::mem::take(&mut meta.text);
                    RetrievedChunk { text, score, meta }
                })
            })
            .collect();

        debug!(hits = results.len(), top_k, "Search completed");
        Ok(results)
    }

    /// Remove every record originating from `file_id`.
    ///
    /// Surviving chunk texts are re-embedded through the provider and
    /// the index rebuilt from the fresh vectors. Returns the number of
    /// removed records; 0 means nothing matched and nothing changed. If
    /// re-embedding yields no vectors the store resets to the empty
    /// state and its snapshot files are deleted. A provider failure
    /// aborts the rebuild with the previous in-memory and on-disk state
    /// intact.
    pub async fn remove_by_source(&self, file_id: &str) -> Result<usize> {
        let mut state = self.state.write().await;

        if state.metadata.is_empty() {
            return Ok(0);
        }

        let surviving: Vec<ChunkRecord> = state
            .metadata
            .iter()
            .filter(|record| record.source_file != file_id)
            .cloned()
            .collect();
        let removed = state.metadata.len() - surviving.len();
        if removed == 0 {
            return Ok(0);
        }

        info!(
            file_id,
            removed,
            surviving = surviving.len(),
            "Removing source and rebuilding index"
        );

        let texts: Vec<String> = surviving.iter().map(|r| r.text.clone()).collect();
        if texts.iter().all(String::is_empty) {
            self.clear_locked(&mut state).await?;
            return Ok(removed);
        }

        // Re-embed from canonical text rather than reusing stored rows,
        // so the rebuilt index reflects the current embedding model.
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.is_empty() {
            self.clear_locked(&mut state).await?;
            return Ok(removed);
        }

        let mut index = FlatIndex::new(vectors[0].len())?;
        index.add(&vectors)?;

        // Build and persist the replacement state fully before swapping
        // it in; a failure up to this point leaves the old state intact.
        let rebuilt = StoreState {
            index: Some(index),
            metadata: surviving,
        };
        self.persist_locked(&rebuilt).await?;
        *state = rebuilt;

        Ok(removed)
    }

    /// Number of indexed records.
    pub async fn len(&self) -> usize {
        self.state.read().await.metadata.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.metadata.is_empty()
    }

    /// The index width, once the first batch has fixed it.
    pub async fn dimensions(&self) -> Option<usize> {
        let state = self.state.read().await;
        state.index.as_ref().map(FlatIndex::dimensions)
    }

    async fn persist_locked(&self, state: &StoreState) -> Result<()> {
        let Some(index) = state.index.as_ref() else {
            return Ok(());
        };

        vera_index::save_index(&self.index_path, index).await?;

        if let Some(parent) = self.metadata_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut lines = String::new();
        for record in &state.metadata {
            let line = serde_json::to_string(record).map_err(|e| {
                RetrievalError::Storage(format!("Failed to serialize metadata record: {}", e))
            })?;
            lines.push_str(&line);
            lines.push('\n');
        }
        tokio::fs::write(&self.metadata_path, lines).await?;

        debug!(records = state.metadata.len(), "Persisted index and metadata");
        Ok(())
    }

    async fn clear_locked(&self, state: &mut StoreState) -> Result<()> {
        state.index = None;
        state.metadata.clear();

        if self.index_path.exists() {
            tokio::fs::remove_file(&self.index_path).await?;
        }
        if self.metadata_path.exists() {
            tokio::fs::remove_file(&self.metadata_path).await?;
        }

        info!("Cleared vector store");
        Ok(())
    }
}

fn parse_metadata(raw: &str) -> serde_json::Result<Vec<ChunkRecord>> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}
