//! End-to-end retrieval orchestration.
//!
//! Ties the chunker, embedding provider, and vector store together:
//! documents go in as raw text, queries come back as ranked chunks
//! ready for prompt assembly.

use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::EmbeddingProvider;
use crate::rag::store::VectorStore;
use crate::types::{Result, RetrievedChunk};
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates ingestion and querying over a shared [`VectorStore`].
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: TextChunker,
}

impl Retriever {
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            store,
            embedder,
            chunker,
        }
    }

    /// Chunk, embed, and index a document. Returns the number of chunks
    /// stored; an empty or whitespace-only document stores nothing.
    ///
    /// `page_lengths` optionally carries per-page character counts so
    /// chunks can be attributed to 1-based page numbers.
    pub async fn ingest_document(
        &self,
        text: &str,
        source_file: &str,
        page_lengths: Option<&[usize]>,
    ) -> Result<usize> {
        let records = self.chunker.split(text, source_file, page_lengths);
        if records.is_empty() {
            debug!(source_file, "Document produced no chunks, skipping");
            return Ok(0);
        }

        let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;

        let stored = records.len();
        self.store.add(vectors, records).await?;

        info!(source_file, chunks = stored, "Ingested document");
        Ok(stored)
    }

    /// Embed the query and return the `top_k` most similar chunks,
    /// best first.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let vector = self.embedder.embed_one(query).await?;
        let mut hits = self.store.search(&vector, top_k).await?;

        // The store already ranks, but keep the ordering contract local.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(top_k, hits = hits.len(), "Retrieved chunks for query");
        Ok(hits)
    }

    /// Drop every chunk ingested under `file_id`. Returns the number of
    /// removed chunks.
    pub async fn remove_document(&self, file_id: &str) -> Result<usize> {
        self.store.remove_by_source(file_id).await
    }
}

/// Render retrieved chunks as a numbered context block for prompting.
///
/// Each chunk becomes one line of the form
/// `[n] (file: <source>, page: <page|?>) <text>` with internal newlines
/// flattened to spaces. Numbering is 1-based in rank order.
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let page = chunk
                .meta
                .page
                .map_or_else(|| "?".to_string(), |p| p.to_string());
            let text = chunk
                .text
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "[{}] (file: {}, page: {}) {}",
                i + 1,
                chunk.meta.source_file,
                page,
                text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mean similarity score across a result set, 0.0 when empty.
pub fn average_similarity(chunks: &[RetrievedChunk]) -> f32 {
    if chunks.is_empty() {
        return 0.0;
    }
    chunks.iter().map(|c| c.score).sum::<f32>() / chunks.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HashEmbedder;
    use crate::types::ChunkRecord;
    use tempfile::TempDir;

    fn retriever(dir: &TempDir) -> Retriever {
        let embedder = Arc::new(HashEmbedder::new(8));
        let store = Arc::new(VectorStore::new(
            dir.path().join("index.bin"),
            dir.path().join("meta.jsonl"),
            embedder.clone(),
        ));
        Retriever::new(store, embedder, TextChunker::new(40, 10).unwrap())
    }

    fn chunk(text: &str, source: &str, score: f32, page: Option<usize>) -> RetrievedChunk {
        RetrievedChunk {
            text: text.to_string(),
            score,
            meta: ChunkRecord {
                text: String::new(),
                source_file: source.to_string(),
                chunk_index: 0,
                start: 0,
                end: text.chars().count(),
                page,
            },
        }
    }

    #[tokio::test]
    async fn test_ingest_and_retrieve() {
        let dir = TempDir::new().unwrap();
        let r = retriever(&dir);

        let stored = r
            .ingest_document(
                "The quick brown fox jumps over the lazy dog near the river bank.",
                "fox.txt",
                None,
            )
            .await
            .unwrap();
        assert!(stored >= 1);

        let hits = r.retrieve("quick brown fox", 3).await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.len() <= 3);
        assert_eq!(hits[0].meta.source_file, "fox.txt");
        // Ranked best first.
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_ingest_empty_document() {
        let dir = TempDir::new().unwrap();
        let r = retriever(&dir);
        assert_eq!(r.ingest_document("", "empty.txt", None).await.unwrap(), 0);
        assert!(r.retrieve("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_document_via_retriever() {
        let dir = TempDir::new().unwrap();
        let r = retriever(&dir);

        r.ingest_document("Chunked content about volcanoes and ash clouds.", "v.txt", None)
            .await
            .unwrap();
        let removed = r.remove_document("v.txt").await.unwrap();
        assert!(removed >= 1);
        assert!(r.retrieve("volcanoes", 5).await.unwrap().is_empty());
    }

    #[test]
    fn test_build_context_format() {
        let chunks = vec![
            chunk("line one\nwrapped", "a.txt", 0.9, Some(2)),
            chunk("  second  ", "b.txt", 0.5, None),
        ];
        let context = build_context(&chunks);
        assert_eq!(
            context,
            "[1] (file: a.txt, page: 2) line one wrapped\n[2] (file: b.txt, page: ?) second"
        );
    }

    #[test]
    fn test_build_context_empty() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_average_similarity() {
        assert_eq!(average_similarity(&[]), 0.0);
        let chunks = vec![
            chunk("a", "a.txt", 0.8, None),
            chunk("b", "a.txt", 0.4, None),
        ];
        assert!((average_similarity(&chunks) - 0.6).abs() < 0.0001);
    }
}
