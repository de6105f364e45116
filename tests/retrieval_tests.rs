//! End-to-end retrieval flows against a temporary on-disk store.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tempfile::TempDir;
use vera::{
    build_context, ChunkRecord, EmbeddingProvider, Result, Retriever, TextChunker, VectorStore,
};

/// Deterministic stand-in for the embedding service: hashes each text
/// into a fixed-width vector, so identical texts match exactly.
struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    fn vector(&self, text: &str) -> Vec<f32> {
        (0..self.dimensions)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                (text, i).hash(&mut hasher);
                (hasher.finish() % 1000) as f32 / 1000.0 - 0.5
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

fn store(dir: &TempDir) -> Arc<VectorStore> {
    Arc::new(VectorStore::new(
        dir.path().join("index.bin"),
        dir.path().join("meta.jsonl"),
        Arc::new(HashEmbedder { dimensions: 16 }),
    ))
}

fn retriever(store: Arc<VectorStore>) -> Retriever {
    Retriever::new(
        store,
        Arc::new(HashEmbedder { dimensions: 16 }),
        TextChunker::new(50, 10).unwrap(),
    )
}

fn record(text: &str, source_file: &str, chunk_index: usize) -> ChunkRecord {
    ChunkRecord {
        text: text.to_string(),
        source_file: source_file.to_string(),
        chunk_index,
        start: 0,
        end: text.chars().count(),
        page: None,
    }
}

#[tokio::test]
async fn remove_source_rebuilds_and_keeps_survivors() {
    let dir = TempDir::new().unwrap();
    let embedder = HashEmbedder { dimensions: 4 };

    // Three 4-dimensional vectors across two source files.
    let store4 = Arc::new(VectorStore::new(
        dir.path().join("index.bin"),
        dir.path().join("meta.jsonl"),
        Arc::new(HashEmbedder { dimensions: 4 }),
    ));
    let texts = ["a first", "a second", "b only"];
    store4
        .add(
            texts.iter().map(|t| embedder.vector(t)).collect(),
            vec![
                record("a first", "a.txt", 0),
                record("a second", "a.txt", 1),
                record("b only", "b.txt", 0),
            ],
        )
        .await
        .unwrap();

    let removed = store4.remove_by_source("a.txt").await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store4.len().await, 1);

    let hits = store4.search(&embedder.vector("b only"), 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].meta.source_file, "b.txt");
    assert!((hits[0].score - 1.0).abs() < 0.0001);
}

#[tokio::test]
async fn ingest_retrieve_remove_full_flow() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let r = retriever(store.clone());

    let text = "Rust guarantees memory safety without a garbage collector. \
                Ownership and borrowing are checked at compile time. \
                The result is fast and reliable systems software.";
    let stored = r.ingest_document(text, "rust.txt", None).await.unwrap();
    assert!(stored > 1);
    assert_eq!(store.len().await, stored);

    let hits = r.retrieve("memory safety", 3).await.unwrap();
    assert!(!hits.is_empty());
    let context = build_context(&hits);
    assert!(context.starts_with("[1] (file: rust.txt"));

    let removed = r.remove_document("rust.txt").await.unwrap();
    assert_eq!(removed, stored);
    assert!(store.is_empty().await);
    assert!(r.retrieve("memory safety", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn store_survives_restart() {
    let dir = TempDir::new().unwrap();

    let stored = {
        let store = store(&dir);
        let r = retriever(store.clone());
        r.ingest_document(
            "Persistent state must come back exactly as it was written.",
            "persist.txt",
            None,
        )
        .await
        .unwrap()
    };

    let reopened = store(&dir);
    reopened.load().await.unwrap();
    assert_eq!(reopened.len().await, stored);

    let r = retriever(reopened);
    let hits = r.retrieve("persistent state", 5).await.unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].meta.source_file, "persist.txt");
}

#[tokio::test]
async fn page_attribution_flows_to_results() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let r = retriever(store);

    let text = "x".repeat(120);
    // Two 60-character pages.
    r.ingest_document(&text, "paged.txt", Some(&[60, 60]))
        .await
        .unwrap();

    let hits = r.retrieve("anything", 10).await.unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.meta.page.is_some()));
    assert!(hits.iter().any(|h| h.meta.page == Some(1)));
}
