//! # VERA
//!
//! Vector Enhanced Retrieval for Answers: a semantic retrieval core
//! that chunks documents, embeds the chunks through an HTTP embedding
//! service, and serves cosine-similarity search over a persistent flat
//! vector index.
//!
//! ## Architecture
//!
//! - [`rag::chunker`] — sliding-window text chunking with character
//!   offsets and optional page attribution
//! - [`rag::embeddings`] — the [`EmbeddingProvider`] seam and its HTTP
//!   implementation
//! - [`rag::store`] — the mutable vector store: flat index plus
//!   parallel JSONL metadata, rebuild-on-delete
//! - [`rag::pipeline`] — the [`Retriever`] orchestrator and context
//!   assembly helpers
//! - [`utils::config`] — environment-driven configuration
//!
//! The exact-scan index itself lives in the `vera-index` crate.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use vera::{HttpEmbedder, Retriever, TextChunker, VectorStore};
//!
//! let embedder = Arc::new(HttpEmbedder::new(
//!     "http://localhost:11434",
//!     "nomic-embed-text",
//!     None,
//! ));
//! let store = Arc::new(VectorStore::new(
//!     "data/index.bin".into(),
//!     "data/meta.jsonl".into(),
//!     embedder.clone(),
//! ));
//! store.load().await?;
//!
//! let retriever = Retriever::new(store, embedder, TextChunker::new(400, 120)?);
//! retriever.ingest_document("...", "notes.txt", None).await?;
//! let hits = retriever.retrieve("what did the notes say?", 8).await?;
//! ```

#![warn(clippy::all)]

pub mod rag;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use rag::chunker::TextChunker;
pub use rag::embeddings::{EmbeddingProvider, HttpEmbedder};
pub use rag::pipeline::{average_similarity, build_context, Retriever};
pub use rag::store::VectorStore;
pub use types::{ChunkRecord, Result, RetrievalError, RetrievedChunk};
