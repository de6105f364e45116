//! Shared types and the error taxonomy for the retrieval core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============= Chunk Types =============

/// Typed metadata record stored alongside each indexed vector.
///
/// The record keeps the chunk text itself so deletion can re-embed from
/// canonical source. Persisted as one JSON object per line, in strict
/// positional correspondence with the index snapshot: the record at line
/// `i` describes the vector at position `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// The chunk text.
    pub text: String,
    /// Identifier of the originating file.
    pub source_file: String,
    /// Zero-based position of the chunk within its document.
    pub chunk_index: usize,
    /// Starting character offset in the document.
    pub start: usize,
    /// Ending character offset (exclusive).
    pub end: usize,
    /// 1-based page the chunk starts on, when page boundaries are known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

/// A search hit: chunk text, similarity score, and remaining metadata.
///
/// The chunk text is lifted out of the record into the top-level field;
/// `meta.text` is cleared so the payload is not duplicated.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    /// The chunk text.
    pub text: String,
    /// Cosine similarity against the query, in `[-1, 1]`.
    pub score: f32,
    /// Positional and source metadata for the chunk.
    pub meta: ChunkRecord,
}

// ============= Error Types =============

/// Errors surfaced by the retrieval core.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Bad chunking or runtime parameters, rejected before any work begins.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Embedding width inconsistent with the existing index.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Width of the existing index.
        expected: usize,
        /// Width of the offending vector.
        actual: usize,
    },

    /// I/O failure on load or persist. Fatal to the triggering request,
    /// never retried automatically.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Embedding provider failure.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Malformed caller input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for retrieval core operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

impl From<vera_index::Error> for RetrievalError {
    fn from(err: vera_index::Error) -> Self {
        match err {
            vera_index::Error::DimensionMismatch { expected, actual } => {
                RetrievalError::DimensionMismatch { expected, actual }
            }
            other => RetrievalError::Storage(other.to_string()),
        }
    }
}

impl From<std::io::Error> for RetrievalError {
    fn from(err: std::io::Error) -> Self {
        RetrievalError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_record_jsonl_roundtrip() {
        let record = ChunkRecord {
            text: "hello world".to_string(),
            source_file: "a.txt".to_string(),
            chunk_index: 0,
            start: 0,
            end: 11,
            page: Some(2),
        };

        let line = serde_json::to_string(&record).unwrap();
        let parsed: ChunkRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_page_omitted_when_absent() {
        let record = ChunkRecord {
            text: "x".to_string(),
            source_file: "a.txt".to_string(),
            chunk_index: 3,
            start: 21,
            end: 22,
            page: None,
        };

        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains("page"));

        let parsed: ChunkRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.page, None);
    }

    #[test]
    fn test_index_error_conversion() {
        let err: RetrievalError = vera_index::Error::DimensionMismatch {
            expected: 4,
            actual: 3,
        }
        .into();
        assert!(matches!(
            err,
            RetrievalError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }
}
