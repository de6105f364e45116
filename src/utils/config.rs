//! Environment-driven configuration.
//!
//! Every knob has a default suitable for local development; set the
//! corresponding variable (or a `.env` file) to override.

use crate::types::{Result, RetrievalError};
use std::env;
use std::path::PathBuf;

/// Snapshot file locations.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Binary index snapshot, `VERA_INDEX_PATH`.
    pub index_path: PathBuf,
    /// JSONL metadata file, `VERA_METADATA_PATH`.
    pub metadata_path: PathBuf,
}

/// Embedding service connection.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding API, `EMBEDDING_URL`.
    pub url: String,
    /// Model name sent with each request, `EMBEDDING_MODEL`.
    pub model: String,
    /// Optional bearer token, `EMBEDDING_API_KEY`.
    pub api_key: Option<String>,
}

/// Chunking and search parameters.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Characters per chunk, `CHUNK_SIZE`.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks, `CHUNK_OVERLAP`.
    pub chunk_overlap: usize,
    /// Default result count, `TOP_K`.
    pub top_k: usize,
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Read configuration from the environment, loading `.env` first if
    /// one exists. Fails only when a set variable does not parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            storage: StorageConfig {
                index_path: PathBuf::from(
                    env::var("VERA_INDEX_PATH")
                        .unwrap_or_else(|_| "data/vectors/index.bin".to_string()),
                ),
                metadata_path: PathBuf::from(
                    env::var("VERA_METADATA_PATH")
                        .unwrap_or_else(|_| "data/vectors/meta.jsonl".to_string()),
                ),
            },
            embedding: EmbeddingConfig {
                url: env::var("EMBEDDING_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                model: env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "nomic-embed-text".to_string()),
                api_key: env::var("EMBEDDING_API_KEY").ok(),
            },
            retrieval: RetrievalConfig {
                chunk_size: parse_env("CHUNK_SIZE", 400)?,
                chunk_overlap: parse_env("CHUNK_OVERLAP", 120)?,
                top_k: parse_env("TOP_K", 8)?,
            },
        })
    }
}

fn parse_env(key: &str, default: usize) -> Result<usize> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            RetrievalError::InvalidConfiguration(format!(
                "{} must be a non-negative integer, got '{}'",
                key, raw
            ))
        }),
        Err(_) => Ok(default),
    }
}
