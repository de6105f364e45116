//! Deterministic embedding fakes shared across unit tests.

use crate::rag::embeddings::EmbeddingProvider;
use crate::types::{Result, RetrievalError};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hashes each text into a fixed-width pseudo-embedding. Identical
/// texts always map to identical vectors, so exact-match queries score
/// 1.0 after normalization.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn embed_blocking(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts
            .iter()
            .map(|text| {
                (0..self.dimensions)
                    .map(|i| {
                        let mut hasher = DefaultHasher::new();
                        (text, i).hash(&mut hasher);
                        (hasher.finish() % 1000) as f32 / 1000.0 - 0.5
                    })
                    .collect()
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.embed_blocking(texts))
    }
}

/// Always fails, for exercising provider-error paths.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(RetrievalError::Embedding(
            "Provider unavailable".to_string(),
        ))
    }
}
