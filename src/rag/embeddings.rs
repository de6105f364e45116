//! Embedding providers.
//!
//! The retrieval core consumes embeddings through the
//! [`EmbeddingProvider`] trait and never computes them itself. The
//! shipped implementation talks to an OpenAI-compatible `/v1/embeddings`
//! endpoint; anything that maps text to fixed-width vectors can slot in.

use crate::types::{Result, RetrievalError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Maps text strings to fixed-width embedding vectors.
///
/// Implementations must be order-preserving (one vector per input, in
/// input order) and deterministic for identical input and model
/// configuration.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| RetrievalError::Embedding("provider returned no vector".to_string()))
    }
}

// ============= HTTP Implementation =============

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Deserialize)]
struct EmbeddingObject {
    index: usize,
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible embeddings endpoint.
///
/// Works against any server exposing `POST /v1/embeddings` with the
/// standard request/response shape (OpenAI, Ollama, vLLM, LocalAI).
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbedder {
    /// Create a client for the given endpoint and model.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let mut request = self.client.post(&url).json(&EmbeddingsRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("Embedding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Embedding(format!(
                "Embedding endpoint returned {}",
                status
            )));
        }

        let mut body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("Invalid embedding response: {}", e)))?;

        if body.data.len() != texts.len() {
            return Err(RetrievalError::Embedding(format!(
                "Expected {} vectors, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        // The endpoint may return items out of order; the index field is
        // authoritative.
        body.data.sort_by_key(|item| item.index);
        Ok(body.data.into_iter().map(|item| item.embedding).collect())
    }
}
