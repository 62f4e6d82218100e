use crate::config::EmbeddingsConfig;
use crate::errors::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Converts a batch of texts into fixed-dimension vectors.
///
/// Implementations must preserve order (input `i` maps to output `i`) and
/// return exactly one vector per input, or fail as a whole. Callers never
/// see partial success.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    inputs: &'a [String],
    parameters: EmbedParameters,
}

#[derive(Serialize)]
struct EmbedParameters {
    input_type: &'static str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedVector>,
}

#[derive(Deserialize)]
struct EmbedVector {
    values: Vec<f32>,
}

/// Remote embedding service client. One HTTP call per batch, no caching.
pub struct CloudEmbedder {
    client: reqwest::Client,
    config: EmbeddingsConfig,
}

impl CloudEmbedder {
    pub fn new(config: EmbeddingsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Embedder for CloudEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        let payload = EmbedRequest {
            model: &self.config.model,
            inputs: &texts,
            parameters: EmbedParameters {
                input_type: "passage",
            },
        };

        let res = self
            .client
            .post(&self.config.api_url)
            .header("Api-Key", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Embedding(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "service returned {status}: {body}"
            )));
        }

        let body: EmbedResponse = res
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("invalid response: {e}")))?;

        if body.data.len() != texts.len() {
            return Err(AppError::Embedding(format!(
                "expected {} vectors, got {}",
                texts.len(),
                body.data.len()
            )));
        }

        Ok(body.data.into_iter().map(|item| item.values).collect())
    }
}

/// Deterministic stand-in for local development and tests; selected when
/// the embeddings API key is the literal "mock".
pub struct MockEmbedder {
    dim: usize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Seeds the vector from the text so different inputs get different
    /// (but stable) embeddings.
    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut seed: u32 = 2166136261;
        for byte in text.bytes() {
            seed ^= u32::from(byte);
            seed = seed.wrapping_mul(16777619);
        }
        (0..self.dim)
            .map(|i| {
                seed = seed.wrapping_mul(1664525).wrapping_add(1013904223 + i as u32);
                (seed >> 8) as f32 / (1u32 << 24) as f32
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }
}
