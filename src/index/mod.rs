//! Vector index adapter.
//!
//! The store is external and content-addressable: entries carry their text
//! and source URL in metadata, and all filters are exact-match equality on
//! those fields.

mod pinecone;

pub use pinecone::PineconeIndex;

use crate::errors::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable hash of a URL, used as the cheap existence-check key. Distinct
/// from the raw URL string, which remains the filter for delete and query.
pub fn url_fingerprint(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// Metadata stored with every vector entry. `url_hash` is always derived
/// from `url`; the two must never disagree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryMetadata {
    pub text: String,
    pub url: String,
    pub url_hash: String,
}

/// The stored unit: opaque unique id, embedding, metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VectorEntry {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: EntryMetadata,
}

/// A ranked match returned by a similarity query.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Option<EntryMetadata>,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Existence probe: does any entry carry this URL fingerprint? Issued
    /// as a filter-only query; ranking of the probe result is meaningless
    /// and ignored.
    async fn contains_fingerprint(&self, fingerprint: &str) -> Result<bool, AppError>;

    /// Removes every entry whose metadata URL matches exactly. Idempotent
    /// when nothing matches.
    async fn delete_by_url(&self, url: &str) -> Result<(), AppError>;

    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<(), AppError>;

    /// Top-`top_k` similarity query restricted to entries of `url`, with
    /// metadata included, in the store's descending relevance order.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        url: &str,
    ) -> Result<Vec<ScoredMatch>, AppError>;
}
