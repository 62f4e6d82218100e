//! Page indexing and scoped retrieval.
//!
//! The indexing path is a memoizing cache keyed by URL fingerprint: a URL
//! with at least one entry in the vector index skips the fetch/embed path
//! entirely and goes straight to query. Re-indexing is delete-then-insert,
//! so a page is represented by at most one coherent chunk set at a time.

use crate::chunker::Chunker;
use crate::embeddings::Embedder;
use crate::errors::AppError;
use crate::fetcher::PageFetcher;
use crate::html;
use crate::index::{url_fingerprint, EntryMetadata, VectorEntry, VectorIndex};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Matches returned per query, in the store's relevance order.
const TOP_K: usize = 10;

#[derive(Debug, Serialize)]
pub struct SearchMatch {
    pub content: String,
    pub relevance_score: f32,
    pub chunk_id: String,
}

pub struct SearchService {
    fetcher: Arc<dyn PageFetcher>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chunker: Chunker,
    /// Per-fingerprint gates so concurrent first-time requests for one URL
    /// coalesce into a single fetch/embed/upsert sequence.
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SearchService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        chunker: Chunker,
    ) -> Self {
        Self {
            fetcher,
            embedder,
            index,
            chunker,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Ensures `url` is indexed, then answers `query` against its chunks.
    pub async fn search(&self, url: &str, query: &str) -> Result<Vec<SearchMatch>, AppError> {
        let fingerprint = url_fingerprint(url);

        let gate = self.flight_gate(&fingerprint);
        let ensured = async {
            let _leader = gate.lock().await;
            // Followers re-probe here and observe the leader's work.
            if !self.index.contains_fingerprint(&fingerprint).await? {
                self.index_page(url, &fingerprint).await?;
            }
            Ok::<(), AppError>(())
        }
        .await;
        // The gate must drain on failure too, or the map grows with every
        // distinct failing URL.
        self.release_gate(&fingerprint, &gate);
        ensured?;

        // The query goes through the same passage-typed embed path as the
        // document chunks; both sides of the similarity must share it.
        let query_embedding = self
            .embedder
            .embed(vec![query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Embedding("no vector returned for query".to_string()))?;

        let matches = self.index.query(query_embedding, TOP_K, url).await?;

        metrics::counter!("pagesift_search_total").increment(1);

        Ok(matches
            .into_iter()
            .map(|m| SearchMatch {
                content: m.metadata.map(|meta| meta.text).unwrap_or_default(),
                relevance_score: m.score,
                chunk_id: m.id,
            })
            .collect())
    }

    /// Fetch, normalize, chunk, embed, and upsert one page. Prior entries
    /// for the URL are removed first; nothing is mutated if the fetch fails.
    async fn index_page(&self, url: &str, fingerprint: &str) -> Result<(), AppError> {
        let started = Instant::now();

        let raw = self.fetcher.fetch(url).await?;
        let text = html::normalize(&raw);
        let chunks = self.chunker.split(&text)?;

        self.index.delete_by_url(url).await?;

        if chunks.is_empty() {
            // Zero entries remain: the next request re-attempts indexing
            // because the existence probe will find nothing.
            tracing::warn!(%url, "page produced no chunks, index left empty");
            return Ok(());
        }

        let embeddings = self.embedder.embed(chunks.clone()).await?;

        let entries: Vec<VectorEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text, values)| VectorEntry {
                id: Uuid::new_v4().to_string(),
                values,
                metadata: EntryMetadata {
                    text,
                    url: url.to_string(),
                    url_hash: fingerprint.to_string(),
                },
            })
            .collect();

        let chunk_count = entries.len();
        self.index.upsert(entries).await?;

        metrics::counter!("pagesift_index_pages_total").increment(1);
        metrics::counter!("pagesift_index_chunks_total").increment(chunk_count as u64);
        metrics::histogram!("pagesift_index_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        tracing::info!(
            %url,
            chunks = chunk_count,
            total_ms = started.elapsed().as_millis(),
            "Page indexed"
        );

        Ok(())
    }

    fn flight_gate(&self, fingerprint: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inflight.lock();
        map.entry(fingerprint.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn release_gate(&self, fingerprint: &str, gate: &Arc<tokio::sync::Mutex<()>>) {
        let mut map = self.inflight.lock();
        // Two references: the map's and ours. Anything more means another
        // request still holds the gate.
        if Arc::strong_count(gate) == 2 {
            map.remove(fingerprint);
        }
    }
}
