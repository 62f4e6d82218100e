//! Pinecone REST adapter.
//!
//! The control plane (describe/create index) is touched exactly once, in
//! [`PineconeIndex::connect`] at process start; every data-plane call goes
//! to the host the control plane hands back.

use super::{ScoredMatch, VectorEntry, VectorIndex};
use crate::config::PineconeConfig;
use crate::errors::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const API_VERSION: &str = "2025-01";

pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    data_url: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredMatch>,
}

impl PineconeIndex {
    /// Resolves the data-plane host, creating the index first if it does
    /// not exist (dimension from config, cosine metric, serverless spec).
    pub async fn connect(config: PineconeConfig, dimension: usize) -> Result<Self, AppError> {
        let client = reqwest::Client::new();
        let describe_url = format!(
            "{}/indexes/{}",
            config.control_plane_url, config.index_name
        );

        let res = client
            .get(&describe_url)
            .header("Api-Key", &config.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("describe index failed: {e}")))?;

        let description: IndexDescription = if res.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::info!(index = %config.index_name, "Index not found, creating");
            Self::create_index(&client, &config, dimension).await?
        } else if res.status().is_success() {
            res.json()
                .await
                .map_err(|e| AppError::Index(format!("invalid describe response: {e}")))?
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Index(format!(
                "describe index returned {status}: {body}"
            )));
        };

        // The control plane returns a bare hostname.
        let data_url = if description.host.starts_with("http") {
            description.host
        } else {
            format!("https://{}", description.host)
        };

        tracing::info!(index = %config.index_name, host = %data_url, "Connected to vector index");

        Ok(Self {
            client,
            api_key: config.api_key,
            data_url,
            dimension,
        })
    }

    async fn create_index(
        client: &reqwest::Client,
        config: &PineconeConfig,
        dimension: usize,
    ) -> Result<IndexDescription, AppError> {
        let body = json!({
            "name": config.index_name,
            "dimension": dimension,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": config.cloud,
                    "region": config.region,
                }
            }
        });

        let res = client
            .post(format!("{}/indexes", config.control_plane_url))
            .header("Api-Key", &config.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("create index failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Index(format!(
                "create index returned {status}: {body}"
            )));
        }

        res.json()
            .await
            .map_err(|e| AppError::Index(format!("invalid create response: {e}")))
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, AppError> {
        let res = self
            .client
            .post(format!("{}{path}", self.data_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("{path} request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Index(format!("{path} returned {status}: {body}")));
        }

        Ok(res)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn contains_fingerprint(&self, fingerprint: &str) -> Result<bool, AppError> {
        // Filter-only query: the zero vector carries no semantic meaning,
        // only presence of a match is read.
        let body = json!({
            "vector": vec![0.0f32; self.dimension],
            "topK": 1,
            "filter": { "url_hash": { "$eq": fingerprint } },
            "includeMetadata": false,
        });

        let res = self.post("/query", body).await?;
        let parsed: QueryResponse = res
            .json()
            .await
            .map_err(|e| AppError::Index(format!("invalid query response: {e}")))?;

        Ok(!parsed.matches.is_empty())
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        let body = json!({
            "filter": { "url": { "$eq": url } },
        });
        self.post("/vectors/delete", body).await?;
        Ok(())
    }

    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<(), AppError> {
        let body = json!({ "vectors": entries });
        self.post("/vectors/upsert", body).await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        url: &str,
    ) -> Result<Vec<ScoredMatch>, AppError> {
        let body = json!({
            "vector": vector,
            "topK": top_k,
            "filter": { "url": { "$eq": url } },
            "includeMetadata": true,
        });

        let res = self.post("/query", body).await?;
        let parsed: QueryResponse = res
            .json()
            .await
            .map_err(|e| AppError::Index(format!("invalid query response: {e}")))?;

        Ok(parsed.matches)
    }
}
