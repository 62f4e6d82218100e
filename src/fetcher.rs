//! Raw page retrieval.
//!
//! A fetch failure is a user-visible outcome, not a server fault: the
//! orchestrator surfaces it directly without retries.

use crate::errors::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Timeout for the whole request, connect included.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Some sites reject clients without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0";

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the raw response body for `url` on HTTP 2xx.
    async fn fetch(&self, url: &str) -> Result<String, AppError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))
    }
}
