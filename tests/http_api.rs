//! Router-level tests: request/response contract of the HTTP surface.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use pagesift::chunker::Chunker;
use pagesift::config::CorsConfig;
use pagesift::embeddings::MockEmbedder;
use pagesift::errors::AppError;
use pagesift::fetcher::PageFetcher;
use pagesift::index::{ScoredMatch, VectorEntry, VectorIndex};
use pagesift::routes;
use pagesift::services::AppState;

struct StaticFetcher(Result<String, String>);

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, AppError> {
        match &self.0 {
            Ok(body) => Ok(body.clone()),
            Err(message) => Err(AppError::Fetch(message.clone())),
        }
    }
}

#[derive(Default)]
struct MemoryIndex {
    entries: parking_lot::Mutex<Vec<VectorEntry>>,
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn contains_fingerprint(&self, fingerprint: &str) -> Result<bool, AppError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .any(|e| e.metadata.url_hash == fingerprint))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        self.entries.lock().retain(|e| e.metadata.url != url);
        Ok(())
    }

    async fn upsert(&self, entries: Vec<VectorEntry>) -> Result<(), AppError> {
        self.entries.lock().extend(entries);
        Ok(())
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        top_k: usize,
        url: &str,
    ) -> Result<Vec<ScoredMatch>, AppError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|e| e.metadata.url == url)
            .take(top_k)
            .map(|e| ScoredMatch {
                id: e.id.clone(),
                score: 0.75,
                metadata: Some(e.metadata.clone()),
            })
            .collect())
    }
}

fn app(fetcher: StaticFetcher) -> axum::Router {
    let state = AppState::new(
        Arc::new(fetcher),
        Arc::new(MockEmbedder::new(4)),
        Arc::new(MemoryIndex::default()),
        Chunker::words(),
    );
    let cors = CorsConfig {
        allowed_origins: "http://localhost:3000".to_string(),
    };
    routes::create_router(state, &cors, axum::Router::new()).unwrap()
}

fn search_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_returns_status_message() {
    let app = app(StaticFetcher(Ok(String::new())));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Search API is running");
}

#[tokio::test]
async fn search_returns_structured_matches() {
    let app = app(StaticFetcher(Ok(
        "<html><body>The quick brown fox</body></html>".to_string(),
    )));

    let response = app
        .oneshot(search_request(json!({
            "url": "http://example.com/a",
            "query": "what animal"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["url"], "http://example.com/a");
    assert_eq!(body["query"], "what animal");
    assert_eq!(body["total_matches"], 1);
    assert_eq!(body["results"][0]["content"], "The quick brown fox");
    assert!(body["results"][0]["relevance_score"].is_number());
    assert!(body["results"][0]["chunk_id"].is_string());
}

#[tokio::test]
async fn fetch_failure_reports_flat_error_with_status_200() {
    let app = app(StaticFetcher(Err("connection refused".to_string())));

    let response = app
        .oneshot(search_request(json!({
            "url": "http://down.example.com",
            "query": "q"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let message = body["error"].as_str().expect("flat error string");
    assert!(message.starts_with("Failed to fetch URL:"));
    assert!(message.contains("connection refused"));
}

#[tokio::test]
async fn blank_query_is_rejected() {
    let app = app(StaticFetcher(Ok(String::new())));

    let response = app
        .oneshot(search_request(json!({
            "url": "http://example.com",
            "query": "   "
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], 2001);
}
