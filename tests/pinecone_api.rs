//! Wire-level tests for the Pinecone adapter against a mocked API.

use httpmock::prelude::*;
use serde_json::json;

use pagesift::config::PineconeConfig;
use pagesift::index::{url_fingerprint, EntryMetadata, PineconeIndex, VectorEntry, VectorIndex};

fn config_for(server: &MockServer) -> PineconeConfig {
    PineconeConfig {
        api_key: "pc-test".to_string(),
        index_name: "page-search".to_string(),
        control_plane_url: server.base_url(),
        cloud: "aws".to_string(),
        region: "us-east-1".to_string(),
    }
}

async fn connected_index(server: &MockServer) -> PineconeIndex {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/indexes/page-search")
                .header("Api-Key", "pc-test");
            then.status(200)
                .json_body(json!({ "host": server.base_url() }));
        })
        .await;

    PineconeIndex::connect(config_for(server), 4).await.unwrap()
}

#[tokio::test]
async fn connect_creates_missing_index_with_cosine_serverless_spec() {
    let server = MockServer::start_async().await;

    let describe = server
        .mock_async(|when, then| {
            when.method(GET).path("/indexes/page-search");
            then.status(404);
        })
        .await;

    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/indexes").json_body_partial(
                r#"{
                    "name": "page-search",
                    "dimension": 4,
                    "metric": "cosine",
                    "spec": { "serverless": { "cloud": "aws", "region": "us-east-1" } }
                }"#,
            );
            then.status(201)
                .json_body(json!({ "host": server.base_url() }));
        })
        .await;

    PineconeIndex::connect(config_for(&server), 4).await.unwrap();

    assert_eq!(describe.hits_async().await, 1);
    assert_eq!(create.hits_async().await, 1);
}

#[tokio::test]
async fn existence_probe_sends_zero_vector_with_fingerprint_filter() {
    let server = MockServer::start_async().await;
    let index = connected_index(&server).await;

    let fp = url_fingerprint("http://example.com/a");
    let probe = server
        .mock_async(|when, then| {
            when.method(POST).path("/query").json_body(json!({
                "vector": [0.0, 0.0, 0.0, 0.0],
                "topK": 1,
                "filter": { "url_hash": { "$eq": fp } },
                "includeMetadata": false,
            }));
            then.status(200)
                .json_body(json!({ "matches": [ { "id": "x", "score": 0.0 } ] }));
        })
        .await;

    assert!(index.contains_fingerprint(&fp).await.unwrap());
    assert_eq!(probe.hits_async().await, 1);
}

#[tokio::test]
async fn probe_with_no_matches_reports_absent() {
    let server = MockServer::start_async().await;
    let index = connected_index(&server).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(200).json_body(json!({ "matches": [] }));
        })
        .await;

    assert!(!index.contains_fingerprint("deadbeef").await.unwrap());
}

#[tokio::test]
async fn upsert_delete_and_query_use_exact_url_filters() {
    let server = MockServer::start_async().await;
    let index = connected_index(&server).await;
    let url = "http://example.com/a";

    let delete = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/vectors/delete")
                .json_body(json!({ "filter": { "url": { "$eq": url } } }));
            then.status(200).json_body(json!({}));
        })
        .await;

    let upsert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/vectors/upsert")
                .json_body_partial(r#"{ "vectors": [ { "id": "chunk-1" } ] }"#);
            then.status(200).json_body(json!({ "upsertedCount": 1 }));
        })
        .await;

    let query = server
        .mock_async(|when, then| {
            when.method(POST).path("/query").json_body(json!({
                "vector": [0.5, 0.5, 0.5, 0.5],
                "topK": 10,
                "filter": { "url": { "$eq": url } },
                "includeMetadata": true,
            }));
            then.status(200).json_body(json!({
                "matches": [
                    {
                        "id": "chunk-1",
                        "score": 0.93,
                        "metadata": { "text": "Hello world", "url": url, "url_hash": url_fingerprint(url) }
                    }
                ]
            }));
        })
        .await;

    index.delete_by_url(url).await.unwrap();

    index
        .upsert(vec![VectorEntry {
            id: "chunk-1".to_string(),
            values: vec![0.5, 0.5, 0.5, 0.5],
            metadata: EntryMetadata {
                text: "Hello world".to_string(),
                url: url.to_string(),
                url_hash: url_fingerprint(url),
            },
        }])
        .await
        .unwrap();

    let matches = index.query(vec![0.5, 0.5, 0.5, 0.5], 10, url).await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "chunk-1");
    assert!((matches[0].score - 0.93).abs() < f32::EPSILON);
    let metadata = matches[0].metadata.as_ref().unwrap();
    assert_eq!(metadata.text, "Hello world");
    assert_eq!(metadata.url_hash, url_fingerprint(url));

    assert_eq!(delete.hits_async().await, 1);
    assert_eq!(upsert.hits_async().await, 1);
    assert_eq!(query.hits_async().await, 1);
}

#[tokio::test]
async fn data_plane_errors_map_to_index_errors() {
    let server = MockServer::start_async().await;
    let index = connected_index(&server).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/query");
            then.status(500).body("internal");
        })
        .await;

    let err = index.contains_fingerprint("abc").await.unwrap_err();
    assert!(matches!(err, pagesift::errors::AppError::Index(_)));
}
