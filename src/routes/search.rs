use crate::errors::AppError;
use crate::services::search::SearchMatch;
use crate::services::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub url: String,
    pub query: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub url: String,
    pub query: String,
    pub total_matches: usize,
    pub results: Vec<SearchMatch>,
}

#[instrument(skip(state, payload), fields(url = %payload.url))]
pub async fn search(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.url.trim().is_empty() {
        return Err(AppError::Validation("url is required".to_string()));
    }
    if payload.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let results = state
        .search_service
        .search(&payload.url, &payload.query)
        .await?;

    Ok(Json(SearchResponse {
        url: payload.url,
        query: payload.query,
        total_matches: results.len(),
        results,
    }))
}
