pub mod health;
pub mod search;

use crate::config::CorsConfig;
use crate::errors::AppError;
use crate::services::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Maximum concurrent requests (backpressure control)
const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Request timeout; indexing a large page within it means fetch (10s) plus
/// one embedding batch.
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub fn create_router(
    state: AppState,
    cors: &CorsConfig,
    metrics_router: Router,
) -> Result<Router, AppError> {
    let cors_layer = build_cors(cors)?;

    let api_routes = Router::new()
        .route("/", get(health::root))
        .route("/search", post(search::search))
        .with_state(state);

    Ok(Router::new()
        .merge(api_routes)
        .merge(metrics_router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                .layer(cors_layer),
        ))
}

fn build_cors(config: &CorsConfig) -> Result<CorsLayer, AppError> {
    let mut origins = Vec::new();
    for origin in config.origins() {
        let value = origin
            .parse::<HeaderValue>()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("invalid CORS origin: {origin}")))?;
        origins.push(value);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}
