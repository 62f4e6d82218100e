use pagesift::chunker::Chunker;
use pagesift::config::AppConfig;
use pagesift::embeddings::{CloudEmbedder, Embedder, MockEmbedder};
use pagesift::fetcher::{HttpFetcher, PageFetcher};
use pagesift::index::{PineconeIndex, VectorIndex};
use pagesift::services::AppState;
use pagesift::{metrics, routes};

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::build()?;

    // 2. Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.rust_log))
        .init();

    tracing::info!("Starting pagesift...");

    // 3. Connect to the vector index (create-if-absent happens here, once)
    let index: Arc<dyn VectorIndex> = Arc::new(
        PineconeIndex::connect(config.pinecone.clone(), config.embeddings.dimension).await?,
    );

    // 4. Initialize the embedding client; "mock" key selects the local stub
    let embedder: Arc<dyn Embedder> = if config.embeddings.api_key == "mock" {
        Arc::new(MockEmbedder::new(config.embeddings.dimension))
    } else {
        Arc::new(CloudEmbedder::new(config.embeddings.clone()))
    };

    // 5. Remaining pipeline pieces
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new()?);
    let chunker = Chunker::new(&config.chunking)?;

    // 6. App state and router
    let state = AppState::new(fetcher, embedder, index, chunker);
    let metrics_router = metrics::setup_metrics()?;
    let app = routes::create_router(state, &config.cors, metrics_router)?;

    // 7. Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
