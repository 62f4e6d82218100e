pub mod search;

use crate::chunker::Chunker;
use crate::embeddings::Embedder;
use crate::fetcher::PageFetcher;
use crate::index::VectorIndex;
use search::SearchService;
use std::sync::Arc;

// A container for all services to be injected into routes.
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
}

impl AppState {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        chunker: Chunker,
    ) -> Self {
        Self {
            search_service: Arc::new(SearchService::new(fetcher, embedder, index, chunker)),
        }
    }
}
