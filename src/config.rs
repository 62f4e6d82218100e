use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pinecone: PineconeConfig,
    pub embeddings: EmbeddingsConfig,
    pub chunking: ChunkingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Control plane endpoint; the data plane host is resolved from it.
    pub control_plane_url: String,
    pub cloud: String,
    pub region: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingsConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    Words,
    Tokens,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    pub strategy: ChunkStrategy,
    pub max_tokens: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins.
    pub allowed_origins: String,
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

impl AppConfig {
    pub fn build() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.rust_log", "info,pagesift=debug")?
            .set_default("pinecone.index_name", "page-search")?
            .set_default("pinecone.control_plane_url", "https://api.pinecone.io")?
            .set_default("pinecone.cloud", "aws")?
            .set_default("pinecone.region", "us-east-1")?
            .set_default("embeddings.api_url", "https://api.pinecone.io/embed")?
            .set_default("embeddings.model", "llama-text-embed-v2")?
            .set_default("embeddings.dimension", 1024)?
            .set_default("chunking.strategy", "words")?
            .set_default("chunking.max_tokens", 500)?
            .set_default("cors.allowed_origins", "http://localhost:3000")?
            // Environment overrides, e.g. `APP_PINECONE__API_KEY=...`
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("APP")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
