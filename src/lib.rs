pub mod chunker;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod fetcher;
pub mod html;
pub mod index;
pub mod metrics;
pub mod routes;
pub mod services;
