use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unique error codes for client identification
#[derive(Debug, Clone, Copy)]
pub enum ErrorCode {
    // Validation errors (2xxx)
    ValidationFailed = 2001,

    // External service errors (5xxx)
    FetchFailed = 5101,
    EmbeddingServiceError = 5201,
    VectorIndexError = 5301,

    // Internal errors (9xxx)
    InternalError = 9001,
    ConfigurationError = 9002,
}

impl ErrorCode {
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Target page could not be retrieved: network failure, timeout, or
    /// non-2xx status. Reported to the caller inside a 200 response so the
    /// client can distinguish "your URL is bad" from a server fault.
    #[error("Failed to fetch URL: {0}")]
    Fetch(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Fetch(_) => ErrorCode::FetchFailed,
            Self::Embedding(_) => ErrorCode::EmbeddingServiceError,
            Self::Index(_) => ErrorCode::VectorIndexError,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Config(_) => ErrorCode::ConfigurationError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Fetch failures are a property of the caller's URL, not a
            // server fault; the body carries the error.
            Self::Fetch(_) => StatusCode::OK,
            Self::Embedding(_) => StatusCode::BAD_GATEWAY,
            Self::Index(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        match &self {
            AppError::Validation(_) => {
                tracing::debug!(error_code = error_code.as_u16(), %message, "Client error");
            }
            AppError::Fetch(_) => {
                tracing::info!(error_code = error_code.as_u16(), %message, "Fetch failure");
            }
            _ => {
                tracing::error!(error_code = error_code.as_u16(), %message, error = ?self, "Server error");
            }
        };

        // Fetch errors keep the flat `{error}` body shape the original
        // clients expect.
        if matches!(self, AppError::Fetch(_)) {
            return (status, Json(json!({ "error": message }))).into_response();
        }

        let body = Json(json!({
            "error": {
                "code": error_code.as_u16(),
                "status": status.as_u16(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
