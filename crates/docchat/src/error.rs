//! Error types for the docchat pipeline

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for ingestion, retrieval, and generation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ingestion path does not exist
    #[error("source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Every file under the ingestion path failed to load
    #[error("no loadable documents under {}", .0.display())]
    EmptyCorpus(PathBuf),

    /// A single file could not be read or parsed.
    ///
    /// The loader absorbs this into a [`LoadWarning`](crate::types::LoadWarning)
    /// unless the whole corpus is affected.
    #[error("failed to load {file}: {reason}")]
    Load { file: String, reason: String },

    /// Embedding provider failure (recoverable, caller may retry)
    #[error("embedding provider error: {0}")]
    Embedding(String),

    /// Generation provider failure (recoverable, caller may retry)
    #[error("generation provider error: {0}")]
    Generation(String),

    /// Query before any successful ingest
    #[error("no corpus loaded; ingest a document first")]
    NotReady,

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a per-file load error
    pub fn load(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::EmptyCorpus(_) => "empty_corpus",
            Self::Load { .. } => "load",
            Self::Embedding(_) => "embedding",
            Self::Generation(_) => "generation",
            Self::NotReady => "not_ready",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// HTTP status for the transport layer
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmptyCorpus(_) | Self::Load { .. } | Self::NotReady => StatusCode::BAD_REQUEST,
            Self::Embedding(_) | Self::Generation(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({
            "error": true,
            "kind": self.kind(),
            "message": self.to_string(),
            "status_code": status.as_u16(),
        }));
        (status, body).into_response()
    }
}
