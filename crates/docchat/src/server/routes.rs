//! API routes: upload, ask, status

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::server::AppState;
use crate::types::{IngestReport, PipelineStatus};

/// Upload extensions accepted by the HTTP surface. Directory ingestion via
/// the CLI takes anything and falls back to plain-text decoding.
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt", "md"];

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(info))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/ask", post(ask))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// GET / - service info
async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "docchat",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /upload": "Upload documents (multipart) and build the index",
            "POST /ask": "Ask a question against the loaded documents",
            "GET /status": "Readiness and loaded corpus",
            "GET /health": "Liveness check"
        }
    }))
}

/// GET /health - liveness
async fn health() -> &'static str {
    "OK"
}

/// GET /status - readiness and active corpus
async fn status(State(state): State<AppState>) -> Json<PipelineStatus> {
    Json(state.pipeline.status().await)
}

/// POST /ask - answer one question
async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::load("request", "question must not be empty"));
    }

    let answer = state.pipeline.ask(question).await?;
    Ok(Json(AskResponse { answer }))
}

/// POST /upload - stage uploaded files and ingest them as the new corpus.
///
/// Files are written to a temporary directory under their original names, so
/// the loader sees them exactly as a directory ingest would. The directory is
/// dropped when ingestion finishes, successful or not.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>> {
    let staging = tempfile::tempdir()?;
    let mut staged = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::load("upload", format!("failed to read multipart field: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        // Strip any path components the client sent
        let filename = Path::new(&filename)
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::load(&filename, "invalid filename"))?;

        let extension = Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::load(
                &filename,
                format!("unsupported file type; allowed: {}", ALLOWED_EXTENSIONS.join(", ")),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::load(&filename, format!("failed to read upload: {e}")))?;

        tracing::info!(file = filename, bytes = data.len(), "staging upload");
        tokio::fs::write(staging.path().join(&filename), &data).await?;
        staged += 1;
    }

    if staged == 0 {
        return Err(Error::load("upload", "no files in request"));
    }

    let report = state.pipeline.ingest(staging.path()).await?;
    Ok(Json(report))
}
