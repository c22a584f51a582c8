//! Core data types: documents, chunks, conversation turns

use serde::{Deserialize, Serialize};

/// A raw text segment extracted from a source file.
///
/// Immutable once loaded. A file may produce several documents (one per PDF
/// page, for example); plain text files produce exactly one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier (file path as given to the loader)
    pub source: String,
    /// Extracted text, in reading order
    pub text: String,
    /// Page number (1-indexed) for paginated formats
    pub page: Option<u32>,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            page: None,
        }
    }

    pub fn with_page(source: impl Into<String>, text: impl Into<String>, page: u32) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            page: Some(page),
        }
    }
}

/// A bounded window of a document's text, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Source identifier of the parent document
    pub source: String,
    /// Page number of the parent document, if paginated
    pub page: Option<u32>,
    /// The windowed text
    pub text: String,
    /// Window start, in chars from the start of the document text
    pub char_start: usize,
    /// Window end (exclusive), in chars
    pub char_end: usize,
    /// Position of this chunk within its document
    pub seq: u32,
}

impl Chunk {
    /// Human-readable citation label, e.g. `notes.pdf, page 3`
    pub fn citation(&self) -> String {
        match self.page {
            Some(page) => format!("{}, page {}", self.source, page),
            None => self.source.clone(),
        }
    }
}

/// A chunk paired with its embedding vector.
///
/// Created once per chunk at ingestion time and never mutated; the vector and
/// the chunk are always replaced together.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// One question/answer exchange in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Monotonic sequence number within the session
    pub seq: u64,
    pub question: String,
    pub answer: String,
}

/// Non-fatal per-file load failure, reported alongside a successful ingest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadWarning {
    /// File that failed to load
    pub source: String,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a successful ingest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Path the corpus was loaded from
    pub source: String,
    /// Number of documents extracted
    pub document_count: usize,
    /// Number of chunks embedded and indexed
    pub chunk_count: usize,
    /// Files that were skipped
    pub warnings: Vec<LoadWarning>,
}

/// Pipeline readiness, as reported to the transport layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Whether a corpus has been ingested and queries are accepted
    pub ready: bool,
    /// Source path of the active corpus
    pub loaded_source: Option<String>,
}
