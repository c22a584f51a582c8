//! docchat: conversational document Q&A
//!
//! Loads PDF, DOCX, and plain-text documents, splits them into overlapping
//! chunks, embeds them into an in-memory vector index, and answers questions
//! by retrieving the most similar chunks and prompting an LLM with the
//! retrieved context plus the session's conversation history.

pub mod config;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod memory;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod server;
pub mod types;

pub use config::DocChatConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{Chunk, ConversationTurn, Document, IngestReport, LoadWarning, PipelineStatus};
