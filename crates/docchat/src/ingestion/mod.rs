//! Document ingestion: loading, format extraction, chunking

mod chunker;
mod extract;
mod loader;

pub use chunker::Chunker;
pub use extract::{extract, FileKind};
pub use loader::DocumentLoader;
