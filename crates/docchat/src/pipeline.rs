//! RAG pipeline orchestration: ingest, ask, status

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::DocChatConfig;
use crate::error::{Error, Result};
use crate::index::VectorIndex;
use crate::ingestion::{Chunker, DocumentLoader};
use crate::memory::ConversationMemory;
use crate::prompt::PromptBuilder;
use crate::providers::{EmbeddingProvider, Generator};
use crate::types::{ConversationTurn, EmbeddedChunk, IngestReport, PipelineStatus};

/// The active corpus: index plus the path it was loaded from
struct ActiveIndex {
    index: VectorIndex,
    source: String,
}

/// Orchestrates ingestion and conversational querying over one corpus.
///
/// Two states: Unready (no corpus, only ingestion accepted) and Ready (index
/// built, ingestion and questions accepted). Loading a new corpus atomically
/// replaces the index and clears the conversation; a failed ingest leaves the
/// previous state untouched.
///
/// Locking: questions share the index read lock for their whole exchange and
/// may run concurrently; the ingest swap takes the write lock after all the
/// expensive work is done, so it waits for in-flight questions and new
/// questions wait for it. The memory mutex is held across the generator call,
/// so questions within one session are answered in sequence order.
pub struct RagPipeline {
    config: DocChatConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn Generator>,
    active: RwLock<Option<ActiveIndex>>,
    memory: Mutex<ConversationMemory>,
}

impl RagPipeline {
    /// Create an Unready pipeline with the given providers
    pub fn new(
        config: DocChatConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            embedder = embedder.name(),
            generator = generator.name(),
            window = config.chunking.window,
            overlap = config.chunking.overlap,
            top_k = config.retrieval.top_k,
            "pipeline initialized"
        );
        Ok(Self {
            config,
            embedder,
            generator,
            active: RwLock::new(None),
            memory: Mutex::new(ConversationMemory::new()),
        })
    }

    /// Ingest a file or directory, replacing the active corpus.
    ///
    /// All-or-nothing at the index-replacement boundary: load, chunk, and
    /// embed happen against local state, and only a fully built index is
    /// swapped in. Any failure along the way leaves the prior index and the
    /// conversation history exactly as they were.
    pub async fn ingest(&self, path: &Path) -> Result<IngestReport> {
        let source = path.display().to_string();
        tracing::info!(source, "ingesting corpus");

        let (documents, warnings) = DocumentLoader::load(path)?;
        let document_count = documents.len();

        let chunker = Chunker::new(&self.config.chunking)?;
        let chunks = chunker.split(&documents);
        tracing::info!(documents = document_count, chunks = chunks.len(), "corpus chunked");

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let embedded: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| EmbeddedChunk { chunk, vector })
            .collect();
        let chunk_count = embedded.len();
        let index = VectorIndex::build(embedded)?;

        // Swap boundary: replace the index and clear memory in one exclusive
        // section so no question ever sees the new index with old history.
        {
            let mut active = self.active.write().await;
            let mut memory = self.memory.lock().await;
            *active = Some(ActiveIndex {
                index,
                source: source.clone(),
            });
            memory.clear();
        }

        for warning in &warnings {
            tracing::warn!(file = warning.source, reason = warning.reason, "file skipped");
        }
        tracing::info!(source, chunk_count, "corpus ready");

        Ok(IngestReport {
            source,
            document_count,
            chunk_count,
            warnings,
        })
    }

    /// Answer a question against the active corpus.
    ///
    /// Fails with [`Error::NotReady`] before the first successful ingest. A
    /// generator failure surfaces to the caller and records nothing, so the
    /// same question can be retried.
    ///
    /// The index read guard is held until the turn is appended, so an answer
    /// built from one corpus can never land in the history of the next one;
    /// a concurrent ingest swaps in its corpus only after the exchange ends.
    pub async fn ask(&self, question: &str) -> Result<String> {
        // Refuse before touching the provider, so NotReady never half-runs.
        let active = self.active.read().await;
        let active = active.as_ref().ok_or(Error::NotReady)?;

        let question_vector = self.embedder.embed(question).await?;
        let results = active
            .index
            .query(&question_vector, self.config.retrieval.top_k)?;
        tracing::debug!(question, retrieved = results.len(), "chunks retrieved");

        let context = PromptBuilder::build_context(&results);

        // Held across generation: questions in one session are serialized and
        // each sees the history of every completed turn before it.
        let mut memory = self.memory.lock().await;
        let history =
            PromptBuilder::format_history(memory.history(), self.config.prompt.max_history_chars);
        let prompt = PromptBuilder::build_chat_prompt(question, &context, &history);

        let answer = self.generator.complete(&prompt).await?;
        memory.append(question, answer.clone());

        Ok(answer)
    }

    /// Readiness and active corpus, for the transport layer
    pub async fn status(&self) -> PipelineStatus {
        let active = self.active.read().await;
        PipelineStatus {
            ready: active.is_some(),
            loaded_source: active.as_ref().map(|a| a.source.clone()),
        }
    }

    /// Conversation history of the current session, oldest first
    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.memory.lock().await.history().to_vec()
    }
}
