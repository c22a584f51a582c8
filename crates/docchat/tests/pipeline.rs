//! End-to-end pipeline tests with in-process providers

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;

use docchat::config::DocChatConfig;
use docchat::error::Error;
use docchat::pipeline::RagPipeline;
use docchat::providers::{EmbeddingProvider, Generator};

/// Deterministic embedder: a fixed-dimension fingerprint of the text.
/// Identical text always embeds identically, so retrieval is reproducible.
struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> docchat::Result<Vec<f32>> {
        let mut vector = vec![1.0f32; 4];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % 4] += byte as f32 / 255.0;
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "hash-embedder"
    }
}

/// Generator that returns its own prompt, so tests can inspect exactly what
/// context and history the pipeline assembled.
struct EchoGenerator;

#[async_trait]
impl Generator for EchoGenerator {
    async fn complete(&self, prompt: &str) -> docchat::Result<String> {
        Ok(prompt.to_string())
    }

    fn name(&self) -> &str {
        "echo-generator"
    }
}

/// Generator that signals entry and pauses until released, so tests can
/// interleave other pipeline calls with an in-flight question.
struct GatedGenerator {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl Generator for GatedGenerator {
    async fn complete(&self, _prompt: &str) -> docchat::Result<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("gated answer".to_string())
    }

    fn name(&self) -> &str {
        "gated-generator"
    }
}

struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> docchat::Result<String> {
        Err(Error::Generation("model unavailable".to_string()))
    }

    fn name(&self) -> &str {
        "failing-generator"
    }
}

fn pipeline_with(generator: Arc<dyn Generator>) -> RagPipeline {
    RagPipeline::new(DocChatConfig::default(), Arc::new(HashEmbedder), generator)
        .expect("default config is valid")
}

fn echo_pipeline() -> RagPipeline {
    pipeline_with(Arc::new(EchoGenerator))
}

fn write_corpus(dir: &TempDir, files: &[(&str, &str)]) {
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
}

#[tokio::test]
async fn ask_before_ingest_is_not_ready() {
    let pipeline = echo_pipeline();
    let err = pipeline.ask("anything").await.unwrap_err();
    assert!(matches!(err, Error::NotReady));
    assert!(!pipeline.status().await.ready);
}

#[tokio::test]
async fn ingest_missing_path_is_not_found() {
    let pipeline = echo_pipeline();
    let err = pipeline
        .ingest(Path::new("/nonexistent/corpus"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    // A failed ingest must not make the pipeline ready
    assert!(!pipeline.status().await.ready);
}

#[tokio::test]
async fn small_file_roundtrip_records_one_turn() {
    let dir = TempDir::new().unwrap();
    write_corpus(
        &dir,
        &[(
            "policy.txt",
            "Refunds are issued within 30 days. Shipping is free over 50 euros. \
             Support is available on weekdays.",
        )],
    );

    let pipeline = echo_pipeline();
    let report = pipeline.ingest(dir.path()).await.unwrap();
    assert_eq!(report.document_count, 1);
    assert_eq!(report.chunk_count, 1);
    assert!(report.warnings.is_empty());

    let status = pipeline.status().await;
    assert!(status.ready);
    assert_eq!(status.loaded_source, Some(dir.path().display().to_string()));

    let answer = pipeline.ask("What is the refund window?").await.unwrap();
    // Echoed prompt carries the retrieved chunk and the question
    assert!(answer.contains("Refunds are issued within 30 days"));
    assert!(answer.contains("QUESTION: What is the refund window?"));

    let history = pipeline.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question, "What is the refund window?");
}

#[tokio::test]
async fn second_question_sees_first_turn_in_prompt() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir, &[("doc.txt", "The capital of France is Paris.")]);

    let pipeline = echo_pipeline();
    pipeline.ingest(dir.path()).await.unwrap();

    pipeline.ask("What is the capital?").await.unwrap();
    let second = pipeline.ask("And its population?").await.unwrap();

    assert!(second.contains("PREVIOUS CONVERSATION"));
    assert!(second.contains("Q: What is the capital?"));
    assert_eq!(pipeline.history().await.len(), 2);
}

#[tokio::test]
async fn reingest_replaces_index_and_clears_history() {
    let corpus_a = TempDir::new().unwrap();
    write_corpus(&corpus_a, &[("a.txt", "Alpha corpus about zebras.")]);
    let corpus_b = TempDir::new().unwrap();
    write_corpus(&corpus_b, &[("b.txt", "Beta corpus about quasars.")]);

    let pipeline = echo_pipeline();
    pipeline.ingest(corpus_a.path()).await.unwrap();
    pipeline.ask("tell me about zebras").await.unwrap();
    assert_eq!(pipeline.history().await.len(), 1);

    pipeline.ingest(corpus_b.path()).await.unwrap();
    assert!(pipeline.history().await.is_empty());

    let answer = pipeline.ask("what is this about?").await.unwrap();
    // Only the new corpus is retrievable, and the old session is gone
    assert!(answer.contains("Beta corpus about quasars"));
    assert!(!answer.contains("Alpha corpus about zebras"));
    assert!(!answer.contains("PREVIOUS CONVERSATION"));
}

#[tokio::test]
async fn failed_generation_leaves_history_unchanged() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir, &[("doc.txt", "Some corpus text.")]);

    let pipeline = pipeline_with(Arc::new(FailingGenerator));
    pipeline.ingest(dir.path()).await.unwrap();

    let err = pipeline.ask("question one").await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
    assert!(pipeline.history().await.is_empty());

    // The pipeline stays ready; the same question can be retried
    assert!(pipeline.status().await.ready);
}

#[tokio::test]
async fn unreadable_file_becomes_warning_not_failure() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir, &[("good.txt", "Readable content.")]);
    std::fs::write(dir.path().join("bad.txt"), [0xFF, 0xFE, 0x00, 0x80]).unwrap();

    let pipeline = echo_pipeline();
    let report = pipeline.ingest(dir.path()).await.unwrap();

    assert_eq!(report.document_count, 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].source.contains("bad.txt"));
    assert!(pipeline.status().await.ready);
}

#[tokio::test]
async fn corpus_with_no_loadable_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.txt"), [0xFF, 0xFE, 0x00, 0x80]).unwrap();

    let pipeline = echo_pipeline();
    let err = pipeline.ingest(dir.path()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyCorpus(_)));
    assert!(!pipeline.status().await.ready);
}

#[tokio::test]
async fn failed_reingest_preserves_previous_corpus_and_history() {
    let good = TempDir::new().unwrap();
    write_corpus(&good, &[("doc.txt", "Original corpus content.")]);
    let empty = TempDir::new().unwrap();

    let pipeline = echo_pipeline();
    pipeline.ingest(good.path()).await.unwrap();
    pipeline.ask("first question").await.unwrap();

    let err = pipeline.ingest(empty.path()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyCorpus(_)));

    // Old index and session survive the failed swap
    assert_eq!(pipeline.history().await.len(), 1);
    let answer = pipeline.ask("still there?").await.unwrap();
    assert!(answer.contains("Original corpus content"));
}

#[tokio::test]
async fn reingest_waits_for_inflight_question() {
    let corpus_a = TempDir::new().unwrap();
    write_corpus(&corpus_a, &[("a.txt", "First corpus.")]);
    let corpus_b = TempDir::new().unwrap();
    write_corpus(&corpus_b, &[("b.txt", "Second corpus.")]);

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let pipeline = Arc::new(pipeline_with(Arc::new(GatedGenerator {
        entered: entered.clone(),
        release: release.clone(),
    })));
    pipeline.ingest(corpus_a.path()).await.unwrap();

    // Hold a question open inside the generator, then start a re-ingest
    let asker = {
        let p = pipeline.clone();
        tokio::spawn(async move { p.ask("held question").await })
    };
    entered.notified().await;

    let ingester = {
        let p = pipeline.clone();
        let path = corpus_b.path().to_path_buf();
        tokio::spawn(async move { p.ingest(&path).await })
    };

    release.notify_one();
    asker.await.unwrap().unwrap();
    ingester.await.unwrap().unwrap();

    // The swap ran only after the held exchange finished, so the answer from
    // the first corpus never lands in the new session's history.
    assert!(pipeline.history().await.is_empty());
    let status = pipeline.status().await;
    assert_eq!(
        status.loaded_source,
        Some(corpus_b.path().display().to_string())
    );
}

#[tokio::test]
async fn concurrent_questions_are_all_recorded() {
    let dir = TempDir::new().unwrap();
    write_corpus(&dir, &[("doc.txt", "Shared corpus for parallel readers.")]);

    let pipeline = Arc::new(echo_pipeline());
    pipeline.ingest(dir.path()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let p = pipeline.clone();
        handles.push(tokio::spawn(
            async move { p.ask(&format!("question {i}")).await },
        ));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = pipeline.history().await;
    assert_eq!(history.len(), 8);
    // Sequence numbers reflect completion order regardless of spawn order
    let seqs: Vec<u64> = history.iter().map(|t| t.seq).collect();
    assert_eq!(seqs, (0..8).collect::<Vec<u64>>());
}
