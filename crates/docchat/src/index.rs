//! In-memory vector index with brute-force cosine similarity search

use crate::error::{Error, Result};
use crate::types::{Chunk, EmbeddedChunk};

/// A retrieval hit: a chunk and its similarity to the query
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: Chunk,
    /// Cosine similarity, higher is more similar
    pub similarity: f32,
}

/// Similarity index over the embedded chunks of one corpus.
///
/// Queries are a linear scan over all vectors. That is the correctness
/// reference the tests pin down: exact top-k, descending similarity, ties
/// broken by ingestion order. Approximate acceleration would have to preserve
/// those results for small corpora.
pub struct VectorIndex {
    chunks: Vec<EmbeddedChunk>,
    dimensions: usize,
}

impl VectorIndex {
    /// Build a complete index from embedded chunks.
    ///
    /// All vectors must share one dimensionality; the caller swaps the built
    /// index in atomically, so no query ever observes a partial build.
    pub fn build(chunks: Vec<EmbeddedChunk>) -> Result<Self> {
        let dimensions = chunks.first().map(|c| c.vector.len()).unwrap_or(0);
        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.vector.len() != dimensions {
                return Err(Error::Embedding(format!(
                    "inconsistent embedding dimensions: chunk {} has {}, expected {}",
                    i,
                    chunk.vector.len(),
                    dimensions
                )));
            }
        }
        Ok(Self { chunks, dimensions })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top-k most similar chunks, descending similarity, stable ties.
    ///
    /// Returns fewer than `k` results only when the corpus has fewer chunks.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if !self.chunks.is_empty() && vector.len() != self.dimensions {
            return Err(Error::Embedding(format!(
                "query embedding has {} dimensions, index has {}",
                vector.len(),
                self.dimensions
            )));
        }

        // Scored in ingestion order; the stable sort keeps that order for ties.
        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|embedded| SearchResult {
                chunk: embedded.chunk.clone(),
                similarity: cosine_similarity(vector, &embedded.vector),
            })
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(k);
        Ok(results)
    }
}

/// Cosine similarity; zero vectors score 0.0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
