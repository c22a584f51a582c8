//! Generator trait for LLM-style answer completion

use async_trait::async_trait;

use crate::error::Result;

/// Trait for completion-style answer generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete a fully assembled prompt into an answer
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
