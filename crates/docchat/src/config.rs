//! Configuration for the docchat service
//!
//! Provider settings follow the deployment's environment contract: `endpoint`,
//! `subscription_key`, `api_version`, `deployment` are required;
//! `embedding_api_version` and `embedding_deployment` have sensible fallbacks.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocChatConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Prompt assembly configuration
    pub prompt: PromptConfig,
    /// Azure OpenAI configuration
    pub azure: AzureConfig,
}

impl DocChatConfig {
    /// Load configuration from environment variables, validating that the
    /// required provider variables are present.
    pub fn from_env() -> Result<Self> {
        let azure = AzureConfig::from_env()?;
        let mut config = Self {
            azure,
            ..Self::default()
        };

        if let Ok(host) = std::env::var("DOCCHAT_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("DOCCHAT_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid DOCCHAT_PORT: {port}")))?;
        }

        config.chunking.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub window: usize,
    /// Overlap between consecutive windows in characters
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Enforce `0 < overlap < window`
    pub fn validate(&self) -> Result<()> {
        if self.overlap == 0 || self.overlap >= self.window {
            return Err(Error::Config(format!(
                "chunk overlap must satisfy 0 < overlap < window (got overlap={}, window={})",
                self.overlap, self.window
            )));
        }
        Ok(())
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Prompt assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Character budget for the conversation-history section of the prompt.
    /// Memory itself is unbounded; only the replayed portion is capped.
    pub max_history_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_history_chars: 4000,
        }
    }
}

/// Azure OpenAI configuration (chat + embeddings against one resource)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// API version for chat completions
    pub chat_api_version: String,
    /// API version for embeddings
    pub embedding_api_version: String,
    /// Chat deployment name
    pub chat_deployment: String,
    /// Embedding deployment name
    pub embedding_deployment: String,
    /// Sampling temperature for generation
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            chat_api_version: "2024-02-01".to_string(),
            embedding_api_version: "2024-02-01".to_string(),
            chat_deployment: String::new(),
            embedding_deployment: "text-embedding-ada-002".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl AzureConfig {
    /// Read the provider settings from the environment
    pub fn from_env() -> Result<Self> {
        let endpoint = require_env("endpoint")?;
        let api_key = require_env("subscription_key")?;
        let chat_api_version = require_env("api_version")?;
        let chat_deployment = require_env("deployment")?;

        // Embedding API version falls back to the chat version
        let embedding_api_version =
            std::env::var("embedding_api_version").unwrap_or_else(|_| chat_api_version.clone());
        let embedding_deployment = std::env::var("embedding_deployment")
            .unwrap_or_else(|_| "text-embedding-ada-002".to_string());

        let defaults = Self::default();
        let temperature = match std::env::var("temperature") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid temperature: {raw}")))?,
            Err(_) => defaults.temperature,
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            chat_api_version,
            embedding_api_version,
            chat_deployment,
            embedding_deployment,
            temperature,
            ..defaults
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            Error::Config(format!(
                "missing required environment variable `{name}` (check your .env file)"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chunking_is_valid() {
        let config = ChunkingConfig::default();
        assert_eq!(config.window, 1000);
        assert_eq!(config.overlap, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_overlap() {
        let config = ChunkingConfig {
            window: 100,
            overlap: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_overlap_at_or_above_window() {
        for overlap in [100, 150] {
            let config = ChunkingConfig {
                window: 100,
                overlap,
            };
            assert!(config.validate().is_err(), "overlap={overlap}");
        }
    }

    #[test]
    fn default_retrieval_top_k() {
        assert_eq!(RetrievalConfig::default().top_k, 4);
    }
}
