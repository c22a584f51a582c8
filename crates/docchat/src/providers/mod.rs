//! External model provider capabilities

pub mod azure;
pub mod embedding;
pub mod generator;

pub use azure::AzureOpenAi;
pub use embedding::EmbeddingProvider;
pub use generator::Generator;
