//! Embeddings generation module
//!
//! This module provides functionality for generating text embeddings using:
//! - Ollama (local models such as `nomic-embed-text`)
//! - OpenAI-compatible endpoints
//!
//! # Examples
//!
//! ```rust,no_run
//! use allycat::embeddings::EmbeddingService;
//! use allycat::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;
pub mod text_preprocessing;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::errors::Result;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub concurrency: usize,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        Ok(Self {
            provider: config.embeddings.provider.parse()?,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint: config.embeddings.endpoint.clone(),
            api_key: config.embeddings.api_key.clone(),
            concurrency: config.embeddings.concurrency,
        })
    }
}
