//! Embedding generation service with preprocessing and bounded concurrency

use std::sync::Arc;

use futures::stream;
use futures::stream::StreamExt;
use tracing::debug;

use super::client::EmbeddingClient;
use super::client::EmbeddingProvider;
use super::text_preprocessing::preprocess_text_for_embedding;
use super::EmbeddingConfig;
use crate::errors::AllycatError;
use crate::errors::Result;

/// Service for generating embeddings of the configured dimension
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config)?)
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Generate embedding for a single text
    ///
    /// # Errors
    /// - Empty text after preprocessing
    /// - Provider errors
    /// - The vector length differs from the configured dimension
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let processed_text = preprocess_text_for_embedding(text)?;
        let embedding = self.client.generate(&processed_text).await?;

        if embedding.len() != self.config.dimension {
            return Err(AllycatError::EmbeddingError(format!(
                "Model {} returned {} dimensions, expected {} (check EMBEDDING_LENGTH)",
                self.config.model,
                embedding.len(),
                self.config.dimension
            )));
        }

        Ok(embedding)
    }

    /// Generate embeddings for multiple texts, preserving order
    ///
    /// At most `concurrency` requests are in flight. The first failure aborts
    /// the batch.
    pub async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = self.config.concurrency.clamp(1, texts.len());
        debug!(
            "Generating {} embeddings with concurrency {}",
            texts.len(),
            concurrency
        );

        let results: Vec<Result<Vec<f32>>> = stream::iter(texts.iter())
            .map(|&text| async move { self.generate(text).await })
            .buffered(concurrency)
            .collect()
            .await;

        results.into_iter().collect()
    }

    /// Get the embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider
    #[must_use]
    pub const fn provider(&self) -> EmbeddingProvider {
        self.config.provider
    }
}
