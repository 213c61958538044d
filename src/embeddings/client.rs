//! Embedding API clients for various providers

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::AllycatError;
use crate::errors::Result;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Ollama local embeddings
    Ollama,
    /// `OpenAI`-compatible embeddings API
    OpenAI,
}

impl FromStr for EmbeddingProvider {
    type Err = AllycatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            other => Err(AllycatError::ConfigError(format!(
                "Unsupported embedding provider: {other}"
            ))),
        }
    }
}

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Generate embedding for a single text
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, missing embedding)
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            EmbeddingProvider::Ollama => self.generate_ollama(text).await,
            EmbeddingProvider::OpenAI => self.generate_openai(text).await,
        }
    }

    /// Generate embedding using `OpenAI` API
    async fn generate_openai(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AllycatError::ConfigError("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a str,
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {}", url);

        let request = OpenAIRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AllycatError::EmbeddingError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AllycatError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AllycatError::EmbeddingError("No embedding in response".to_string()))
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AllycatError::EmbeddingError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AllycatError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        if result.embedding.is_empty() {
            return Err(AllycatError::EmbeddingError(format!(
                "Ollama returned an empty embedding for model {}",
                self.model
            )));
        }

        Ok(result.embedding)
    }

    /// Get the provider
    #[must_use]
    pub const fn provider(&self) -> EmbeddingProvider {
        self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("ollama".parse::<EmbeddingProvider>().unwrap(), EmbeddingProvider::Ollama);
        assert_eq!(" OpenAI ".parse::<EmbeddingProvider>().unwrap(), EmbeddingProvider::OpenAI);
        assert!("sentence-transformers".parse::<EmbeddingProvider>().is_err());
    }

    #[tokio::test]
    async fn test_openai_requires_key() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::OpenAI,
            "text-embedding-3-small".to_string(),
            "http://127.0.0.1:9".to_string(),
            None,
        )
        .unwrap();

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AllycatError::ConfigError(_)));
    }

    #[tokio::test]
    #[ignore = "Requires a running Ollama with nomic-embed-text"]
    async fn test_ollama_embedding() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            "nomic-embed-text".to_string(),
            "http://localhost:11434".to_string(),
            None,
        )
        .unwrap();

        let embedding = client.generate("Hello, world!").await.unwrap();
        assert_eq!(embedding.len(), 768);
    }
}
