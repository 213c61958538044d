//! LLM client for Ollama and Replicate

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use super::LlmBackend;
use crate::config::AppConfig;
use crate::errors::AllycatError;
use crate::errors::Result;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLLS: usize = 120;

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
    #[serde(default)]
    urls: PredictionUrls,
}

#[derive(Debug, Default, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    get: Option<String>,
}

/// Text generation service
#[derive(Clone)]
pub struct LlmService {
    backend: LlmBackend,
    model: String,
    ollama_endpoint: String,
    replicate_endpoint: String,
    replicate_token: Option<String>,
    temperature: f32,
    max_tokens: usize,
    poll_interval: Duration,
    client: Client,
}

impl LlmService {
    /// Create a service for the backend selected in `config.llm`
    ///
    /// # Errors
    /// - Unknown `run_env`
    /// - Replicate selected without an API token
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        let backend = config.llm_backend()?;
        if backend == LlmBackend::Replicate && config.llm.replicate_api_token.is_none() {
            return Err(AllycatError::ConfigError(
                "Replicate backend requires REPLICATE_API_TOKEN".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        Ok(Self {
            backend,
            model: config.llm.model.clone(),
            ollama_endpoint: config.llm.ollama_endpoint.trim_end_matches('/').to_string(),
            replicate_endpoint: config
                .llm
                .replicate_endpoint
                .trim_end_matches('/')
                .to_string(),
            replicate_token: config.llm.replicate_api_token.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            poll_interval: DEFAULT_POLL_INTERVAL,
            client,
        })
    }

    /// Override the delay between Replicate status polls
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn backend(&self) -> LlmBackend {
        self.backend
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion with the configured temperature and token limit
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_params(prompt, self.temperature, self.max_tokens)
            .await
    }

    /// Generate a completion
    ///
    /// # Errors
    /// - Network errors
    /// - Non-success responses from the backend
    /// - Failed, canceled or timed-out predictions
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        match self.backend {
            LlmBackend::LocalOllama => self.generate_ollama(prompt, temperature, max_tokens).await,
            LlmBackend::Replicate => {
                self.generate_replicate(prompt, temperature, max_tokens)
                    .await
            }
        }
    }

    async fn generate_ollama(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: GenerateOptions,
        }

        #[derive(Serialize)]
        struct GenerateOptions {
            temperature: f32,
            num_predict: usize,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        let url = format!("{}/api/generate", self.ollama_endpoint);
        debug!("Calling Ollama generate API: {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature,
                    num_predict: max_tokens,
                },
            })
            .send()
            .await
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AllycatError::LlmError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AllycatError::LlmError(format!("Failed to parse response: {e}")))?;

        Ok(result.response)
    }

    async fn generate_replicate(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        let token = self
            .replicate_token
            .as_deref()
            .ok_or_else(|| AllycatError::ConfigError("Replicate API token not provided".to_string()))?;

        let url = format!(
            "{}/v1/models/{}/predictions",
            self.replicate_endpoint, self.model
        );
        debug!("Creating Replicate prediction: {}", url);

        let body = serde_json::json!({
            "input": {
                "prompt": prompt,
                "temperature": temperature,
                "max_new_tokens": max_tokens,
            }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        let mut prediction = parse_prediction(response).await?;

        for _ in 0..MAX_POLLS {
            match prediction.status.as_str() {
                "succeeded" => return output_text(&prediction.output),
                "failed" | "canceled" => {
                    return Err(AllycatError::LlmError(format!(
                        "Replicate prediction {}: {}",
                        prediction.status, prediction.error
                    )))
                }
                _ => {}
            }

            let poll_url = prediction.urls.get.clone().ok_or_else(|| {
                AllycatError::LlmError("Replicate prediction has no status URL".to_string())
            })?;
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(&poll_url)
                .bearer_auth(token)
                .send()
                .await
                .map_err(|e| AllycatError::HttpError(e.to_string()))?;
            prediction = parse_prediction(response).await?;
        }

        warn!("Replicate prediction still {} after {} polls", prediction.status, MAX_POLLS);
        Err(AllycatError::LlmError(format!(
            "Replicate prediction did not finish (last status: {})",
            prediction.status
        )))
    }
}

async fn parse_prediction(response: reqwest::Response) -> Result<Prediction> {
    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AllycatError::LlmError(format!(
            "Replicate API error ({status}): {error_text}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AllycatError::LlmError(format!("Failed to parse prediction: {e}")))
}

/// Replicate models return either a string or a list of token strings
fn output_text(output: &Value) -> Result<String> {
    match output {
        Value::String(s) => Ok(s.clone()),
        Value::Array(parts) => Ok(parts.iter().filter_map(Value::as_str).collect()),
        other => Err(AllycatError::LlmError(format!(
            "Unexpected prediction output: {other}"
        ))),
    }
}
