//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::rag::SearchResult;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Question request
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// Falls back to `server.top_k`
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Upper bound on `top_k` accepted from clients
pub const MAX_TOP_K: usize = 100;

/// Answer with the chunks it was grounded on
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceResponse>,
}

/// A retrieved chunk as shown to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceResponse {
    pub title: String,
    pub source: String,
    pub score: f32,
}

impl From<&SearchResult> for SourceResponse {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.chunk.title.clone(),
            source: result.chunk.source.clone(),
            score: result.score,
        }
    }
}

/// Statistics response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_documents: u64,
    pub vector_index: String,
}
