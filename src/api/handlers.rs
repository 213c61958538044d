//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::api::types::QueryRequest;
use crate::api::types::QueryResponse;
use crate::api::types::SourceResponse;
use crate::api::types::StatsResponse;
use crate::api::types::MAX_TOP_K;
use crate::graph::GraphStore;
use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<RagService>,
    pub store: Arc<GraphStore>,
    pub default_top_k: usize,
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

/// Health check handler
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Answer a question from the knowledge graph
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> ApiResult<QueryResponse> {
    info!("POST /api/query: {}", req.question);

    let question = req.question.trim();
    if question.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Question must not be empty")),
        );
    }

    let top_k = req
        .top_k
        .unwrap_or(state.default_top_k)
        .clamp(1, MAX_TOP_K);

    match state.rag_service.query(question, top_k).await {
        Ok(response) => (
            StatusCode::OK,
            Json(ApiResponse::success(QueryResponse {
                sources: response.sources.iter().map(SourceResponse::from).collect(),
                answer: response.answer,
            })),
        ),
        Err(e) => {
            error!("Error during query: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Error processing query: {e}"))),
            )
        }
    }
}

/// Get statistics
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<StatsResponse> {
    info!("GET /api/stats");

    match state.store.count_documents().await {
        Ok(total_documents) => (
            StatusCode::OK,
            Json(ApiResponse::success(StatsResponse {
                total_documents,
                vector_index: state.store.index_name().to_string(),
            })),
        ),
        Err(e) => {
            error!("Error counting documents: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}
