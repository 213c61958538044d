//! Web app router exercised in-process

mod common;

use std::sync::Arc;

use allycat::api::build_router;
use allycat::api::types::ApiResponse;
use allycat::api::types::HealthResponse;
use allycat::api::types::QueryResponse;
use allycat::api::types::StatsResponse;
use allycat::api::AppState;
use allycat::embeddings::EmbeddingService;
use allycat::graph::GraphStore;
use allycat::llm::LlmService;
use allycat::rag::RagService;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::MockBackend;
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

async fn app(mock: &MockBackend) -> Router {
    let backend = common::spawn_server(mock.router()).await;
    let workspace = std::env::temp_dir();
    let config = common::test_config(&backend, &workspace);

    let store = Arc::new(GraphStore::new(&config).unwrap());
    let rag_service = Arc::new(RagService::from_services(
        store.clone(),
        Arc::new(EmbeddingService::new(&config).unwrap()),
        LlmService::new(&config).unwrap(),
    ));

    build_router(
        AppState {
            rag_service,
            store,
            default_top_k: 25,
        },
        true,
    )
}

async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_query(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ApiResponse<HealthResponse> = read_json(response).await;
    assert!(body.success);
    let health = body.data.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_query_returns_answer_and_sources() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(post_query(&json!({ "question": "What is AllyCat?", "top_k": 2 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ApiResponse<QueryResponse> = read_json(response).await;
    let data = body.data.unwrap();
    assert_eq!(data.answer, "The answer.");
    assert_eq!(data.sources.len(), 2);
    assert_eq!(data.sources[0].title, "About");
    assert_eq!(data.sources[1].source, "index_text.html");
}

#[tokio::test]
async fn test_query_uses_default_top_k() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(post_query(&json!({ "question": "What is AllyCat?" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(mock.statements().iter().any(|s| s.contains("queryNodes")));
    assert_eq!(mock.search_top_k(), vec![25]);
}

#[tokio::test]
async fn test_query_top_k_zero_is_raised_to_one() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(post_query(&json!({ "question": "What is AllyCat?", "top_k": 0 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mock.search_top_k(), vec![1]);
    let body: ApiResponse<QueryResponse> = read_json(response).await;
    assert_eq!(body.data.unwrap().sources.len(), 1);
}

#[tokio::test]
async fn test_query_top_k_is_capped() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(post_query(&json!({ "question": "What is AllyCat?", "top_k": 1000 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(mock.search_top_k(), vec![100]);
}

#[tokio::test]
async fn test_empty_question_is_bad_request() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(post_query(&json!({ "question": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ApiResponse<QueryResponse> = read_json(response).await;
    assert!(!body.success);
    assert_eq!(body.error.as_deref(), Some("Question must not be empty"));
    assert!(mock.prompts().is_empty());
}

#[tokio::test]
async fn test_stats_counts_documents() {
    let mock = MockBackend::default();
    mock.stored.store(7, std::sync::atomic::Ordering::SeqCst);
    let response = app(&mock)
        .await
        .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ApiResponse<StatsResponse> = read_json(response).await;
    let stats = body.data.unwrap();
    assert_eq!(stats.total_documents, 7);
    assert_eq!(stats.vector_index, "document_embeddings");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let mock = MockBackend::default();
    let response = app(&mock)
        .await
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
