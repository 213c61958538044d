//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::graph::GraphStore;
use crate::llm::LlmService;
use crate::rag::RagService;
use crate::Result;

/// Build the application router with middleware layers
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: &str, port: u16) -> Result<()> {
    info!("Starting AllyCat web app...");

    let store = Arc::new(GraphStore::new(config)?);
    let embedding_service = Arc::new(EmbeddingService::new(config)?);
    let llm_service = LlmService::new(config)?;
    let rag_service = Arc::new(RagService::from_services(
        store.clone(),
        embedding_service,
        llm_service,
    ));

    let state = AppState {
        rag_service,
        store,
        default_top_k: config.server.top_k,
    };
    let app = build_router(state, config.server.enable_cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health  - Health check");
    info!("  POST /api/query   - Ask a question");
    info!("  GET  /api/stats   - Document count");

    axum::serve(listener, app).await?;

    Ok(())
}
