//! Shared helpers: in-process mock servers for the site, Ollama, Neo4j and Replicate
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use allycat::AppConfig;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;
use serde_json::Value;

pub const EMBEDDING_DIM: usize = 4;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A small site: home links to about, a PDF, an external page and a 404
pub fn site_router() -> Router {
    Router::new()
        .route(
            "/",
            get(|| async {
                Html(
                    r#"<html><head><title>AllyCat Home</title>
<meta name="description" content="Home page"></head>
<body><main><h1>Welcome</h1><p>AllyCat answers questions about websites.</p>
<a href="/about">About</a> <a href="/doc.pdf">Report</a>
<a href="https://elsewhere.example/page">Elsewhere</a> <a href="/missing">Gone</a>
</main></body></html>"#,
                )
            }),
        )
        .route(
            "/about",
            get(|| async {
                Html(
                    r#"<html><head><title>About Us</title></head>
<body><main><h2>About</h2><p>We build open source tools.</p>
<a href="/">Home</a></main></body></html>"#,
                )
            }),
        )
        .route(
            "/doc.pdf",
            get(|| async { ([(CONTENT_TYPE, "application/pdf")], b"%PDF-1.4 test".to_vec()) }),
        )
}

/// Requests seen by the mock backend
#[derive(Clone, Default)]
pub struct MockBackend {
    pub statements: Arc<Mutex<Vec<String>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub search_top_k: Arc<Mutex<Vec<u64>>>,
    pub stored: Arc<AtomicUsize>,
    pub embedding_calls: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// `top_k` of every vector search received, in order
    pub fn search_top_k(&self) -> Vec<u64> {
        self.search_top_k.lock().unwrap().clone()
    }

    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }

    /// Ollama (`/api/embeddings`, `/api/generate`) and Neo4j (`/db/neo4j/tx/commit`)
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/embeddings", post(embeddings))
            .route("/api/generate", post(generate))
            .route("/db/neo4j/tx/commit", post(commit))
            .with_state(self.clone())
    }
}

async fn embeddings(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Json<Value> {
    mock.embedding_calls.fetch_add(1, Ordering::SeqCst);
    let len = body["prompt"].as_str().unwrap_or_default().len() as f32;
    Json(json!({ "embedding": [len, 0.25, 0.5, 1.0] }))
}

async fn generate(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["stream"], false);
    mock.prompts
        .lock()
        .unwrap()
        .push(body["prompt"].as_str().unwrap_or_default().to_string());
    Json(json!({ "model": body["model"], "response": "  The answer.  ", "done": true }))
}

fn result(columns: &[&str], rows: Vec<Value>) -> Value {
    let data: Vec<Value> = rows.into_iter().map(|row| json!({ "row": row })).collect();
    json!({ "columns": columns, "data": data })
}

async fn commit(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "errors": [{ "code": "Neo.ClientError.Security.Unauthorized", "message": "No auth" }] })),
        );
    }

    let mut results = Vec::new();
    for stmt in body["statements"].as_array().cloned().unwrap_or_default() {
        let text = stmt["statement"].as_str().unwrap_or_default().to_string();
        mock.statements.lock().unwrap().push(text.clone());

        if text.contains("FAIL") {
            return (
                StatusCode::OK,
                Json(json!({
                    "results": [],
                    "errors": [{ "code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input 'FAIL'" }]
                })),
            );
        }

        let r = if text.starts_with("RETURN 1") {
            result(&["test"], vec![json!([1])])
        } else if text.starts_with("UNWIND") {
            let rows = stmt["parameters"]["rows"].as_array().cloned().unwrap_or_default();
            for row in &rows {
                assert_eq!(row["embedding"].as_array().map(Vec::len), Some(EMBEDDING_DIM));
            }
            mock.stored.fetch_add(rows.len(), Ordering::SeqCst);
            result(&[], vec![])
        } else if text.contains("count(d)") {
            result(&["count"], vec![json!([mock.stored.load(Ordering::SeqCst)])])
        } else if text.contains("queryNodes") {
            let top_k = stmt["parameters"]["top_k"].as_u64().unwrap_or(0);
            mock.search_top_k.lock().unwrap().push(top_k);
            let rows = vec![
                json!(["c1", "AllyCat answers questions about websites.", "About", "about_text.html", "about_text.html", 0.92]),
                json!(["c2", "We build open source tools.", "", "index_text.html", "index_text.html", 0.81]),
            ];
            result(
                &["id", "content", "title", "source", "filename", "score"],
                rows.into_iter().take(top_k as usize).collect(),
            )
        } else {
            if text.contains("DETACH DELETE") {
                mock.stored.store(0, Ordering::SeqCst);
            }
            result(&[], vec![])
        };
        results.push(r);
    }

    (StatusCode::OK, Json(json!({ "results": results, "errors": [] })))
}

/// Configuration pointing every service at `backend`
pub fn test_config(backend: &str, workspace: &Path) -> AppConfig {
    let _ = allycat::logging::init_simple_logging();
    let mut config = AppConfig::default();
    config.neo4j.uri = backend.to_string();
    config.neo4j.password = "secret".to_string();
    config.embeddings.endpoint = backend.to_string();
    config.embeddings.dimension = EMBEDDING_DIM;
    config.llm.ollama_endpoint = backend.to_string();
    config.crawl.output_dir = workspace.join("crawled").display().to_string();
    config.processing.processed_dir = workspace.join("processed").display().to_string();
    config.logging.dir = workspace.join("logs").display().to_string();
    config
}
