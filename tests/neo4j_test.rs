//! Neo4j HTTP client against a mock transactional endpoint

mod common;

use allycat::config::Neo4jConfig;
use allycat::graph::GraphStore;
use allycat::graph::Neo4jClient;
use allycat::graph::Statement;
use allycat::AllycatError;
use common::MockBackend;
use serde_json::json;

fn neo4j_config(uri: &str) -> Neo4jConfig {
    Neo4jConfig {
        uri: uri.to_string(),
        password: "secret".to_string(),
        ..Neo4jConfig::default()
    }
}

#[tokio::test]
async fn test_run_returns_rows_by_column() {
    let mock = MockBackend::default();
    let base = common::spawn_server(mock.router()).await;
    let client = Neo4jClient::new(&neo4j_config(&base)).unwrap();

    let rows = client.run("RETURN 1 AS test", json!({})).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["test"], 1);
}

#[tokio::test]
async fn test_run_all_returns_one_result_per_statement() {
    let mock = MockBackend::default();
    let base = common::spawn_server(mock.router()).await;
    let client = Neo4jClient::new(&neo4j_config(&base)).unwrap();

    let results = client
        .run_all(&[
            Statement::new("RETURN 1 AS test", json!({})),
            Statement::new("MATCH (d:Document) RETURN count(d) AS count", json!({})),
        ])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1][0]["count"], 0);
    assert_eq!(mock.statements().len(), 2);
}

#[tokio::test]
async fn test_server_errors_become_graph_errors() {
    let mock = MockBackend::default();
    let base = common::spawn_server(mock.router()).await;
    let client = Neo4jClient::new(&neo4j_config(&base)).unwrap();

    match client.run("FAIL", json!({})).await {
        Err(AllycatError::GraphError(msg)) => {
            assert!(msg.starts_with("Neo.ClientError.Statement.SyntaxError: "), "{msg}");
        }
        other => panic!("expected GraphError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_database_is_http_status_error() {
    let mock = MockBackend::default();
    let base = common::spawn_server(mock.router()).await;
    let config = Neo4jConfig {
        database: "missing".to_string(),
        ..neo4j_config(&base)
    };
    let client = Neo4jClient::new(&config).unwrap();

    match client.run("RETURN 1 AS test", json!({})).await {
        Err(AllycatError::GraphError(msg)) => assert!(msg.contains("404"), "{msg}"),
        other => panic!("expected GraphError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_vector_search_parses_hits() {
    let mock = MockBackend::default();
    let base = common::spawn_server(mock.router()).await;
    let store = GraphStore::from_client(
        Neo4jClient::new(&neo4j_config(&base)).unwrap(),
        "document_embeddings",
    )
    .unwrap();

    store.verify_connectivity().await.unwrap();
    let hits = store.vector_search(&[0.1, 0.2, 0.3, 0.4], 1).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0.id, "c1");
    assert_eq!(hits[0].0.filename, "about_text.html");
    assert!((hits[0].1 - 0.92).abs() < 1e-6);
}

#[tokio::test]
async fn test_unreachable_server() {
    let client = Neo4jClient::new(&neo4j_config("http://127.0.0.1:9")).unwrap();
    let store = GraphStore::from_client(client, "idx").unwrap();
    assert!(matches!(
        store.verify_connectivity().await,
        Err(AllycatError::HttpError(_))
    ));
}
