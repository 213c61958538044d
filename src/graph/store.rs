//! Document chunk storage and vector search in Neo4j

use serde_json::json;
use serde_json::Value;
use tracing::debug;
use tracing::info;

use super::neo4j::Neo4jClient;
use super::neo4j::Row;
use super::neo4j::Statement;
use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::AllycatError;
use crate::errors::Result;
use crate::processing::ProcessedDocument;

/// Documents embedded and written per transaction
pub const UPSERT_BATCH_SIZE: usize = 32;

const UPSERT_DOCUMENTS: &str = "UNWIND $rows AS row \
     MERGE (d:Document {id: row.id}) \
     SET d.content = row.content, \
         d.source = row.source, \
         d.title = row.title, \
         d.filename = row.filename, \
         d.content_type = row.content_type, \
         d.last_modified = row.last_modified, \
         d.created = row.created, \
         d.chunk_index = row.chunk_index, \
         d.embedding = row.embedding";

const VECTOR_SEARCH: &str = "CALL db.index.vector.queryNodes($index_name, $top_k, $embedding) \
     YIELD node, score \
     RETURN node.id AS id, node.content AS content, node.title AS title, \
            node.source AS source, node.filename AS filename, score \
     ORDER BY score DESC";

/// A document chunk as stored in the graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredChunk {
    pub id: String,
    pub content: String,
    pub title: String,
    pub source: String,
    pub filename: String,
}

/// Graph store for `Document` nodes with a vector index over `embedding`
#[derive(Clone)]
pub struct GraphStore {
    client: Neo4jClient,
    index_name: String,
}

/// Index names are interpolated into Cypher, so only identifiers are allowed
pub fn validate_index_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AllycatError::ConfigError(format!(
            "Invalid vector index name: {name:?}"
        )))
    }
}

fn str_field(row: &Row, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl GraphStore {
    /// Create a store from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        validate_index_name(&config.neo4j.vector_index)?;
        Ok(Self {
            client: Neo4jClient::new(&config.neo4j)?,
            index_name: config.neo4j.vector_index.clone(),
        })
    }

    /// Create from an existing client
    pub fn from_client(client: Neo4jClient, index_name: impl Into<String>) -> Result<Self> {
        let index_name = index_name.into();
        validate_index_name(&index_name)?;
        Ok(Self { client, index_name })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Check that the server answers queries with the configured credentials
    pub async fn verify_connectivity(&self) -> Result<()> {
        let rows = self.client.run("RETURN 1 AS test", json!({})).await?;
        let ok = rows
            .first()
            .and_then(|row| row.get("test"))
            .and_then(Value::as_i64)
            == Some(1);
        if ok {
            Ok(())
        } else {
            Err(AllycatError::GraphError(
                "Unexpected response to connectivity check".to_string(),
            ))
        }
    }

    /// Drop and recreate the cosine vector index over `Document.embedding`
    pub async fn recreate_vector_index(&self, dimensions: usize) -> Result<()> {
        info!(
            "Creating vector index `{}` ({} dimensions, cosine)",
            self.index_name, dimensions
        );

        self.client
            .run(&format!("DROP INDEX `{}` IF EXISTS", self.index_name), json!({}))
            .await?;

        let create = format!(
            "CREATE VECTOR INDEX `{}` FOR (n:Document) ON (n.embedding) \
             OPTIONS {{indexConfig: {{`vector.dimensions`: {}, `vector.similarity_function`: 'cosine'}}}}",
            self.index_name, dimensions
        );
        self.client.run(&create, json!({})).await?;
        Ok(())
    }

    /// Insert or update document nodes with their embeddings
    ///
    /// `documents` and `embeddings` are matched by position.
    pub async fn upsert_documents(
        &self,
        documents: &[ProcessedDocument],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if documents.len() != embeddings.len() {
            return Err(AllycatError::GraphError(format!(
                "{} documents but {} embeddings",
                documents.len(),
                embeddings.len()
            )));
        }
        if documents.is_empty() {
            return Ok(());
        }

        let rows: Vec<Value> = documents
            .iter()
            .zip(embeddings)
            .map(|(doc, embedding)| {
                json!({
                    "id": doc.id,
                    "content": doc.content,
                    "source": doc.metadata.source_file,
                    "title": doc.metadata.title,
                    "filename": doc.metadata.filename,
                    "content_type": doc.metadata.content_type,
                    "last_modified": doc.metadata.last_modified,
                    "created": doc.metadata.created,
                    "chunk_index": doc.metadata.chunk_index,
                    "embedding": embedding,
                })
            })
            .collect();

        self.client
            .run_all(&[Statement::new(UPSERT_DOCUMENTS, json!({ "rows": rows }))])
            .await?;
        debug!("Upserted {} documents", documents.len());
        Ok(())
    }

    /// Embed every document and store it, in batches
    ///
    /// Returns the number of documents stored.
    pub async fn create_knowledge_graph(
        &self,
        documents: &[ProcessedDocument],
        embeddings: &EmbeddingService,
    ) -> Result<usize> {
        info!("Creating knowledge graph from {} documents...", documents.len());
        let mut stored = 0;

        for batch in documents.chunks(UPSERT_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|d| d.content.as_str()).collect();
            let vectors = embeddings.generate_batch(&texts).await?;
            self.upsert_documents(batch, &vectors).await?;
            stored += batch.len();
            info!("Stored {}/{} documents", stored, documents.len());
        }

        info!("Knowledge graph creation complete!");
        Ok(stored)
    }

    /// Nearest document chunks by cosine similarity, best first
    pub async fn vector_search(
        &self,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(StoredChunk, f32)>> {
        let rows = self
            .client
            .run(
                VECTOR_SEARCH,
                json!({
                    "index_name": self.index_name,
                    "top_k": top_k,
                    "embedding": embedding,
                }),
            )
            .await?;

        let hits = rows
            .iter()
            .map(|row| {
                let chunk = StoredChunk {
                    id: str_field(row, "id"),
                    content: str_field(row, "content"),
                    title: str_field(row, "title"),
                    source: str_field(row, "source"),
                    filename: str_field(row, "filename"),
                };
                let score = row.get("score").and_then(Value::as_f64).unwrap_or(0.0) as f32;
                (chunk, score)
            })
            .collect();

        Ok(hits)
    }

    /// Number of `Document` nodes
    pub async fn count_documents(&self) -> Result<u64> {
        let rows = self
            .client
            .run("MATCH (d:Document) RETURN count(d) AS count", json!({}))
            .await?;
        Ok(rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    /// Remove every `Document` node
    pub async fn delete_all_documents(&self) -> Result<()> {
        info!("Deleting all Document nodes");
        self.client
            .run("MATCH (d:Document) DETACH DELETE d", json!({}))
            .await?;
        Ok(())
    }
}
