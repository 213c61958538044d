//! Vector retrieval of document chunks

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::graph::GraphStore;
use crate::rag::SearchResult;

/// Retriever backed by the graph store's vector index
pub struct Retriever {
    store: Arc<GraphStore>,
    embedding_service: Arc<EmbeddingService>,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(store: Arc<GraphStore>, embedding_service: Arc<EmbeddingService>) -> Self {
        Self {
            store,
            embedding_service,
        }
    }

    /// Embed the query and return the `top_k` nearest chunks, best first
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        debug!("Performing vector search (top_k {}): {}", top_k, query);

        let query_embedding = self.embedding_service.generate(query).await?;
        let hits = self.store.vector_search(&query_embedding, top_k).await?;

        debug!("Vector search returned {} chunks", hits.len());
        Ok(hits
            .into_iter()
            .map(|(chunk, score)| SearchResult { chunk, score })
            .collect())
    }
}
