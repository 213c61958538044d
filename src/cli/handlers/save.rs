//! Save handler: embed processed documents and store them in Neo4j

use std::path::Path;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::embeddings::EmbeddingService;
use crate::graph::GraphStore;
use crate::processing::load_documents;
use crate::processing::PROCESSED_DOCUMENTS_FILE;
use crate::AppConfig;
use crate::Result;

/// Returns the number of documents stored
pub async fn handle_save(config: &AppConfig, reset: bool) -> Result<usize> {
    let path = Path::new(&config.processing.processed_dir).join(PROCESSED_DOCUMENTS_FILE);
    let documents = load_documents(&path)?;
    print_info(&format!(
        "Loaded {} documents from {}",
        documents.len(),
        path.display()
    ));

    if documents.is_empty() {
        print_warning("Nothing to save. Run `allycat process` first.");
        return Ok(0);
    }

    let store = GraphStore::new(config)?;
    store.verify_connectivity().await?;

    if reset {
        store.delete_all_documents().await?;
    }

    let embeddings = EmbeddingService::new(config)?;
    store.recreate_vector_index(embeddings.dimension()).await?;
    let stored = store.create_knowledge_graph(&documents, &embeddings).await?;

    print_success(&format!(
        "Stored {} documents in Neo4j (index `{}`)",
        stored,
        store.index_name()
    ));
    Ok(stored)
}
