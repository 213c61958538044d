//! Complete RAG pipeline: Retrieve -> Assemble -> Generate

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::AllycatError;
use crate::errors::Result;
use crate::graph::GraphStore;
use crate::llm::LlmService;
use crate::llm::PromptTemplate;
use crate::llm::RagPrompts;
use crate::rag::ContextAssembler;
use crate::rag::Retriever;
use crate::rag::SearchResult;

/// Complete RAG service
pub struct RagService {
    retriever: Retriever,
    context_assembler: ContextAssembler,
    llm_service: LlmService,
    prompt: PromptTemplate,
}

impl RagService {
    /// Create a new RAG service
    ///
    /// # Errors
    /// - Invalid Neo4j or vector index configuration
    /// - Embedding service configuration errors
    /// - LLM service configuration errors (unknown backend, missing token)
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(GraphStore::new(config)?);
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        let llm_service = LlmService::new(config)?;
        Ok(Self::from_services(store, embedding_service, llm_service))
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        store: Arc<GraphStore>,
        embedding_service: Arc<EmbeddingService>,
        llm_service: LlmService,
    ) -> Self {
        Self {
            retriever: Retriever::new(store, embedding_service),
            context_assembler: ContextAssembler::default(),
            llm_service,
            prompt: RagPrompts::graphrag(),
        }
    }

    /// Perform a complete RAG query
    ///
    /// An empty retrieval still reaches the LLM; the prompt tells it to say
    /// the answer is not in the context.
    ///
    /// # Errors
    /// - Empty question
    /// - Embedding generation or Neo4j query errors
    /// - LLM generation errors
    pub async fn query(&self, question: &str, top_k: usize) -> Result<RagResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AllycatError::Custom("Question must not be empty".to_string()));
        }
        info!("Processing query: {}", question);

        debug!("Step 1: Searching knowledge graph");
        let sources = self.retriever.search(question, top_k).await?;
        debug!("Retrieved {} chunks", sources.len());

        debug!("Step 2: Assembling context");
        let context = self.context_assembler.assemble(&sources);

        debug!("Step 3: Generating answer");
        let prompt = self.build_prompt(question, &context);
        let answer = self.llm_service.generate(&prompt).await?;

        info!("Search complete, processing response...");

        Ok(RagResponse {
            answer: answer.trim().to_string(),
            sources,
            context,
            query: question.to_string(),
        })
    }

    /// Answer a question, rendering any failure as text
    pub async fn answer(&self, question: &str, top_k: usize) -> String {
        match self.query(question, top_k).await {
            Ok(response) => response.answer,
            Err(e) => {
                error!("Error during query: {}", e);
                format!("Error processing query: {e}")
            }
        }
    }

    fn build_prompt(&self, question: &str, context: &str) -> String {
        let values = HashMap::from([
            ("context", context),
            ("examples", ""),
            ("query_text", question),
        ]);
        self.prompt.render(&values)
    }
}

/// RAG response
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: String,
    pub sources: Vec<SearchResult>,
    pub context: String,
    pub query: String,
}
