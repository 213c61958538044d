//! RAG (Retrieval-Augmented Generation) module
//!
//! Answers questions about the crawled site:
//! - Vector retrieval of document chunks from Neo4j
//! - Context assembly from retrieved chunks
//! - LLM answer generation constrained to that context
//!
//! # Examples
//!
//! ```rust,no_run
//! use allycat::rag::RagService;
//! use allycat::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config)?;
//!
//!     let response = service.query("What is this site about?", 5).await?;
//!     println!("Answer: {}", response.answer);
//!     println!("Sources: {} chunks", response.sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod retriever;

pub use context::ContextAssembler;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use retriever::Retriever;

use crate::graph::StoredChunk;

/// Retrieved chunk with its similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub chunk: StoredChunk,
    pub score: f32,
}
