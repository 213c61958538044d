//! Neo4j graph storage
//!
//! Document chunks are stored as `Document` nodes carrying their embedding,
//! with a cosine vector index used for retrieval.

pub mod neo4j;
pub mod store;

pub use neo4j::Neo4jClient;
pub use neo4j::Statement;
pub use store::GraphStore;
pub use store::StoredChunk;
