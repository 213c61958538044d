//! CLI command handlers module
//!
//! One file per pipeline stage:
//! - crawl: website download
//! - process: HTML to chunked documents
//! - save: embeddings and Neo4j storage
//! - query: one-shot and interactive questions
//! - serve: web app
//! - run: crawl, process and save end to end
//! - info: connectivity check and configuration display

pub mod crawl;
pub mod info;
pub mod process;
pub mod query;
pub mod run;
pub mod save;
pub mod serve;

pub use crawl::*;
pub use info::*;
pub use process::*;
pub use query::*;
pub use run::*;
pub use save::*;
pub use serve::*;
