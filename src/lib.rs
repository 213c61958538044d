pub mod api;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod embeddings;
pub mod errors;
pub mod graph;
pub mod llm;
pub mod logging;
pub mod processing;
pub mod rag;

#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
