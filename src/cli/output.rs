//! CLI output formatting utilities

use crate::crawler::CrawlReport;
use crate::processing::ProcessingReport;
use crate::rag::SearchResult;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the string with a "..." suffix if it was truncated.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print crawl summary
pub fn print_crawl_report(report: &CrawlReport) {
    println!("🕷️  Crawl finished:");
    println!("  Downloaded: {}", report.downloaded);
    println!("  Visited:    {}", report.visited);
    println!("  Failed:     {}", report.failed);
}

/// Print processing summary
pub fn print_processing_report(report: &ProcessingReport) {
    println!("📄 Processing finished:");
    println!("  Files processed: {}", report.files_processed);
    println!("  Files skipped:   {}", report.files_skipped);
    println!("  Chunks:          {}", report.documents);
    println!("  Output:          {}", report.output_file.display());
}

const MAX_TITLE_CHARS: usize = 80;

/// Format retrieved sources, one per line
#[must_use]
pub fn format_sources(sources: &[SearchResult]) -> String {
    let mut out = format!("Sources ({}):\n", sources.len());
    for (idx, source) in sources.iter().enumerate() {
        let title = if source.chunk.title.is_empty() {
            "Untitled".to_string()
        } else {
            truncate_str(&source.chunk.title, MAX_TITLE_CHARS)
        };
        out.push_str(&format!(
            "  {}. {} [{}] (score {:.3})\n",
            idx + 1,
            title,
            source.chunk.source,
            source.score
        ));
    }
    out
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    let config = config.redacted();
    println!("📋 AllyCat Configuration:");
    println!();

    println!("🗄️  Neo4j:");
    println!("  URI: {}", config.neo4j.uri);
    println!("  User: {}", config.neo4j.user);
    println!("  Password: {}", config.neo4j.password);
    println!("  Database: {}", config.neo4j.database);
    println!("  Vector index: {}", config.neo4j.vector_index);
    println!();

    println!("🕷️  Crawl:");
    println!("  Max depth: {}", config.crawl.max_depth);
    println!("  Max downloads: {}", config.crawl.max_downloads);
    println!("  Output dir: {}", config.crawl.output_dir);
    println!();

    println!("📄 Processing:");
    println!("  Output dir: {}", config.processing.processed_dir);
    println!("  Chunk size: {}", config.processing.chunk_size);
    println!("  Chunk overlap: {}", config.processing.chunk_overlap);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!();

    println!("🤖 LLM:");
    println!("  Run env: {}", config.llm.run_env);
    println!("  Model: {}", config.llm.model);
    println!("  Ollama endpoint: {}", config.llm.ollama_endpoint);
    if let Some(token) = &config.llm.replicate_api_token {
        println!("  Replicate token: {token}");
    }
    println!();

    println!("🌐 Web app:");
    println!("  Listen: {}:{}", config.server.host, config.server.port);
    println!("  Top K: {}", config.server.top_k);
    println!();

    println!("📝 Logging:");
    println!(
        "  Level: {}",
        config.logging.level.as_deref().unwrap_or("RUST_LOG or info")
    );
    println!("  Dir: {}", config.logging.dir);
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
