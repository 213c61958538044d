//! Processing of crawled pages
//!
//! Converts crawled HTML into markdown, splits it into overlapping chunks and
//! stores the chunks with page metadata as JSON lines for the graph stage.

pub mod chunker;
pub mod documents;
pub mod html;
pub mod pipeline;

pub use chunker::chunk_text;
pub use chunker::ChunkingOptions;
pub use documents::load_documents;
pub use documents::write_documents;
pub use documents::DocumentMetadata;
pub use documents::ProcessedDocument;
pub use documents::PROCESSED_DOCUMENTS_FILE;
pub use html::extract_metadata;
pub use html::html_to_markdown;
pub use pipeline::process_directory;
pub use pipeline::process_html_file;
pub use pipeline::ProcessingReport;
