//! Processed document chunks and their JSONL storage

use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::errors::AllycatError;
use crate::errors::Result;

/// File name of the chunk file written by the processing stage
pub const PROCESSED_DOCUMENTS_FILE: &str = "processed_documents.jsonl";

/// Metadata carried by every chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub source_file: String,
    pub filename: String,
    pub last_modified: String,
    pub created: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One chunk of a processed page, ready for embedding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    #[serde(default)]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl ProcessedDocument {
    pub fn new(content: String, metadata: DocumentMetadata) -> Self {
        let id = chunk_id(&metadata.source_file, metadata.chunk_index, &content);
        Self {
            id,
            content,
            metadata,
        }
    }
}

/// Stable identifier of a chunk: hex SHA-256 of source, index and content
pub fn chunk_id(source_file: &str, chunk_index: usize, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_file.as_bytes());
    hasher.update([0u8]);
    hasher.update(chunk_index.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Write documents as JSON lines
pub fn write_documents(path: &Path, documents: &[ProcessedDocument]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    for doc in documents {
        serde_json::to_writer(&mut writer, doc)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Load documents from a JSON lines file
///
/// Blank lines are skipped. Documents written without an `id` get one.
pub fn load_documents(path: &Path) -> Result<Vec<ProcessedDocument>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut documents = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut doc: ProcessedDocument = serde_json::from_str(&line).map_err(|e| {
            AllycatError::ProcessingError(format!(
                "{}: invalid document on line {}: {e}",
                path.display(),
                idx + 1
            ))
        })?;
        if doc.id.is_empty() {
            doc.id = chunk_id(&doc.metadata.source_file, doc.metadata.chunk_index, &doc.content);
        }
        documents.push(doc);
    }

    Ok(documents)
}
