//! Crawled HTML → markdown chunks with metadata

use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use tracing::info;
use tracing::warn;

use super::chunker::chunk_text;
use super::chunker::ChunkingOptions;
use super::documents::write_documents;
use super::documents::DocumentMetadata;
use super::documents::ProcessedDocument;
use super::documents::PROCESSED_DOCUMENTS_FILE;
use super::html::extract_metadata;
use super::html::html_to_markdown;
use crate::errors::Result;

/// Suffix the crawler gives saved HTML pages
pub const HTML_SUFFIX: &str = "_text.html";

/// Summary of a processing run
#[derive(Debug, Clone, Default)]
pub struct ProcessingReport {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub documents: usize,
    pub output_file: PathBuf,
}

/// Process one crawled HTML file into chunk documents
pub fn process_html_file(path: &Path, options: ChunkingOptions) -> Result<Vec<ProcessedDocument>> {
    let bytes = std::fs::read(path)?;
    let html = String::from_utf8_lossy(&bytes);

    let page = extract_metadata(&html, path)?;
    let markdown = html_to_markdown(&html)?;
    let chunks = chunk_text(&markdown, options);

    let last_modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let total_chunks = chunks.len();
    let documents = chunks
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| {
            ProcessedDocument::new(
                content,
                DocumentMetadata {
                    title: page.title.clone(),
                    description: page.description.clone(),
                    content_type: page.content_type.clone(),
                    source_file: path.display().to_string(),
                    filename: filename.clone(),
                    last_modified: last_modified.clone(),
                    created: created.clone(),
                    chunk_index,
                    total_chunks,
                },
            )
        })
        .collect();

    Ok(documents)
}

/// Crawled HTML files in a directory, sorted by name
pub fn list_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().ends_with(HTML_SUFFIX))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Process every crawled HTML page into `processed_documents.jsonl`
///
/// The processed directory is emptied first. The first chunk of each page is
/// also written as `<page>.md` for inspection. Pages that fail to process are
/// logged and skipped.
pub fn process_directory(
    crawl_dir: &Path,
    processed_dir: &Path,
    options: ChunkingOptions,
) -> Result<ProcessingReport> {
    if processed_dir.exists() {
        std::fs::remove_dir_all(processed_dir)?;
    }
    std::fs::create_dir_all(processed_dir)?;
    info!("Cleared processed data directory: {}", processed_dir.display());

    let html_files = list_html_files(crawl_dir)?;
    info!("Found {} HTML files to process", html_files.len());

    let mut report = ProcessingReport::default();
    let mut all_documents = Vec::new();

    for file in &html_files {
        let documents = match process_html_file(file, options) {
            Ok(docs) => docs,
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                report.files_skipped += 1;
                continue;
            }
        };

        if let Some(first) = documents.first() {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            std::fs::write(processed_dir.join(format!("{stem}.md")), &first.content)?;
        }

        info!(
            "Processed HTML '{}' into {} chunks",
            file.display(),
            documents.len()
        );
        report.files_processed += 1;
        all_documents.extend(documents);
    }

    let output_file = processed_dir.join(PROCESSED_DOCUMENTS_FILE);
    write_documents(&output_file, &all_documents)?;

    info!(
        "Created {} document chunks from {} HTML files",
        all_documents.len(),
        report.files_processed
    );

    report.documents = all_documents.len();
    report.output_file = output_file;
    Ok(report)
}
