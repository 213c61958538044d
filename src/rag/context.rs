//! Context assembly from retrieved chunks

use crate::rag::SearchResult;

/// Assembler for creating LLM context from search results
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    /// Create a new context assembler
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Join results as numbered documents, stopping before the length limit
    ///
    /// The limit counts characters, not bytes.
    #[must_use]
    pub fn assemble(&self, results: &[SearchResult]) -> String {
        let mut context = String::new();
        let mut length = 0;

        for (idx, result) in results.iter().enumerate() {
            let entry = Self::format_entry(idx + 1, result);
            let entry_length = entry.chars().count();

            if length + entry_length > self.max_context_length {
                break;
            }

            context.push_str(&entry);
            length += entry_length;
        }

        context
    }

    fn format_entry(number: usize, result: &SearchResult) -> String {
        let mut entry = format!("\n[Document {number}]\n");
        if !result.chunk.title.is_empty() {
            entry.push_str(&format!("Title: {}\n", result.chunk.title));
        }
        if !result.chunk.source.is_empty() {
            entry.push_str(&format!("Source: {}\n", result.chunk.source));
        }
        entry.push_str(&result.chunk.content);
        entry.push('\n');
        entry
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(32_000)
    }
}
