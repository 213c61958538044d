//! Text preprocessing utilities for embedding generation
//!
//! Markdown chunks carry newlines, list markers and the odd control character
//! from crawled pages; embedding endpoints want a single clean line.

use tracing::debug;
use tracing::warn;

use crate::errors::AllycatError;

/// Longest text (in characters) sent to the embedding model
pub const MAX_EMBEDDING_CHARS: usize = 8000;

/// Preprocess text for embedding generation
///
/// This function handles:
/// - Normalizing whitespace and newlines
/// - Replacing control characters
/// - Truncating overlong text at a word boundary
pub fn preprocess_text_for_embedding(text: &str) -> Result<String, AllycatError> {
    if text.is_empty() {
        return Err(AllycatError::EmbeddingError(
            "Empty text provided".to_string(),
        ));
    }

    let sanitized = sanitize_text(text);
    if sanitized.is_empty() {
        return Err(AllycatError::EmbeddingError(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    let char_count = sanitized.chars().count();
    if char_count > MAX_EMBEDDING_CHARS {
        warn!(
            "Text too long ({} chars), truncating to {}",
            char_count, MAX_EMBEDDING_CHARS
        );
        return Ok(truncate_at_word(&sanitized, MAX_EMBEDDING_CHARS));
    }

    debug!(
        "Preprocessed text: {} -> {} chars",
        text.len(),
        sanitized.len()
    );
    Ok(sanitized)
}

/// Replace control characters and collapse all whitespace runs to one space
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Truncate to at most `max_chars` characters, preferring the last space
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(idx) if idx > truncated.len() / 2 => truncated[..idx].to_string(),
        _ => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_newlines_and_tabs() {
        let out = preprocess_text_for_embedding("# Title\n\n- item one\r\n\t- item two").unwrap();
        assert_eq!(out, "# Title - item one - item two");
    }

    #[test]
    fn test_replaces_control_characters() {
        let out = preprocess_text_for_embedding("bell\u{7}here").unwrap();
        assert_eq!(out, "bell here");
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert!(preprocess_text_for_embedding("").is_err());
        assert!(preprocess_text_for_embedding(" \n\t ").is_err());
    }

    #[test]
    fn test_keeps_unicode() {
        let out = preprocess_text_for_embedding("Zürich  🚀  AI").unwrap();
        assert_eq!(out, "Zürich 🚀 AI");
    }

    #[test]
    fn test_truncates_long_text_on_word_boundary() {
        let text = "word ".repeat(3000);
        let out = preprocess_text_for_embedding(&text).unwrap();
        assert!(out.chars().count() <= MAX_EMBEDDING_CHARS);
        assert!(out.ends_with("word"));
    }
}
