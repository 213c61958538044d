//! Overlapping text chunking with sentence-boundary snapping

/// How far past (or before) the nominal end to look for a sentence boundary
const BOUNDARY_WINDOW: usize = 100;

/// Chunking parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingOptions {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingOptions {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        Self {
            chunk_size: config.processing.chunk_size,
            overlap: config.processing.chunk_overlap,
        }
    }
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into overlapping chunks, measured in characters
///
/// Each chunk nominally spans `chunk_size` characters and, except for the
/// first, starts `overlap` characters before the previous chunk ended. When
/// more text follows, the end moves to the last sentence terminator followed
/// by whitespace within `BOUNDARY_WINDOW` characters of the nominal end.
/// Chunks are trimmed; empty chunks are dropped.
pub fn chunk_text(text: &str, options: ChunkingOptions) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let chunk_size = options.chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < len {
        let mut end = start + chunk_size;
        let slice_start = if start > 0 {
            start.saturating_sub(options.overlap)
        } else {
            0
        };

        if end < len {
            let lower = end.saturating_sub(BOUNDARY_WINDOW);
            let mut i = (end + BOUNDARY_WINDOW).min(len) - 1;
            while i > lower {
                // Must stay past `start` so every iteration makes progress
                if i > start
                    && i + 1 < len
                    && is_sentence_end(chars[i])
                    && chars[i + 1].is_whitespace()
                {
                    end = i + 1;
                    break;
                }
                i -= 1;
            }
        }

        let end = end.min(len);
        let chunk: String = chars[slice_start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        start = end;
    }

    chunks
}
