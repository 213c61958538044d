//! LLM backends for answer generation
//!
//! Two backends are supported, selected by `LLM_RUN_ENV`:
//! - `local_ollama`: a local Ollama server (`/api/generate`)
//! - `replicate`: hosted models through the Replicate predictions API

pub mod client;
pub mod prompts;

use std::fmt;
use std::str::FromStr;

pub use client::LlmService;
pub use prompts::PromptTemplate;
pub use prompts::RagPrompts;

use crate::errors::AllycatError;
use crate::errors::Result;

/// Where the answering model runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    LocalOllama,
    Replicate,
}

impl LlmBackend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LocalOllama => "local_ollama",
            Self::Replicate => "replicate",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = AllycatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local_ollama" => Ok(Self::LocalOllama),
            "replicate" => Ok(Self::Replicate),
            other => Err(AllycatError::ConfigError(format!(
                "Unsupported LLM environment: {other}"
            ))),
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("local_ollama".parse::<LlmBackend>().unwrap(), LlmBackend::LocalOllama);
        assert_eq!(" Replicate ".parse::<LlmBackend>().unwrap(), LlmBackend::Replicate);
        assert!(matches!(
            "openai".parse::<LlmBackend>(),
            Err(AllycatError::ConfigError(_))
        ));
    }

    #[test]
    fn test_backend_display_round_trips() {
        for backend in [LlmBackend::LocalOllama, LlmBackend::Replicate] {
            assert_eq!(backend.to_string().parse::<LlmBackend>().unwrap(), backend);
        }
    }
}
