//! Supported LLM backends.

use crate::error_handler::{ConfigError, LlmError};

/// The provider (backend) used for model inference.
///
/// New backends are added by extending this enum and providing a service
/// implementation under `services/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI API, or any endpoint speaking the same protocol.
    OpenAi,
}

impl LlmProvider {
    /// Parses a provider name as used in the `LLM_KIND` env variable.
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedProvider`] for unknown names.
    pub fn parse_kind(kind: &str) -> Result<Self, LlmError> {
        match kind.trim().to_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(LlmProvider::parse_kind("ollama").unwrap(), LlmProvider::Ollama);
        assert_eq!(LlmProvider::parse_kind("OpenAI").unwrap(), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse_kind("chatgpt").unwrap(), LlmProvider::OpenAi);
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(LlmProvider::parse_kind("gemini-magic").is_err());
    }
}
