//! Unified error handling for `llm-gateway`.
//!
//! A single top-level [`LlmError`] covers the whole crate, with nested enums
//! for configuration and provider failures. Helpers for reading environment
//! variables return the unified [`Result<T>`] alias so config constructors
//! stay terse.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Top-level error for the `llm-gateway` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration/validation errors (startup time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider call errors (runtime).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error.
    #[error("[llm-gateway] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Errors from environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[llm-gateway] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A numeric variable failed to parse.
    #[error("[llm-gateway] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider name in `LLM_KIND`.
    #[error("[llm-gateway] unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// Which backend produced a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAi,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Ollama => write!(f, "ollama"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

/// A provider call failed; carries the backend and the failure kind.
#[derive(Debug, Error)]
#[error("[llm-gateway] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: Provider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: Provider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Failure kinds shared by all providers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// The config names a different provider than the service expects.
    #[error("invalid provider for this service")]
    InvalidProvider,

    /// The provider requires an API key and none was configured.
    #[error("missing API key")]
    MissingApiKey,

    /// Endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// Chat completion returned no choices.
    #[error("empty choices in completion response")]
    EmptyChoices,
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            LlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Clips a response body to a short, log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    body.chars().take(240).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_clipped() {
        let long = "x".repeat(1000);
        assert_eq!(make_snippet(&long).len(), 240);
        assert_eq!(make_snippet("short"), "short");
    }

    #[test]
    fn provider_error_formats_with_backend() {
        let err = ProviderError::new(Provider::Ollama, ProviderErrorKind::EmptyChoices);
        let msg = err.to_string();
        assert!(msg.contains("ollama"));
        assert!(msg.contains("empty choices"));
    }
}
