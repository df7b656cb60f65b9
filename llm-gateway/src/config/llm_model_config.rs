//! Universal per-model configuration.

use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM model invocation target.
///
/// The same struct serves both roles (generation and embedding); the
/// profiles facade decides which config is used for which call.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Backend to call (Ollama or OpenAI-compatible).
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"qwen3:14b"`, `"gpt-4o-mini"`).
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Optional API key (required for OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate, if supported.
    pub max_tokens: Option<u32>,

    /// Sampling temperature; the answering pipeline wants `0.0`.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}
