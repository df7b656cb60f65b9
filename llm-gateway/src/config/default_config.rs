//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles exist in this backend:
//!
//! - **generation** → answers questions and reranks candidate chunks
//! - **embedding**  → embeds chunks and queries for vector search
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = provider kind (`ollama` | `openai`), default `ollama`
//! - `LLM_MAX_TOKENS` = optional generation cap (u32)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`     = generation model (mandatory)
//! - `EMBEDDING_MODEL`  = embedding model (mandatory)
//!
//! OpenAI-compatible:
//! - `OPENAI_URL`       = base URL, default `https://api.openai.com`
//! - `OPENAI_API_KEY`   = key (mandatory)
//! - `OPENAI_MODEL`     = generation model (mandatory)
//! - `EMBEDDING_MODEL`  = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, LlmError, env_opt_u32, must_env},
};

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence: `OLLAMA_URL` if present and non-empty, otherwise
/// `OLLAMA_PORT` → `http://localhost:{port}`.
fn ollama_endpoint() -> Result<String, LlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            port.parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn provider_kind() -> Result<LlmProvider, LlmError> {
    match std::env::var("LLM_KIND") {
        Ok(kind) if !kind.trim().is_empty() => LlmProvider::parse_kind(&kind),
        _ => Ok(LlmProvider::Ollama),
    }
}

/// Config for the **generation** role (answering + reranking).
///
/// Temperature is pinned to `0.0`: answers must be grounded in the
/// retrieved context, not creative.
pub fn config_generation() -> Result<LlmModelConfig, LlmError> {
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    match provider_kind()? {
        LlmProvider::Ollama => Ok(LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_env("OLLAMA_MODEL")?,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(120),
        }),
        LlmProvider::OpenAi => Ok(LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: must_env("OPENAI_MODEL")?,
            endpoint: std::env::var("OPENAI_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(120),
        }),
    }
}

/// Config for the **embedding** role.
pub fn config_embedding() -> Result<LlmModelConfig, LlmError> {
    let model = must_env("EMBEDDING_MODEL")?;

    match provider_kind()? {
        LlmProvider::Ollama => Ok(LlmModelConfig {
            provider: LlmProvider::Ollama,
            model,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(30),
        }),
        LlmProvider::OpenAi => Ok(LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model,
            endpoint: std::env::var("OPENAI_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(30),
        }),
    }
}
