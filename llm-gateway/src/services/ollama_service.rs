//! Thin client for the local Ollama API.
//!
//! - `POST {endpoint}/api/generate`   — non-streaming text generation
//! - `POST {endpoint}/api/embeddings` — embeddings retrieval
//!
//! The client is built once per config (timeout included) and reused.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{LlmError, Provider, ProviderError, ProviderErrorKind, make_snippet},
};

/// Non-streaming Ollama client for generation and embeddings.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new service from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Ollama
    /// - `InvalidEndpoint` if `cfg.endpoint` is empty or not http(s)
    /// - `HttpTransport` if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{base}/api/generate");
        let url_embeddings = format!("{base}/api/embeddings");

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embeddings,
        })
    }

    /// Non-streaming generation via `/api/generate`.
    ///
    /// Ollama has no separate system channel in this endpoint, so an
    /// optional system instruction is prepended to the prompt.
    ///
    /// # Errors
    /// `HttpStatus` for non-2xx responses, `HttpTransport` for network
    /// failures, `Decode` for unexpected JSON.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let merged;
        let effective_prompt = match system {
            Some(sys) if !sys.trim().is_empty() => {
                merged = format!("{sys}\n\n{prompt}");
                merged.as_str()
            }
            _ => prompt,
        };

        let body = GenerateRequest::from_cfg(&self.cfg, effective_prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::HttpStatus {
                    status,
                    url,
                    snippet: make_snippet(&text),
                },
            )
            .into());
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `response` field")),
            )
        })?;

        Ok(out.response)
    }

    /// Embeddings retrieval via `/api/embeddings`.
    ///
    /// # Errors
    /// Same classes as [`OllamaService::generate`].
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::HttpStatus {
                    status,
                    url,
                    snippet: make_snippet(&text),
                },
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `embedding` array")),
            )
        })?;

        Ok(out.embedding)
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            options: Some(GenerateOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            }),
        }
    }
}

/// Subset of Ollama `options` this backend cares about.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: Some(256),
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_bad_endpoint() {
        assert!(OllamaService::new(cfg("")).is_err());
        assert!(OllamaService::new(cfg("localhost:11434")).is_err());
        assert!(OllamaService::new(cfg("http://localhost:11434")).is_ok());
    }

    #[test]
    fn rejects_wrong_provider() {
        let mut c = cfg("http://localhost:11434");
        c.provider = LlmProvider::OpenAi;
        assert!(OllamaService::new(c).is_err());
    }
}
