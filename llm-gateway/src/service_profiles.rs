//! Shared gateway with two active profiles: `generation` and `embedding`.
//!
//! - Lives in the application's Tokio runtime.
//! - Construct once, wrap in `Arc`, and hand clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout),
//!   so calls never rebuild a `reqwest::Client`.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::{
    config::{
        default_config::{config_embedding, config_generation},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::LlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Gateway facade over the two logical model roles.
pub struct LlmProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmProfiles {
    /// Creates the gateway from explicit configs.
    pub fn new(generation: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            generation,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Creates the gateway from environment variables.
    ///
    /// # Errors
    /// Propagates [`LlmError::Config`] for missing/invalid variables.
    pub fn from_env() -> Result<Self, LlmError> {
        Ok(Self::new(config_generation()?, config_embedding()?))
    }

    /// Generates text with the **generation** profile.
    ///
    /// # Errors
    /// Returns [`LlmError`] if the provider call fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        match self.generation.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.generation).await?;
                cli.generate(prompt, system).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.generation).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    /// Computes an embedding with the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`LlmError`] if the provider call fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// References to the current profiles `(generation, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.generation, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Cache key identifying a unique client configuration.
#[derive(Clone, PartialEq, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        self.api_key.hash(state);
        self.timeout.hash(state);
    }
}
