//! Provider-agnostic LLM gateway.
//!
//! One crate owns every model call the backend makes: text generation for
//! answering and reranking, and embeddings for vector search. Two providers
//! are supported (local Ollama and any OpenAI-compatible API), selected by
//! configuration. Application code talks to [`LlmProfiles`], which holds one
//! config per role (`generation`, `embedding`) and caches HTTP clients.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{ConfigError, LlmError, ProviderError};
pub use service_profiles::LlmProfiles;
