//! Embedding abstraction.

use crate::errors::StoreError;
use std::{future::Future, pin::Pin};

/// Asynchronous embedding provider.
///
/// Async is required because real providers (Ollama, OpenAI, etc.) perform
/// HTTP requests. The boxed-future form keeps the trait object-safe so test
/// doubles and runtime backends are interchangeable.
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces an embedding vector for the given text.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>>;
}

pub mod noop_embedder;
