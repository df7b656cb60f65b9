//! Collaborator seams for the pipeline.
//!
//! Both traits use the boxed-future form so they stay object-safe: the
//! pipeline holds `Arc<dyn ...>` handles and tests swap in local doubles
//! with no network behind them.

use std::{future::Future, pin::Pin};

use chunk_store::{Chunk, StoreError};
use llm_gateway::LlmError;

/// Semantic search over the chunk index.
pub trait ChunkSearch: Send + Sync {
    /// Returns up to `k` chunks ordered by descending similarity.
    fn search<'a>(
        &'a self,
        query: &'a str,
        k: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, StoreError>> + Send + 'a>>;
}

/// Text completion against the generation model.
pub trait TextCompletion: Send + Sync {
    /// Completes `prompt`, optionally under a system instruction.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;
}
