//! Runtime adapters binding the pipeline seams to the real backends.

use std::{future::Future, pin::Pin, sync::Arc};

use chunk_store::{Chunk, ChunkStore, EmbeddingsProvider, StoreError};
use llm_gateway::{LlmError, LlmProfiles};
use tracing::trace;

use crate::traits::{ChunkSearch, TextCompletion};

/// Embedding provider backed by the gateway's embedding profile.
///
/// Verifies the returned dimensionality against the configured collection
/// width so a misconfigured embedding model fails loudly instead of
/// producing silent garbage hits.
pub struct GatewayEmbedder {
    profiles: Arc<LlmProfiles>,
    expected_dim: usize,
}

impl GatewayEmbedder {
    pub fn new(profiles: Arc<LlmProfiles>, expected_dim: usize) -> Self {
        Self {
            profiles,
            expected_dim,
        }
    }
}

impl EmbeddingsProvider for GatewayEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let vector = self
                .profiles
                .embed(text)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;
            if vector.len() != self.expected_dim {
                return Err(StoreError::VectorSizeMismatch {
                    got: vector.len(),
                    want: self.expected_dim,
                });
            }
            Ok(vector)
        })
    }
}

/// [`ChunkSearch`] over a [`ChunkStore`] plus an embedding provider.
pub struct StoreSearcher {
    store: Arc<ChunkStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl StoreSearcher {
    pub fn new(store: Arc<ChunkStore>, embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self { store, embedder }
    }
}

impl ChunkSearch for StoreSearcher {
    fn search<'a>(
        &'a self,
        query: &'a str,
        k: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            trace!("StoreSearcher::search k={k}");
            let hits = self
                .store
                .search_chunks(query, k, self.embedder.as_ref())
                .await?;
            Ok(hits.into_iter().map(|h| h.chunk).collect())
        })
    }
}

impl TextCompletion for LlmProfiles {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        system: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(self.generate(prompt, system))
    }
}
