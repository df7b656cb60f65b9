use crate::{EmbeddingsProvider, StoreError};
use std::{future::Future, pin::Pin};

/// Provider that always fails; useful in tests that must not embed.
#[derive(Clone)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async { Err(StoreError::Embedding("noop embedder".into())) })
    }
}
