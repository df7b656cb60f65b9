//! Embedding executor with concurrency and dimension checks.

use crate::{embed::EmbeddingsProvider, errors::StoreError, record::ChunkRecord};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

/// Embeds content for records that have no precomputed vectors.
///
/// # Arguments
/// - `records`: mutable slice of [`ChunkRecord`]s.
/// - `provider`: embedding backend.
/// - `expected_dim`: enforced vector size (error on mismatch).
/// - `concurrency`: maximum number of concurrent embedding calls.
///
/// # Errors
/// [`StoreError::VectorSizeMismatch`] on a dimension mismatch, or the
/// provider's error if any embedding call fails.
pub async fn embed_missing(
    records: &mut [ChunkRecord],
    provider: &dyn EmbeddingsProvider,
    expected_dim: usize,
    concurrency: usize,
) -> Result<(), StoreError> {
    let idxs: Vec<usize> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.embedding.is_none().then_some(i))
        .collect();

    if idxs.is_empty() {
        debug!("embed_missing: nothing to embed");
        return Ok(());
    }

    info!(
        "embed_missing: total={} missing={} concurrency={}",
        records.len(),
        idxs.len(),
        concurrency
    );

    let results: Vec<(usize, Vec<f32>)> = stream::iter(idxs.into_iter())
        .map(|i| {
            let text = records[i].content.clone();
            async move {
                let v = provider.embed(&text).await?;
                Ok::<(usize, Vec<f32>), StoreError>((i, v))
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, StoreError>>()?;

    for (i, v) in results {
        if v.len() != expected_dim {
            return Err(StoreError::VectorSizeMismatch {
                got: v.len(),
                want: expected_dim,
            });
        }
        records[i].embedding = Some(v);
    }

    debug!("embed_missing: embeddings filled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{future::Future, pin::Pin};

    struct FixedEmbedder(usize);

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            let dim = self.0;
            Box::pin(async move { Ok(vec![0.5; dim]) })
        }
    }

    fn record(seq: usize, embedding: Option<Vec<f32>>) -> ChunkRecord {
        ChunkRecord {
            id: format!("id-{seq}"),
            content: format!("chunk {seq}"),
            source: "cdc".into(),
            page: Some(1),
            seq,
            embedding,
        }
    }

    #[tokio::test]
    async fn fills_only_missing_embeddings() {
        let mut records = vec![record(0, Some(vec![1.0; 4])), record(1, None)];
        embed_missing(&mut records, &FixedEmbedder(4), 4, 2)
            .await
            .unwrap();
        assert_eq!(records[0].embedding.as_ref().unwrap()[0], 1.0);
        assert_eq!(records[1].embedding.as_ref().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        use crate::NoopEmbedder;
        let mut records = vec![record(0, None)];
        let err = embed_missing(&mut records, &NoopEmbedder, 4, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Embedding(_)));
        assert!(records[0].embedding.is_none());
    }

    #[tokio::test]
    async fn rejects_dimension_mismatch() {
        let mut records = vec![record(0, None)];
        let err = embed_missing(&mut records, &FixedEmbedder(3), 4, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::VectorSizeMismatch { got: 3, want: 4 }
        ));
    }
}
