//! Retrieval helpers: low-level vector search and payload mapping.

use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{Chunk, ChunkHit};

use tracing::trace;

/// Low-level similarity search for a ready query vector.
///
/// # Errors
/// `StoreError::Qdrant` on client failures.
pub async fn search_by_vector(
    client: &QdrantFacade,
    query_vector: Vec<f32>,
    top_k: u64,
) -> Result<Vec<(f32, serde_json::Value)>, StoreError> {
    trace!("retrieve::search_by_vector top_k={top_k}");
    client.search(query_vector, top_k).await
}

/// Embeds the query text and returns the top-k chunks as hits.
///
/// Hits come back in descending similarity order; the payload fields are
/// extracted best-effort, with missing fields defaulting to empty values.
///
/// # Errors
/// Embedding provider errors or Qdrant failures.
pub async fn search_chunks(
    client: &QdrantFacade,
    query: &str,
    top_k: u64,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<ChunkHit>, StoreError> {
    trace!("retrieve::search_chunks top_k={top_k}");

    let qv = provider.embed(query).await?;
    let raw = search_by_vector(client, qv, top_k).await?;

    let mut out = Vec::with_capacity(raw.len());
    for (score, payload) in raw {
        out.push(ChunkHit {
            score,
            chunk: chunk_from_payload(&payload),
        });
    }

    trace!("retrieve::search_chunks hits={}", out.len());
    Ok(out)
}

/// Maps a Qdrant JSON payload back to a [`Chunk`].
pub(crate) fn chunk_from_payload(payload: &serde_json::Value) -> Chunk {
    let content = payload
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let source = payload
        .get("source")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let page = payload
        .get("page")
        .and_then(|v| v.as_u64())
        .map(|p| p as u32);

    Chunk {
        content,
        source,
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_full_payload() {
        let payload = json!({
            "content": "Art. 49. O consumidor pode desistir do contrato...",
            "source": "cdc",
            "page": 12,
            "seq": 3,
        });
        let chunk = chunk_from_payload(&payload);
        assert_eq!(chunk.source, "cdc");
        assert_eq!(chunk.page, Some(12));
        assert!(chunk.content.starts_with("Art. 49"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let chunk = chunk_from_payload(&json!({}));
        assert!(chunk.content.is_empty());
        assert!(chunk.source.is_empty());
        assert_eq!(chunk.page, None);
    }
}
