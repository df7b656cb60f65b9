//! Ingestion pipeline: resolve embeddings → ensure collection → batched upsert.

use crate::config::{StoreConfig, VectorSpace};
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_missing;
use crate::errors::StoreError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::ChunkRecord;

use qdrant_client::Payload;
use qdrant_client::qdrant::PointStruct;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

/// Deterministic UUIDv5 from a logical record id, so re-ingesting the same
/// document overwrites points instead of duplicating them.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Indexes chunk records into Qdrant.
///
/// 1. Embeds records that carry no precomputed vector.
/// 2. Ensures the collection exists (no reset).
/// 3. Upserts points in `cfg.upsert_batch` batches.
///
/// Returns the number of points written.
///
/// # Errors
/// Embedding, dimension-mismatch, or Qdrant failures.
pub async fn index_records(
    cfg: &StoreConfig,
    client: &QdrantFacade,
    mut records: Vec<ChunkRecord>,
    provider: &dyn EmbeddingsProvider,
) -> Result<u64, StoreError> {
    if records.is_empty() {
        debug!("index_records: no records to ingest");
        return Ok(0);
    }

    info!("index_records: {} records", records.len());

    let concurrency = embedding_concurrency();
    embed_missing(&mut records, provider, cfg.embedding_dim, concurrency).await?;

    client
        .ensure_collection(&VectorSpace {
            size: cfg.embedding_dim,
            distance: cfg.distance,
        })
        .await?;

    let mut total: u64 = 0;
    let batch_size = cfg.upsert_batch.max(1);
    for batch in records.chunks(batch_size) {
        let points = build_points(batch, cfg.embedding_dim)?;
        total += client.upsert_points(points).await?;
    }

    info!("index_records: ingested {} points", total);
    Ok(total)
}

/// Parse `EMBEDDING_CONCURRENCY` env var (default 4).
fn embedding_concurrency() -> usize {
    std::env::var("EMBEDDING_CONCURRENCY")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(4)
}

fn build_points(batch: &[ChunkRecord], dim: usize) -> Result<Vec<PointStruct>, StoreError> {
    let mut points = Vec::with_capacity(batch.len());

    for r in batch {
        let vector = r.embedding.clone().ok_or_else(|| {
            StoreError::Embedding(format!("record {} has no embedding after pool", r.id))
        })?;
        if vector.len() != dim {
            return Err(StoreError::VectorSizeMismatch {
                got: vector.len(),
                want: dim,
            });
        }

        let payload: Payload = json!({
            "content": r.content,
            "source": r.source,
            "page": r.page,
            "seq": r.seq,
        })
        .try_into()
        .map_err(|e| StoreError::Qdrant(format!("payload convert: {e}")))?;

        points.push(PointStruct::new(
            stable_uuid(&r.id).to_string(),
            vector,
            payload,
        ));
    }

    Ok(points)
}
