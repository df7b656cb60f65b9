//! Qdrant-backed vector index for legal document chunks.
//!
//! This crate provides a clean API to:
//! - Index chunk records with precomputed or on-the-fly embeddings
//! - Retrieve top-k chunks for a textual query
//!
//! The design is flat and splits responsibilities into focused modules.

mod config;
mod embed;
mod embed_pool;
mod errors;
mod ingest;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::{DistanceKind, StoreConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, noop_embedder::NoopEmbedder};
pub use errors::StoreError;
pub use ingest::stable_uuid;
pub use record::{Chunk, ChunkHit, ChunkRecord};

use tracing::{debug, trace};

/// High-level facade wiring configuration and the Qdrant client.
///
/// The single entry point recommended for application code.
pub struct ChunkStore {
    cfg: StoreConfig,
    client: qdrant_facade::QdrantFacade,
}

impl ChunkStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// `StoreError::Config` or `StoreError::Qdrant` if initialization fails.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        trace!("ChunkStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    /// Creates the collection when missing; returns `true` if created.
    ///
    /// # Errors
    /// `StoreError::Qdrant` on transport/server failures.
    pub async fn ensure_ready(&self) -> Result<bool, StoreError> {
        self.client
            .ensure_collection(&VectorSpace {
                size: self.cfg.embedding_dim,
                distance: self.cfg.distance,
            })
            .await
    }

    /// Drops and recreates the collection (force rebuild).
    ///
    /// # Errors
    /// `StoreError::Qdrant` on transport/server failures.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.client
            .reset_collection(&VectorSpace {
                size: self.cfg.embedding_dim,
                distance: self.cfg.distance,
            })
            .await
    }

    /// Indexes chunk records, embedding any that lack vectors.
    ///
    /// # Errors
    /// Embedding, dimension-mismatch, or Qdrant failures.
    pub async fn index_records(
        &self,
        records: Vec<ChunkRecord>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<u64, StoreError> {
        debug!("ChunkStore::index_records n={}", records.len());
        ingest::index_records(&self.cfg, &self.client, records, provider).await
    }

    /// Embeds the query and returns the top-k chunks by similarity.
    ///
    /// # Errors
    /// Embedding provider errors or Qdrant failures.
    pub async fn search_chunks(
        &self,
        query: &str,
        top_k: u64,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<ChunkHit>, StoreError> {
        trace!("ChunkStore::search_chunks top_k={top_k}");
        retrieve::search_chunks(&self.client, query, top_k, provider).await
    }

    /// Low-level vector search returning `(score, payload)` tuples.
    ///
    /// # Errors
    /// `StoreError::Qdrant` if search fails.
    pub async fn search_by_vector(
        &self,
        query_vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<(f32, serde_json::Value)>, StoreError> {
        retrieve::search_by_vector(&self.client, query_vector, top_k).await
    }
}
