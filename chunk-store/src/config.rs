//! Runtime and collection configuration.

use crate::errors::StoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Parse from env string (case-insensitive). Defaults to Cosine.
    pub fn from_env_str(s: Option<String>) -> Self {
        match s.unwrap_or_default().to_lowercase().as_str() {
            "dot" | "dotproduct" => DistanceKind::Dot,
            "euclid" | "l2" => DistanceKind::Euclid,
            _ => DistanceKind::Cosine,
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for chunk ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 64..512).
    pub upsert_batch: usize,
    /// Embedding vector dimensionality.
    pub embedding_dim: usize,
}

impl StoreConfig {
    /// Sane defaults for a given Qdrant endpoint and collection name.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 128,
            embedding_dim: 1024,
        }
    }

    /// Builds configuration from environment variables.
    ///
    /// Variables used:
    /// - `QDRANT_URL` (default `http://localhost:6334`)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default `legal_chunks`)
    /// - `QDRANT_DISTANCE` (`Cosine` | `Dot` | `Euclid`; default Cosine)
    /// - `QDRANT_BATCH_SIZE` (default 128)
    /// - `EMBEDDING_DIM` (default 1024)
    pub fn from_env() -> Result<Self, StoreError> {
        let cfg = Self {
            qdrant_url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6334".into()),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok().filter(|s| !s.is_empty()),
            collection: std::env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "legal_chunks".into()),
            distance: DistanceKind::from_env_str(std::env::var("QDRANT_DISTANCE").ok()),
            upsert_batch: read_usize_env("QDRANT_BATCH_SIZE").unwrap_or(128),
            embedding_dim: read_usize_env("EMBEDDING_DIM").unwrap_or(1024),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(StoreError::Config("upsert_batch must be > 0".into()));
        }
        if self.embedding_dim == 0 {
            return Err(StoreError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn read_usize_env(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = StoreConfig::new_default("http://localhost:6334", "legal_chunks");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_collection_rejected() {
        let cfg = StoreConfig::new_default("http://localhost:6334", "");
        assert!(matches!(cfg.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn zero_batch_rejected() {
        let mut cfg = StoreConfig::new_default("http://localhost:6334", "c");
        cfg.upsert_batch = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn distance_parsing_defaults_to_cosine() {
        assert_eq!(DistanceKind::from_env_str(None), DistanceKind::Cosine);
        assert_eq!(
            DistanceKind::from_env_str(Some("dot".into())),
            DistanceKind::Dot
        );
        assert_eq!(
            DistanceKind::from_env_str(Some("L2".into())),
            DistanceKind::Euclid
        );
    }
}
