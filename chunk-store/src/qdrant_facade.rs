//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions live behind this minimal facade, keeping the rest
//! of the crate decoupled from the client's builder-heavy API.

use crate::config::{DistanceKind, StoreConfig, VectorSpace};
use crate::errors::StoreError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

/// Facade over the Qdrant client: connection, collection lifecycle,
/// batched upserts and top-k search.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// # Errors
    /// `StoreError::Config` for invalid config, `StoreError::Qdrant` if the
    /// client cannot be constructed.
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    /// Ensures the collection exists; creates it when missing.
    ///
    /// Returns `true` when a new collection was created.
    pub async fn ensure_collection(&self, space: &VectorSpace) -> Result<bool, StoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("collection '{}' already exists", self.collection);
                return Ok(false);
            }
            Err(err) => {
                warn!(
                    "collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        self.create(space).await?;
        Ok(true)
    }

    /// Drops the collection (if present) and creates a fresh one.
    ///
    /// Best-effort delete keeps the call idempotent.
    pub async fn reset_collection(&self, space: &VectorSpace) -> Result<(), StoreError> {
        let _ = self.client.delete_collection(&self.collection).await;
        self.create(space).await
    }

    async fn create(&self, space: &VectorSpace) -> Result<(), StoreError> {
        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        info!(
            "collection '{}' created (size={}, distance={:?})",
            self.collection, space.size, self.distance
        );
        Ok(())
    }

    /// Upserts a batch of points; returns the number of points sent.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<u64, StoreError> {
        if points.is_empty() {
            debug!("no points provided for upsert");
            return Ok(0);
        }

        let count = points.len() as u64;
        info!(
            "upserting {} points into collection '{}'",
            count, self.collection
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(count)
    }

    /// Top-k similarity search; returns `(score, payload)` tuples sorted by
    /// descending score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<(f32, serde_json::Value)>, StoreError> {
        debug!(
            "searching '{}' with top_k={}",
            self.collection, top_k
        );

        let builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for r in res.result.into_iter() {
            let payload_json = qpayload_to_json(r.payload);
            out.push((r.score, payload_json));
        }

        debug!("search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Unsupported nested objects/arrays are mapped to `Null`.
fn qpayload_to_json(
    mut p: std::collections::HashMap<String, QValue>,
) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            None => serde_json::Value::Null,
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
