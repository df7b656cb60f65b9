//! Core data models used by the library.

use serde::{Deserialize, Serialize};

/// The atomic unit of retrieval: a bounded span of document text plus the
/// label of the document it came from (`"cdc"` or `"lgpd"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text span.
    pub content: String,
    /// Source document label.
    pub source: String,
    /// Zero-based page index in the source PDF, when known.
    pub page: Option<u32>,
}

/// Ingestion-side record: a chunk plus its stable id, position and an
/// optional precomputed embedding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Stable logical id (e.g. `"cdc:12"`); mapped to a UUIDv5 point id at
    /// ingestion time so re-ingestion overwrites instead of duplicating.
    pub id: String,
    /// The chunk payload.
    pub content: String,
    /// Source document label.
    pub source: String,
    /// Zero-based page index, when known.
    pub page: Option<u32>,
    /// Position of the chunk within its source document.
    pub seq: usize,
    /// Precomputed embedding; filled by the embed pool when absent.
    pub embedding: Option<Vec<f32>>,
}

/// A single retrieval hit, ordered by descending similarity score.
#[derive(Clone, Debug)]
pub struct ChunkHit {
    pub score: f32,
    pub chunk: Chunk,
}
