//! First retrieval stage: wide candidate search.

use std::sync::Arc;

use chunk_store::Chunk;
use tracing::debug;

use crate::{error::QaError, traits::ChunkSearch};

/// Fetches similarity candidates for a question.
pub struct CandidateRetriever {
    search: Arc<dyn ChunkSearch>,
}

impl CandidateRetriever {
    pub fn new(search: Arc<dyn ChunkSearch>) -> Self {
        Self { search }
    }

    /// Returns up to `k` candidates in descending similarity order.
    ///
    /// # Errors
    /// `QaError::Retrieval` when the search collaborator fails.
    pub async fn retrieve(&self, question: &str, k: u64) -> Result<Vec<Chunk>, QaError> {
        let chunks = self.search.search(question, k).await?;
        debug!("retrieved {} candidates (asked {k})", chunks.len());
        Ok(chunks)
    }
}
