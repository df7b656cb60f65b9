//! Errors for the question-answering pipeline.

use chunk_store::StoreError;
use llm_gateway::LlmError;
use thiserror::Error;

/// Top-level error for pipeline operations.
///
/// Rerank failures never appear here: the reranker degrades to the original
/// similarity order instead of failing the question.
#[derive(Debug, Error)]
pub enum QaError {
    /// Vector search collaborator failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] StoreError),

    /// Answer model call failed.
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),
}
