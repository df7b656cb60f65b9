//! Errors for document loading and splitting.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for doc-ingest operations.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The external text extractor failed or is unavailable.
    #[error("extractor error: {0}")]
    Extractor(String),

    /// A source yielded no usable text.
    #[error("no text extracted from source '{0}'")]
    EmptyDocument(String),
}
