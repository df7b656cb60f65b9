//! Question answering over the indexed legal documents.
//!
//! The pipeline has three stages:
//! 1. retrieve similarity candidates ([`retriever`]),
//! 2. optionally narrow them with a single batch rerank model call
//!    ([`rerank`]) that degrades to similarity order on any failure,
//! 3. generate the final answer from the formatted context ([`generate`]).
//!
//! Collaborators sit behind the [`traits::ChunkSearch`] and
//! [`traits::TextCompletion`] seams; [`adapters`] binds them to the real
//! vector store and LLM gateway.

pub mod adapters;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod prompt;
pub mod rerank;
pub mod retriever;
pub mod traits;

pub use adapters::{GatewayEmbedder, StoreSearcher};
pub use error::QaError;
pub use pipeline::{QaConfig, QaPipeline};
pub use traits::{ChunkSearch, TextCompletion};
