//! Final stage: answer generation from the selected context.

use std::sync::Arc;

use chunk_store::Chunk;
use tracing::debug;

use crate::{
    error::QaError,
    prompt::{ANSWER_SYSTEM, build_answer_prompt, format_context},
    traits::TextCompletion,
};

/// Produces the final answer text for a question and its context chunks.
pub struct AnswerGenerator {
    llm: Arc<dyn TextCompletion>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        Self { llm }
    }

    /// Formats the context and asks the generation model for an answer.
    ///
    /// An empty `chunks` slice still goes to the model; the system
    /// instruction makes it state that the context is insufficient.
    ///
    /// # Errors
    /// `QaError::Generation` when the model call fails. No fallback here:
    /// without an answer model there is no answer.
    pub async fn answer(&self, question: &str, chunks: &[Chunk]) -> Result<String, QaError> {
        let context = format_context(chunks);
        let prompt = build_answer_prompt(question, &context);
        debug!("generating answer from {} context chunks", chunks.len());
        let text = self.llm.complete(&prompt, Some(ANSWER_SYSTEM)).await?;
        Ok(text.trim().to_string())
    }
}
