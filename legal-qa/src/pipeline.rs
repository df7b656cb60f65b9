//! Orchestration: retrieve wide, rerank to narrow, generate.

use std::{env, sync::Arc};

use tracing::info;

use crate::{
    error::QaError,
    generate::AnswerGenerator,
    rerank::BatchReranker,
    retriever::CandidateRetriever,
    traits::{ChunkSearch, TextCompletion},
};

/// Pipeline knobs.
#[derive(Clone, Copy, Debug)]
pub struct QaConfig {
    /// Candidate count for the wide retrieval pass.
    pub wide_k: u64,
    /// Chunks kept for the answer context.
    pub context_k: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            wide_k: 10,
            context_k: 4,
        }
    }
}

impl QaConfig {
    /// Reads overrides from `RAG_WIDE_K` / `RAG_CONTEXT_K`, keeping the
    /// defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            wide_k: env_parse("RAG_WIDE_K").unwrap_or(d.wide_k),
            context_k: env_parse("RAG_CONTEXT_K").unwrap_or(d.context_k),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// The question-answering pipeline.
///
/// Stateless across calls; collaborators are shared read-only handles, so
/// one pipeline value serves any number of concurrent questions.
pub struct QaPipeline {
    retriever: CandidateRetriever,
    reranker: BatchReranker,
    generator: AnswerGenerator,
    cfg: QaConfig,
}

impl QaPipeline {
    pub fn new(search: Arc<dyn ChunkSearch>, llm: Arc<dyn TextCompletion>, cfg: QaConfig) -> Self {
        Self {
            retriever: CandidateRetriever::new(search),
            reranker: BatchReranker::new(llm.clone()),
            generator: AnswerGenerator::new(llm),
            cfg,
        }
    }

    /// Answers a question from the indexed documents.
    ///
    /// With `use_reranking` the pipeline retrieves `wide_k` candidates and
    /// narrows them to `context_k` via the batch reranker; without it, it
    /// retrieves `context_k` directly.
    ///
    /// # Errors
    /// `QaError::Retrieval` or `QaError::Generation`; rerank failures
    /// degrade silently to similarity order.
    pub async fn ask(&self, question: &str, use_reranking: bool) -> Result<String, QaError> {
        info!("ask: reranking={use_reranking}");

        let context_chunks = if use_reranking {
            let wide = self.retriever.retrieve(question, self.cfg.wide_k).await?;
            self.reranker
                .rerank(question, wide, self.cfg.context_k)
                .await
        } else {
            self.retriever
                .retrieve(question, self.cfg.context_k as u64)
                .await?
        };

        self.generator.answer(question, &context_chunks).await
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin, sync::Mutex};

    use chunk_store::{Chunk, StoreError};
    use llm_gateway::LlmError;

    use super::*;

    fn chunk(content: &str, source: &str) -> Chunk {
        Chunk {
            content: content.to_string(),
            source: source.to_string(),
            page: None,
        }
    }

    /// Search double that records every requested `k`.
    struct RecordingSearch {
        chunks: Vec<Chunk>,
        requested: Mutex<Vec<u64>>,
        fail: bool,
    }

    impl RecordingSearch {
        fn with(chunks: Vec<Chunk>) -> Self {
            Self {
                chunks,
                requested: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                chunks: Vec::new(),
                requested: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl ChunkSearch for RecordingSearch {
        fn search<'a>(
            &'a self,
            _query: &'a str,
            k: u64,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Chunk>, StoreError>> + Send + 'a>> {
            self.requested.lock().unwrap().push(k);
            let out = if self.fail {
                Err(StoreError::Qdrant("connection refused".into()))
            } else {
                Ok(self.chunks.iter().take(k as usize).cloned().collect())
            };
            Box::pin(async move { out })
        }
    }

    /// Completion double that answers the rerank prompt with a fixed id list
    /// and echoes the context back for the answer prompt, so tests can see
    /// exactly which chunks reached generation.
    struct ScriptedLlm {
        rerank_reply: String,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn new(rerank_reply: &str) -> Self {
            Self {
                rerank_reply: rerank_reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextCompletion for ScriptedLlm {
        fn complete<'a>(
            &'a self,
            prompt: &'a str,
            system: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            self.calls.lock().unwrap().push(prompt.to_string());
            // The rerank prompt carries no system instruction.
            let out = if system.is_none() {
                self.rerank_reply.clone()
            } else {
                format!("ANSWER<{prompt}>")
            };
            Box::pin(async move { Ok(out) })
        }
    }

    fn corpus() -> Vec<Chunk> {
        (0..10)
            .map(|i| chunk(&format!("artigo {i}"), if i % 2 == 0 { "cdc" } else { "lgpd" }))
            .collect()
    }

    #[tokio::test]
    async fn reranking_path_widens_then_narrows() {
        let search = Arc::new(RecordingSearch::with(corpus()));
        let llm = Arc::new(ScriptedLlm::new("7, 3, 0, 5"));
        let pipeline = QaPipeline::new(search.clone(), llm.clone(), QaConfig::default());

        let answer = pipeline.ask("qual o prazo?", true).await.unwrap();

        assert_eq!(*search.requested.lock().unwrap(), vec![10]);
        // Context must hold the reranked chunks, in rerank order.
        assert!(answer.contains("[LGPD]: artigo 7\n\n[LGPD]: artigo 3\n\n[CDC]: artigo 0\n\n[LGPD]: artigo 5"));
        // Two model calls: rerank then answer.
        assert_eq!(llm.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_reranking_path_retrieves_narrow() {
        let search = Arc::new(RecordingSearch::with(corpus()));
        let llm = Arc::new(ScriptedLlm::new("irrelevante"));
        let pipeline = QaPipeline::new(search.clone(), llm.clone(), QaConfig::default());

        let answer = pipeline.ask("qual o prazo?", false).await.unwrap();

        assert_eq!(*search.requested.lock().unwrap(), vec![4]);
        assert!(answer.contains("[CDC]: artigo 0"));
        assert!(answer.contains("artigo 3"));
        assert!(!answer.contains("artigo 4"));
        // Only the answer call, no rerank call.
        assert_eq!(llm.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retrieval_failure_surfaces_as_qa_error() {
        let pipeline = QaPipeline::new(
            Arc::new(RecordingSearch::failing()),
            Arc::new(ScriptedLlm::new("0")),
            QaConfig::default(),
        );
        let err = pipeline.ask("pergunta", true).await.unwrap_err();
        assert!(matches!(err, QaError::Retrieval(_)));
    }

    #[tokio::test]
    async fn empty_index_still_reaches_generation() {
        let search = Arc::new(RecordingSearch::with(Vec::new()));
        let llm = Arc::new(ScriptedLlm::new("0"));
        let pipeline = QaPipeline::new(search, llm.clone(), QaConfig::default());

        let answer = pipeline.ask("pergunta", true).await.unwrap();

        // Rerank is skipped on zero candidates; generation still runs with
        // an empty context block.
        assert_eq!(llm.calls.lock().unwrap().len(), 1);
        assert!(answer.contains("Contexto:\n\n"));
    }

    /// Completion double that behaves like a grounded model: it picks the
    /// best candidate for the rerank call and answers from the context,
    /// refusing when the context holds nothing about the question.
    struct GroundedLlm;

    impl TextCompletion for GroundedLlm {
        fn complete<'a>(
            &'a self,
            prompt: &'a str,
            system: Option<&'a str>,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            let out = if system.is_none() {
                // Rerank call: prefer the withdrawal-right chunk when present.
                if prompt.contains("direito de arrependimento") {
                    "1, 0".to_string()
                } else {
                    "0".to_string()
                }
            } else if prompt.contains("[CDC]: Art. 49") {
                "Segundo o CDC, o consumidor pode desistir do contrato em 7 dias.".to_string()
            } else {
                "Desculpe, não possui informações suficientes no contexto.".to_string()
            };
            Box::pin(async move { Ok(out) })
        }
    }

    #[tokio::test]
    async fn grounded_question_is_answered_from_the_law() {
        let search = Arc::new(RecordingSearch::with(vec![
            chunk("Art. 5º Todos são iguais perante a lei", "cdc"),
            chunk(
                "Art. 49. O consumidor pode desistir do contrato, direito de arrependimento",
                "cdc",
            ),
        ]));
        let pipeline = QaPipeline::new(search, Arc::new(GroundedLlm), QaConfig::default());

        let answer = pipeline
            .ask("qual o prazo de arrependimento?", true)
            .await
            .unwrap();

        assert!(answer.contains("CDC"));
        assert!(answer.contains("consumidor"));
    }

    #[tokio::test]
    async fn out_of_context_question_gets_the_refusal_phrase() {
        let search = Arc::new(RecordingSearch::with(vec![chunk(
            "Art. 5º Todos são iguais perante a lei",
            "cdc",
        )]));
        let pipeline = QaPipeline::new(search, Arc::new(GroundedLlm), QaConfig::default());

        let answer = pipeline
            .ask("qual a capital da França?", true)
            .await
            .unwrap();

        assert!(answer.contains("não possui informações suficientes"));
    }

    #[test]
    fn config_env_overrides_apply_and_fall_back_on_junk() {
        // set_var is process-global; no other test reads these variables.
        unsafe {
            std::env::set_var("RAG_WIDE_K", "25");
            std::env::set_var("RAG_CONTEXT_K", "banana");
        }
        let cfg = QaConfig::from_env();
        unsafe {
            std::env::remove_var("RAG_WIDE_K");
            std::env::remove_var("RAG_CONTEXT_K");
        }

        assert_eq!(cfg.wide_k, 25);
        // Unparsable override keeps the default.
        assert_eq!(cfg.context_k, 4);

        let defaults = QaConfig::from_env();
        assert_eq!(defaults.wide_k, 10);
        assert_eq!(defaults.context_k, 4);
    }
}
