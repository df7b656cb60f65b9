//! Batch LLM reranking of retrieval candidates.
//!
//! One model call scores the whole candidate set: the prompt enumerates the
//! candidates as `ID i:` lines and asks for the most relevant ids back as a
//! comma-separated list. The stage is strictly best-effort: any model or
//! parse failure falls back to the original similarity order, so reranking
//! can never make an answer worse than plain retrieval.

use std::sync::Arc;

use chunk_store::Chunk;
use tracing::{debug, warn};

use crate::traits::TextCompletion;

pub struct BatchReranker {
    llm: Arc<dyn TextCompletion>,
}

impl BatchReranker {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        Self { llm }
    }

    /// Reorders `candidates` by model-judged relevance and keeps the top `k`.
    ///
    /// Falls back to the first `k` candidates (original similarity order)
    /// when the model call fails or its reply yields no usable ids. Never
    /// returns an error.
    pub async fn rerank(&self, question: &str, candidates: Vec<Chunk>, k: usize) -> Vec<Chunk> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let prompt = build_rerank_prompt(question, &candidates, k);
        let raw = match self.llm.complete(&prompt, None).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("rerank model call failed, keeping similarity order: {e}");
                return first_k(candidates, k);
            }
        };

        let ids = parse_ranking(&raw, candidates.len());
        if ids.is_empty() {
            warn!("rerank reply yielded no valid ids, keeping similarity order");
            return first_k(candidates, k);
        }

        debug!("rerank ids={ids:?}");
        let picked: Vec<Chunk> = ids
            .into_iter()
            .take(k)
            .map(|i| candidates[i].clone())
            .collect();
        picked
    }
}

/// Builds the batch scoring prompt with one `ID i:` line per candidate.
fn build_rerank_prompt(question: &str, candidates: &[Chunk], k: usize) -> String {
    let listing = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("ID {i}: {}", c.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Abaixo estão vários fragmentos de texto (chunks) e uma pergunta.\n\
         Analise todos os fragmentos e selecione os {k} IDs dos fragmentos mais \
         relevantes para responder à pergunta.\n\
         Retorne APENAS os IDs separados por vírgula, em ordem de relevância \
         (do mais relevante para o menos).\n\
         Exemplo de retorno: 2, 5, 1, 0\n\n\
         Pergunta: {question}\n\n\
         Fragmentos:\n{listing}\n\n\
         IDs dos {k} mais relevantes:"
    )
}

/// Extracts candidate indexes from a model reply.
///
/// Splits on commas, keeps only tokens that parse as integers within
/// `0..len`, and drops repeated ids keeping their first occurrence. An
/// unusable reply simply yields an empty vector.
fn parse_ranking(raw: &str, len: usize) -> Vec<usize> {
    let mut seen = vec![false; len];
    let mut ids = Vec::new();
    for token in raw.split(',') {
        let Ok(idx) = token.trim().parse::<usize>() else {
            continue;
        };
        if idx < len && !seen[idx] {
            seen[idx] = true;
            ids.push(idx);
        }
    }
    ids
}

fn first_k(mut candidates: Vec<Chunk>, k: usize) -> Vec<Chunk> {
    candidates.truncate(k);
    candidates
}
