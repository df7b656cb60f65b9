//! Prompt assembly for answer generation.

use chunk_store::Chunk;

/// System instruction for the answer model. Answers must come only from the
/// supplied context and cite which law the information came from.
pub const ANSWER_SYSTEM: &str = "Você é um assistente jurídico especializado em CDC e LGPD.\n\
Responda à pergunta do usuário utilizando APENAS o contexto fornecido.\n\
Se a resposta não estiver no contexto, diga que não possui informações suficientes.\n\
Ao responder, cite se a informação veio do \"CDC\" ou da \"LGPD\" com base nas fontes marcadas no contexto.";

/// Formats the context block: one `[SOURCE]: content` entry per chunk, in
/// the order given, separated by blank lines. Source labels are uppercased
/// so citations read as `[CDC]` / `[LGPD]`.
pub fn format_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("[{}]: {}", c.source.to_uppercase(), c.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the user prompt for the answer model.
pub fn build_answer_prompt(question: &str, context: &str) -> String {
    format!("Contexto:\n{context}\n\nPergunta:\n{question}\n\nResposta:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, source: &str) -> Chunk {
        Chunk {
            content: content.to_string(),
            source: source.to_string(),
            page: None,
        }
    }

    #[test]
    fn context_uppercases_sources_and_preserves_order() {
        let chunks = vec![
            chunk("prazo de arrependimento", "cdc"),
            chunk("dados pessoais sensíveis", "lgpd"),
        ];
        let ctx = format_context(&chunks);
        assert_eq!(
            ctx,
            "[CDC]: prazo de arrependimento\n\n[LGPD]: dados pessoais sensíveis"
        );
    }

    #[test]
    fn empty_context_is_empty_string() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn system_instruction_demands_grounded_refusal() {
        assert!(ANSWER_SYSTEM.contains("APENAS o contexto"));
        assert!(ANSWER_SYSTEM.contains("não possui informações suficientes"));
    }

    #[test]
    fn answer_prompt_carries_context_and_question() {
        let p = build_answer_prompt("qual o prazo?", "[CDC]: sete dias");
        assert!(p.starts_with("Contexto:\n[CDC]: sete dias"));
        assert!(p.contains("Pergunta:\nqual o prazo?"));
        assert!(p.ends_with("Resposta:"));
    }
}
