//! Console output layer. All user-facing text lives here.

use colored::Colorize;
use doc_ingest::IngestStats;

pub fn title(text: &str) {
    println!("\n{} {} {}", "=".repeat(10).blue(), text.bold(), "=".repeat(10).blue());
}

pub fn menu() {
    println!();
    println!("{} Rodar ingestão (reconstruir índice)", "[1]".green().bold());
    println!("{} Abrir chat assistente", "[2]".green().bold());
}

pub fn load_stats(stats: &IngestStats) {
    println!("\n{}", "Estatísticas de carregamento:".bold());
    for (source, pages) in &stats.pages_per_source {
        println!("  - Fonte {}: {} páginas", source.to_uppercase(), pages);
    }
}

pub fn chunking_stats(stats: &IngestStats) {
    println!("\n{}", "Estatísticas de chunking:".bold());
    println!("  - Total de chunks: {}", stats.total_chunks);
    println!("  - Tamanho médio: {} caracteres", stats.avg_chunk_chars);
}

pub fn index_status(collection: &str, indexed: u64) {
    println!(
        "\nColeção {} reconstruída com {} chunks.",
        collection.cyan(),
        indexed
    );
}

pub fn empty_index_notice(collection: &str) {
    println!(
        "\n{} coleção {} criada vazia; rode a ingestão (opção 1) antes de perguntar.",
        "Aviso:".yellow().bold(),
        collection.cyan()
    );
}

pub fn success(message: &str) {
    println!("\n{}", message.green().bold());
}

pub fn qa_exchange(question: &str, answer: &str) {
    println!("\n{} {}", "Pergunta:".bold(), question);
    println!("{} {}", "Resposta:".bold(), answer);
    println!("{}", "-".repeat(50).dimmed());
}

pub fn failure(context: &str, detail: &str) {
    eprintln!("\n{} {detail}", format!("{context}:").red().bold());
}
