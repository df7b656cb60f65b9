mod view;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chunk_store::{ChunkStore, StoreConfig};
use doc_ingest::{DocumentSource, PdfDocumentSource, SplitConfig, load_and_split, max_pages_from_env};
use legal_qa::{GatewayEmbedder, QaConfig, QaPipeline, StoreSearcher};
use llm_gateway::LlmProfiles;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A .env file is a convenience, not a requirement.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    view::menu();
    let choice = read_line("\nEscolha uma opção: ")?;

    match choice.trim() {
        "1" => run_ingestion().await,
        _ => run_chat().await,
    }
}

/// Loads the two source PDFs, splits them and rebuilds the vector index.
async fn run_ingestion() -> Result<(), Box<dyn Error>> {
    view::title("PIPELINE DE INGESTÃO");

    let store = Arc::new(ChunkStore::new(StoreConfig::from_env()?)?);
    let profiles = Arc::new(LlmProfiles::from_env()?);
    let embedder = GatewayEmbedder::new(profiles, store.config().embedding_dim);

    let sources: Vec<Box<dyn DocumentSource>> = vec![
        Box::new(PdfDocumentSource::new(
            env_or("CDC_PDF_PATH", "dados/cdc.pdf"),
            "cdc",
        )),
        Box::new(PdfDocumentSource::new(
            env_or("LGPD_PDF_PATH", "dados/lgpd.pdf"),
            "lgpd",
        )),
    ];

    let split_cfg = SplitConfig {
        chunk_size: env_parse("CHUNK_SIZE").unwrap_or(1500),
        overlap: env_parse("CHUNK_OVERLAP").unwrap_or(300),
        ..SplitConfig::default()
    };

    let (records, stats) = load_and_split(&sources, split_cfg, max_pages_from_env())?;
    view::load_stats(&stats);
    view::chunking_stats(&stats);

    // Rebuild from scratch so stale chunks from earlier runs cannot linger.
    store.reset().await?;
    let indexed = store.index_records(records, &embedder).await?;
    view::index_status(&store.config().collection, indexed);

    view::success("Pipeline executado com sucesso!");
    Ok(())
}

/// Interactive question loop against the indexed documents.
async fn run_chat() -> Result<(), Box<dyn Error>> {
    view::title("ASSISTENTE JURÍDICO (CDC & LGPD)");
    println!("Digite sua pergunta ou 'sair' para encerrar.");

    let store = Arc::new(ChunkStore::new(StoreConfig::from_env()?)?);
    // A fresh collection means nothing was ingested yet; say so up front
    // instead of answering every question with a refusal.
    if store.ensure_ready().await? {
        view::empty_index_notice(&store.config().collection);
    }

    let profiles = Arc::new(LlmProfiles::from_env()?);
    let embedder = Arc::new(GatewayEmbedder::new(
        profiles.clone(),
        store.config().embedding_dim,
    ));
    let searcher = Arc::new(StoreSearcher::new(store, embedder));
    let pipeline = QaPipeline::new(searcher, profiles, QaConfig::from_env());

    let use_reranking = env_parse::<u8>("RAG_USE_RERANKING").map(|v| v != 0).unwrap_or(true);

    loop {
        let question = read_line("\nVocê: ")?;
        let question = question.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "sair" | "exit" | "quit") {
            break;
        }

        match pipeline.ask(question, use_reranking).await {
            Ok(answer) => view::qa_exchange(question, &answer),
            Err(e) => view::failure("Erro ao responder", &e.to_string()),
        }
    }

    Ok(())
}

fn read_line(prompt: &str) -> Result<String, io::Error> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
