//! Document loading and chunking for the legal index.
//!
//! A [`DocumentSource`] yields pages of text; [`split_pages`] packs them into
//! overlapping [`chunk_store::ChunkRecord`]s ready for embedding and upsert.
//! [`load_and_split`] runs the whole ingestion front end over a set of
//! sources and reports per-source statistics.

pub mod errors;
pub mod source;
pub mod split;

use std::env;

use chunk_store::ChunkRecord;
use tracing::info;

pub use errors::IngestError;
pub use source::{DocumentSource, PageText, PdfDocumentSource};
pub use split::{SplitConfig, split_pages};

/// Per-run ingestion statistics, for the console view.
#[derive(Clone, Debug, Default)]
pub struct IngestStats {
    /// `(source label, pages loaded)` in load order.
    pub pages_per_source: Vec<(String, usize)>,
    /// Chunks produced across all sources.
    pub total_chunks: usize,
    /// Mean chunk length in characters (0 when no chunks).
    pub avg_chunk_chars: usize,
}

/// Optional per-source page cap, from `INGEST_MAX_PAGES`.
///
/// Keeps embedding volume bounded when running against metered providers.
pub fn max_pages_from_env() -> Option<usize> {
    env::var("INGEST_MAX_PAGES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// Loads every source, splits it into chunk records and aggregates stats.
///
/// Records from all sources share one output vector but keep per-source ids
/// and sequence numbers. `max_pages`, when set, truncates each source after
/// that many pages.
pub fn load_and_split(
    sources: &[Box<dyn DocumentSource>],
    cfg: SplitConfig,
    max_pages: Option<usize>,
) -> Result<(Vec<ChunkRecord>, IngestStats), IngestError> {
    let mut records: Vec<ChunkRecord> = Vec::new();
    let mut stats = IngestStats::default();

    for src in sources {
        let mut pages = src.load()?;
        if let Some(cap) = max_pages {
            pages.truncate(cap);
        }
        stats.pages_per_source.push((src.label().to_string(), pages.len()));

        let chunks = split_pages(&pages, src.label(), cfg);
        info!(
            "ingest: source={} pages={} chunks={}",
            src.label(),
            pages.len(),
            chunks.len()
        );
        records.extend(chunks);
    }

    stats.total_chunks = records.len();
    if !records.is_empty() {
        let total_chars: usize = records.iter().map(|r| r.content.chars().count()).sum();
        stats.avg_chunk_chars = total_chars / records.len();
    }

    Ok((records, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource {
        label: &'static str,
        pages: Vec<PageText>,
    }

    impl DocumentSource for StaticSource {
        fn label(&self) -> &str {
            self.label
        }

        fn load(&self) -> Result<Vec<PageText>, IngestError> {
            Ok(self.pages.clone())
        }
    }

    fn source(label: &'static str, pages: &[&str]) -> Box<dyn DocumentSource> {
        Box::new(StaticSource {
            label,
            pages: pages
                .iter()
                .enumerate()
                .map(|(i, t)| PageText {
                    text: t.to_string(),
                    page: i as u32,
                })
                .collect(),
        })
    }

    #[test]
    fn aggregates_stats_across_sources() {
        let sources = vec![
            source("cdc", &["Artigo primeiro do codigo de defesa do consumidor."]),
            source("lgpd", &["Artigo sobre dados pessoais.", "Artigo sobre consentimento."]),
        ];
        let (records, stats) =
            load_and_split(&sources, SplitConfig::default(), None).unwrap();

        assert_eq!(stats.pages_per_source, vec![("cdc".into(), 1), ("lgpd".into(), 2)]);
        assert_eq!(stats.total_chunks, records.len());
        assert!(stats.avg_chunk_chars > 0);
        assert!(records.iter().any(|r| r.source == "cdc"));
        assert!(records.iter().any(|r| r.source == "lgpd"));
    }

    #[test]
    fn page_cap_truncates_each_source() {
        let sources = vec![source(
            "cdc",
            &["Pagina um com texto suficiente.", "Pagina dois com texto suficiente."],
        )];
        let (_, stats) = load_and_split(&sources, SplitConfig::default(), Some(1)).unwrap();
        assert_eq!(stats.pages_per_source, vec![("cdc".into(), 1)]);
    }

    #[test]
    fn source_failure_propagates() {
        struct Broken;
        impl DocumentSource for Broken {
            fn label(&self) -> &str {
                "cdc"
            }
            fn load(&self) -> Result<Vec<PageText>, IngestError> {
                Err(IngestError::EmptyDocument("cdc".into()))
            }
        }
        let sources: Vec<Box<dyn DocumentSource>> = vec![Box::new(Broken)];
        let err = load_and_split(&sources, SplitConfig::default(), None).unwrap_err();
        assert!(matches!(err, IngestError::EmptyDocument(_)));
    }
}
