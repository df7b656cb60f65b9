//! Paragraph-aware chunk splitting with overlap carry-over.
//!
//! Chunks are packed from paragraphs up to `chunk_size` characters; when a
//! chunk is flushed, the tail of the previous chunk (up to `overlap`
//! characters) seeds the next one so article boundaries are not lost between
//! chunks. Paragraphs longer than `chunk_size` are hard-split into
//! overlapping windows.

use chunk_store::ChunkRecord;
use tracing::debug;

use crate::source::PageText;

/// Splitting knobs. Sizes are in characters, not bytes.
#[derive(Clone, Copy, Debug)]
pub struct SplitConfig {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Characters carried over from the previous chunk.
    pub overlap: usize,
    /// Fragments shorter than this are dropped.
    pub min_chars: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 100,
            min_chars: 16,
        }
    }
}

/// Splits loaded pages into chunk records labeled with `source`.
///
/// Records get stable ids of the form `"{source}:{seq}"` and keep the page
/// index where each chunk started.
pub fn split_pages(pages: &[PageText], source: &str, cfg: SplitConfig) -> Vec<ChunkRecord> {
    let chunk_size = cfg.chunk_size.max(1);
    let overlap = cfg.overlap.min(chunk_size.saturating_sub(1));

    let mut out: Vec<ChunkRecord> = Vec::new();
    let mut buf = String::new();
    let mut buf_chars = 0usize;
    let mut buf_page: Option<u32> = None;
    let mut carry = String::new();

    for page in pages {
        for para in page.text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            let para_chars = para.chars().count();

            // Oversized paragraph: flush what we have, then window it.
            if para_chars > chunk_size {
                flush(&mut out, &mut buf, &mut buf_chars, &mut buf_page, source, cfg, &mut carry);
                hard_split(para, page.page, source, chunk_size, overlap, cfg, &mut out);
                carry.clear();
                continue;
            }

            let sep = if buf.is_empty() { 0 } else { 2 };
            if buf_chars + sep + para_chars > chunk_size {
                flush(&mut out, &mut buf, &mut buf_chars, &mut buf_page, source, cfg, &mut carry);
                // The carry seeds the next chunk only when the paragraph
                // still fits beside it within the size bound.
                let carry_chars = carry.chars().count();
                if !carry.is_empty() && carry_chars + 2 + para_chars <= chunk_size {
                    buf.push_str(&carry);
                    buf_chars = carry_chars;
                }
            }

            if buf_page.is_none() {
                buf_page = Some(page.page);
            }
            if !buf.is_empty() {
                buf.push_str("\n\n");
                buf_chars += 2;
            }
            buf.push_str(para);
            buf_chars += para_chars;
        }
    }

    flush(&mut out, &mut buf, &mut buf_chars, &mut buf_page, source, cfg, &mut carry);

    debug!("split_pages: source={} chunks={}", source, out.len());
    out
}

fn flush(
    out: &mut Vec<ChunkRecord>,
    buf: &mut String,
    buf_chars: &mut usize,
    buf_page: &mut Option<u32>,
    source: &str,
    cfg: SplitConfig,
    carry: &mut String,
) {
    let content = buf.trim();
    if content.chars().count() >= cfg.min_chars {
        *carry = tail_chars(content, cfg.overlap);
        push_record(out, content.to_string(), source, *buf_page);
    }
    buf.clear();
    *buf_chars = 0;
    *buf_page = None;
}

fn hard_split(
    para: &str,
    page: u32,
    source: &str,
    chunk_size: usize,
    overlap: usize,
    cfg: SplitConfig,
    out: &mut Vec<ChunkRecord>,
) {
    let chars: Vec<char> = para.chars().collect();
    let step = chunk_size - overlap;
    let mut start = 0usize;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        if window.trim().chars().count() >= cfg.min_chars {
            push_record(out, window.trim().to_string(), source, Some(page));
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
}

fn push_record(out: &mut Vec<ChunkRecord>, content: String, source: &str, page: Option<u32>) {
    let seq = out.len();
    out.push(ChunkRecord {
        id: format!("{source}:{seq}"),
        content,
        source: source.to_string(),
        page,
        seq,
        embedding: None,
    });
}

/// Last `n` characters of `s`, starting on a whitespace boundary when one
/// exists inside the window.
fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= n {
        return s.to_string();
    }
    let mut start = chars.len() - n;
    // Prefer not to cut a word in half.
    while start < chars.len() && !chars[start].is_whitespace() {
        start += 1;
    }
    chars[start..].iter().collect::<String>().trim_start().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str, page: u32) -> PageText {
        PageText {
            text: text.to_string(),
            page,
        }
    }

    fn cfg(chunk_size: usize, overlap: usize) -> SplitConfig {
        SplitConfig {
            chunk_size,
            overlap,
            min_chars: 5,
        }
    }

    #[test]
    fn chunks_respect_size_bound() {
        let body = (0..40)
            .map(|i| format!("Artigo {i} garante um direito do consumidor."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_pages(&[page(&body, 0)], "cdc", cfg(200, 40));
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.content.chars().count() <= 200, "chunk too long: {}", c.content.len());
        }
    }

    #[test]
    fn carry_never_pushes_a_chunk_past_the_bound() {
        // Near-full paragraphs with a large overlap: the carry must be
        // dropped when it cannot fit beside the next paragraph.
        let body = (0..3)
            .map(|i| {
                format!("inciso {i} {}", "do artigo aplicado ".repeat(4))
                    .trim()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_pages(&[page(&body, 0)], "cdc", cfg(100, 50));
        assert_eq!(chunks.len(), 3);
        for c in &chunks {
            assert!(
                c.content.chars().count() <= 100,
                "chunk too long: {} chars",
                c.content.chars().count()
            );
        }
    }

    #[test]
    fn consecutive_chunks_share_overlap() {
        let body = (0..40)
            .map(|i| format!("Paragrafo numero {i} do texto legal."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_pages(&[page(&body, 0)], "lgpd", cfg(150, 50));
        assert!(chunks.len() > 2);
        // The second chunk must begin with a tail of the first.
        let first = &chunks[0].content;
        let second = &chunks[1].content;
        let tail: String = tail_chars(first, 50);
        assert!(second.starts_with(tail.as_str()));
    }

    #[test]
    fn long_paragraph_is_windowed() {
        let body = "x".repeat(1000);
        let chunks = split_pages(&[page(&body, 2)], "cdc", cfg(300, 60));
        assert!(chunks.len() >= 4);
        for c in &chunks {
            assert!(c.content.chars().count() <= 300);
            assert_eq!(c.page, Some(2));
        }
    }

    #[test]
    fn short_fragments_are_dropped() {
        let chunks = split_pages(&[page("ok", 0)], "cdc", cfg(100, 10));
        assert!(chunks.is_empty());
    }

    #[test]
    fn ids_and_sequence_are_stable() {
        let body = (0..10)
            .map(|i| format!("Texto do artigo {i} com conteudo suficiente."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_pages(&[page(&body, 0)], "cdc", cfg(120, 20));
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.seq, i);
            assert_eq!(c.id, format!("cdc:{i}"));
            assert_eq!(c.source, "cdc");
        }
    }
}
