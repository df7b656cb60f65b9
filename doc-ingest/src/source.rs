//! Document sources: one implementation per physical document kind.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::errors::IngestError;

/// One page of extracted text.
#[derive(Clone, Debug)]
pub struct PageText {
    /// Extracted text of the page (may be empty for figure-only pages).
    pub text: String,
    /// Zero-based page index.
    pub page: u32,
}

/// Capability for loading a document as an ordered sequence of pages.
///
/// Implement this once per physical source kind; the ingestion pipeline is
/// agnostic to where the text comes from.
pub trait DocumentSource: Send + Sync {
    /// Source label attached to every chunk (e.g. `"cdc"`, `"lgpd"`).
    fn label(&self) -> &str;

    /// Loads the document and returns its pages in order.
    fn load(&self) -> Result<Vec<PageText>, IngestError>;
}

/// PDF source backed by the `pdftotext` system binary.
///
/// Pages are recovered from the form-feed separators `pdftotext` emits
/// between pages.
pub struct PdfDocumentSource {
    path: PathBuf,
    label: String,
}

impl PdfDocumentSource {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }

    fn extract_text(&self) -> Result<String, IngestError> {
        info!("extracting PDF text via pdftotext: {:?}", self.path);

        let output = Command::new("pdftotext")
            .arg(&self.path)
            .arg("-") // write to stdout
            .output()
            .map_err(|e| {
                IngestError::Extractor(format!(
                    "failed to run pdftotext (is poppler-utils installed?): {e}"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngestError::Extractor(format!(
                "pdftotext exited with {}: {}",
                output.status, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl DocumentSource for PdfDocumentSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn load(&self) -> Result<Vec<PageText>, IngestError> {
        if !Path::new(&self.path).exists() {
            return Err(IngestError::FileNotFound(self.path.clone()));
        }

        let raw = self.extract_text()?;
        let pages = split_form_feed_pages(&raw);

        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(IngestError::EmptyDocument(self.label.clone()));
        }

        debug!("loaded {} pages from {:?}", pages.len(), self.path);
        Ok(pages)
    }
}

/// Splits raw `pdftotext` output on form feeds into page records.
pub(crate) fn split_form_feed_pages(raw: &str) -> Vec<PageText> {
    raw.split('\u{c}')
        .enumerate()
        .map(|(i, text)| PageText {
            text: text.to_string(),
            page: i as u32,
        })
        .filter(|p| !p.text.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_feed_split_keeps_page_indexes() {
        let raw = "page zero\u{c}page one\u{c}\u{c}page three";
        let pages = split_form_feed_pages(raw);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page, 0);
        assert_eq!(pages[1].page, 1);
        // The blank page is dropped but indexes stay absolute.
        assert_eq!(pages[2].page, 3);
        assert_eq!(pages[2].text, "page three");
    }

    #[test]
    fn missing_file_is_reported() {
        let src = PdfDocumentSource::new("/nonexistent/cdc.pdf", "cdc");
        assert!(matches!(src.load(), Err(IngestError::FileNotFound(_))));
    }
}
