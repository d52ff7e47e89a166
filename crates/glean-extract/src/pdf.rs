//! PDF text extraction using pdf-extract.

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Extraction, SourceFile};
use crate::Extractor;

/// PDF extractor: per-page text, concatenated in document order with a
/// newline after every page, the last included.
///
/// Wraps synchronous pdf-extract calls in spawn_blocking to avoid blocking
/// the async runtime.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, file: &SourceFile) -> ExtractResult<Extraction> {
        let content = file.content.clone();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&content)
                .map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await??;

        let mut text = String::new();
        for page in &pages {
            text.push_str(page);
            text.push('\n');
        }

        Ok(Extraction::new(file.name.clone(), text))
    }

    fn name(&self) -> &str {
        "pdf"
    }
}
