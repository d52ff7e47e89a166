//! Standalone image extraction: the whole file is one OCR target.

use async_trait::async_trait;

use crate::error::ExtractResult;
use crate::ocr::OcrExtractor;
use crate::types::{Extraction, SourceFile};
use crate::Extractor;

/// Extractor for raster image files (.png, .jpg, .jpeg).
#[derive(Debug, Clone, Default)]
pub struct ImageExtractor {
    ocr: OcrExtractor,
}

impl ImageExtractor {
    /// Create an image extractor with a default OCR engine.
    pub fn new() -> Self {
        Self {
            ocr: OcrExtractor::new(),
        }
    }

    /// Use a custom OCR extractor.
    pub fn with_ocr(mut self, ocr: OcrExtractor) -> Self {
        self.ocr = ocr;
        self
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    async fn extract(&self, file: &SourceFile) -> ExtractResult<Extraction> {
        let text = self.ocr.extract_bytes(&file.content).await?;
        Ok(Extraction::new(file.name.clone(), text))
    }

    fn name(&self) -> &str {
        "image"
    }
}
