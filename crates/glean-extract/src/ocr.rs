//! OCR text extraction via Tesseract.
//!
//! Two entry points with the same downstream behavior: from a file path or
//! from raw bytes. Either way the image is decoded, normalized
//! ([`crate::normalize`]), and handed to Tesseract. Blank output is a
//! valid, non-error result for an unrecognizable image.

use std::path::Path;

use image::DynamicImage;
use rusty_tesseract::{Args, Image};

use crate::error::{ExtractError, ExtractResult};
use crate::normalize;

/// OCR extractor wrapping the Tesseract engine.
///
/// Requires a tesseract install; engine invocations run under
/// `spawn_blocking` to keep the async runtime responsive.
#[derive(Debug, Clone)]
pub struct OcrExtractor {
    /// Tesseract language setting.
    lang: String,
}

impl OcrExtractor {
    /// Create an OCR extractor with the default language.
    pub fn new() -> Self {
        Self {
            lang: "eng".to_string(),
        }
    }

    /// Set the Tesseract language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Recognize text in an image file on disk.
    pub async fn extract_path(&self, path: &Path) -> ExtractResult<String> {
        let content = tokio::fs::read(path).await?;
        self.extract_bytes(&content).await
    }

    /// Recognize text in an in-memory image buffer.
    pub async fn extract_bytes(&self, content: &[u8]) -> ExtractResult<String> {
        let content = content.to_vec();
        let lang = self.lang.clone();
        tokio::task::spawn_blocking(move || recognize(&content, &lang)).await?
    }
}

impl Default for OcrExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode, normalize, and OCR one image (called within spawn_blocking).
fn recognize(content: &[u8], lang: &str) -> ExtractResult<String> {
    let decoded = image::load_from_memory(content)
        .map_err(|e| ExtractError::Image(format!("failed to decode image: {e}")))?;

    let normalized = normalize::normalize(&decoded);

    let tesseract_image = Image::from_dynamic_image(&DynamicImage::ImageLuma8(normalized))
        .map_err(|e| ExtractError::Ocr(e.to_string()))?;

    let args = Args {
        lang: lang.to_string(),
        ..Args::default()
    };
    rusty_tesseract::image_to_string(&tesseract_image, &args)
        .map_err(|e| ExtractError::Ocr(e.to_string()))
}
