//! glean-extract - Per-format text extraction for batch document processing.
//!
//! Turns opaque binary blobs (raster images, DOCX documents, PDFs) into
//! plain text. Word-processor documents additionally get embedded-image
//! discovery with OCR over each discovered part.
//!
//! # Example
//!
//! ```ignore
//! use glean_extract::{Dispatcher, SourceFile};
//!
//! let dispatcher = Dispatcher::new();
//! let file = SourceFile::read(Path::new("input/report.docx")).await?;
//!
//! // None for unsupported extensions; error text, never a panic,
//! // for failed extractions.
//! if let Some(extraction) = dispatcher.dispatch(&file).await {
//!     println!("{}", extraction.text);
//! }
//! ```

mod dispatch;
mod docx;
mod error;
mod image;
mod ocr;
mod pdf;
mod types;

pub mod normalize;

pub use dispatch::Dispatcher;
pub use docx::DocxExtractor;
pub use error::{ExtractError, ExtractResult};
pub use image::ImageExtractor;
pub use ocr::OcrExtractor;
pub use pdf::PdfExtractor;
pub use types::{EmbeddedImage, Extraction, FileKind, SourceFile};

use async_trait::async_trait;

/// Core Extractor trait - each supported format implements this.
///
/// Extractors report failures as structured errors; the [`Dispatcher`]
/// downgrades them to textual results so nothing propagates past it.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text from one source file.
    async fn extract(&self, file: &SourceFile) -> ExtractResult<Extraction>;

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
