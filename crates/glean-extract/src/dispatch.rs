//! Extension-based routing of source files to extractors.

use tracing::warn;

use crate::docx::DocxExtractor;
use crate::image::ImageExtractor;
use crate::ocr::OcrExtractor;
use crate::pdf::PdfExtractor;
use crate::types::{Extraction, FileKind, SourceFile};
use crate::Extractor;

/// Routes a source file to the extractor for its kind.
///
/// Extraction failures never cross this boundary: an extractor's error is
/// downgraded here to an [`Extraction`] carrying `"Error: ..."` text, so
/// downstream consumers only ever see a result, never a fault.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    image: ImageExtractor,
    word: DocxExtractor,
    pdf: PdfExtractor,
}

impl Dispatcher {
    /// Create a dispatcher with default extractors.
    pub fn new() -> Self {
        Self {
            image: ImageExtractor::new(),
            word: DocxExtractor::new(),
            pdf: PdfExtractor::new(),
        }
    }

    /// Share one OCR configuration across the image and document extractors.
    pub fn with_ocr(ocr: OcrExtractor) -> Self {
        Self {
            image: ImageExtractor::new().with_ocr(ocr.clone()),
            word: DocxExtractor::new().with_ocr(ocr),
            pdf: PdfExtractor::new(),
        }
    }

    /// Dispatch one file. Unsupported kinds return `None` and are not an
    /// error; supported kinds always yield an extraction, error text
    /// included.
    pub async fn dispatch(&self, file: &SourceFile) -> Option<Extraction> {
        let result = match file.kind() {
            FileKind::Image => self.image.extract(file).await,
            FileKind::WordDocument => self.word.extract(file).await,
            FileKind::Pdf => self.pdf.extract(file).await,
            FileKind::Unsupported => return None,
        };

        Some(result.unwrap_or_else(|err| {
            warn!(file = %file.name, error = %err, "extraction failed");
            Extraction::error(&file.name, &err)
        }))
    }
}
