//! Core types for the extraction content model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

/// Classification of a source file by its extension.
///
/// The set is closed: everything outside the three supported families is
/// `Unsupported` and is silently skipped by the dispatcher. Matching is
/// case-insensitive and based solely on the filename suffix; file content
/// is never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Raster image handed directly to OCR (.png, .jpg, .jpeg).
    Image,
    /// Word-processor document (.docx, .doc).
    WordDocument,
    /// PDF document (.pdf).
    Pdf,
    /// Anything else; not an error, just ignored.
    Unsupported,
}

impl FileKind {
    /// Classify a lower- or mixed-case extension (without the leading dot).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" => FileKind::Image,
            "docx" | "doc" => FileKind::WordDocument,
            "pdf" => FileKind::Pdf,
            _ => FileKind::Unsupported,
        }
    }

    /// Classify a path by its suffix.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileKind::Unsupported)
    }

    /// Whether an extractor exists for this kind.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FileKind::Unsupported)
    }
}

/// A file handed to the dispatcher: identity plus raw bytes.
///
/// Read-only input; constructed once per file by the batch driver.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Location the bytes were read from.
    pub path: PathBuf,
    /// Final path component, used to label the report block.
    pub name: String,
    /// Lower-cased extension without the leading dot; empty if none.
    pub extension: String,
    /// Raw byte content.
    pub content: Vec<u8>,
}

impl SourceFile {
    /// Read a source file from disk.
    pub async fn read(path: &Path) -> ExtractResult<Self> {
        let content = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(path, content))
    }

    /// Build a source file from already-loaded bytes.
    pub fn from_bytes(path: &Path, content: Vec<u8>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            name,
            extension,
            content,
        }
    }

    /// Classification used by the dispatcher.
    pub fn kind(&self) -> FileKind {
        FileKind::from_extension(&self.extension)
    }
}

/// One embedded image discovered inside a word-processor document.
///
/// Ephemeral: recorded during the relationship scan and rendered into the
/// parent document's combined text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    /// 1-based position in relationship-iteration order. The order is
    /// producer-defined and not guaranteed stable across producers.
    pub index: usize,
    /// Whether OCR produced any non-blank text.
    pub recognized: bool,
    /// The recognized text; may be empty when `recognized` is false.
    pub text: String,
}

impl EmbeddedImage {
    /// Record an OCR result, classifying blank output as unrecognized.
    pub fn from_ocr(index: usize, text: String) -> Self {
        let recognized = !text.trim().is_empty();
        Self {
            index,
            recognized,
            text,
        }
    }

    /// Render this entry the way it appears in the combined document text.
    pub fn render(&self) -> String {
        if self.recognized {
            format!("Embedded Image Text {}:\n{}\n", self.index, self.text)
        } else {
            format!("Embedded Image {} (no text detected):\n", self.index)
        }
    }
}

/// The outcome of extracting one source file.
///
/// Produced by an extractor, consumed once by the report writer. The text is
/// either recognized content or `"Error: ..."` when extraction failed; the
/// report writer does not distinguish the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Origin filename, used for the report block header.
    pub source: String,
    /// Extracted text, or an error description.
    pub text: String,
    /// Embedded-image sub-results, in discovery order. Empty for images
    /// and PDFs.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedded_images: Vec<EmbeddedImage>,
}

impl Extraction {
    /// Create an extraction result with no embedded images.
    pub fn new(source: impl Into<String>, text: String) -> Self {
        Self {
            source: source.into(),
            text,
            embedded_images: Vec::new(),
        }
    }

    /// Attach embedded-image sub-results.
    pub fn with_embedded_images(mut self, images: Vec<EmbeddedImage>) -> Self {
        self.embedded_images = images;
        self
    }

    /// Downgrade a failure into a textual result, so extraction errors
    /// reach the report as content rather than aborting the run.
    pub fn error(source: impl Into<String>, err: &ExtractError) -> Self {
        Self::new(source, format!("Error: {err}"))
    }
}
