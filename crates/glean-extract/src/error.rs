//! Extraction error types.

use thiserror::Error;

/// Errors that can occur while extracting text from a source file.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Image decoding failed.
    #[error("Image error: {0}")]
    Image(String),

    /// OCR engine invocation failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// DOCX container could not be read.
    #[error("DOCX error: {0}")]
    Docx(String),

    /// PDF container could not be read.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// IO error while reading a source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
