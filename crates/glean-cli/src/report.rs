//! Report writer: appends labeled extraction results to the run artifact.

use std::io;
use std::path::{Path, PathBuf};

use glean_extract::Extraction;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Append one extraction to the artifact, labeled by its source filename.
///
/// The artifact is opened in append mode per call and released before
/// returning, so no handle persists across files. Error text is written
/// the same way as recognized text. Returns the artifact path.
pub async fn append(artifact: &Path, extraction: &Extraction) -> io::Result<PathBuf> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(artifact)
        .await?;

    file.write_all(format!("From {}:\n", extraction.source).as_bytes())
        .await?;
    file.write_all(extraction.text.as_bytes()).await?;
    file.flush().await?;
    file.shutdown().await?;

    Ok(artifact.to_path_buf())
}
