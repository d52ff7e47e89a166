//! Batch runner: one pass over the input directory.

use std::io;
use std::path::Path;

use glean_extract::{Dispatcher, Extraction, FileKind, SourceFile};
use tracing::{debug, info};

use crate::report;
use crate::run::Run;

/// Process every supported file in `input_dir`, flat and in
/// directory-enumeration order. Directories, hidden files, and unsupported
/// extensions are skipped without error.
///
/// Returns the number of files processed (attempts, not successes); zero
/// means nothing eligible was found. Only a failure to enumerate the
/// directory or to write the artifact is an error here; per-file extraction
/// failures land in the report as error text.
pub async fn process_directory(
    run: &mut Run,
    dispatcher: &Dispatcher,
    input_dir: &Path,
) -> io::Result<usize> {
    let mut entries = tokio::fs::read_dir(input_dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if !FileKind::from_path(&path).is_supported() {
            debug!(file = %path.display(), "skipping unsupported file");
            continue;
        }

        let extraction = match SourceFile::read(&path).await {
            Ok(file) => match dispatcher.dispatch(&file).await {
                Some(extraction) => extraction,
                None => continue,
            },
            // An unreadable source still gets its report block.
            Err(err) => Extraction::error(&name, &err),
        };

        let artifact = report::append(run.output_path(), &extraction).await?;
        let processed = run.record_processed();
        info!(
            file = %path.display(),
            artifact = %artifact.display(),
            processed,
            "processed file"
        );
    }

    Ok(run.processed())
}
