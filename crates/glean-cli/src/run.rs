//! Run context: one invocation, one output artifact.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// State for a single batch run.
///
/// Constructed once at startup and passed by reference into the batch
/// runner; the output artifact is created here, empty, and only ever
/// appended to afterwards.
#[derive(Debug)]
pub struct Run {
    started_at: DateTime<Local>,
    output_path: PathBuf,
    processed: usize,
}

impl Run {
    /// Start a run, deriving and creating its output artifact inside
    /// `output_dir`.
    pub async fn create(output_dir: &Path) -> io::Result<Self> {
        let started_at = Local::now();
        let output_path = output_dir.join(format!(
            "{}_results.txt",
            started_at.format("%Y%m%d_%H%M%S")
        ));
        tokio::fs::File::create(&output_path).await?;

        Ok(Self {
            started_at,
            output_path,
            processed: 0,
        })
    }

    /// When the run started.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Path of the run's single output artifact.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Files processed so far (attempts, not extraction successes).
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Count one dispatch+write attempt; returns the running total.
    pub fn record_processed(&mut self) -> usize {
        self.processed += 1;
        self.processed
    }
}
