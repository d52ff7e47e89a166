//! glean - batch document text extraction binary.

use std::path::PathBuf;

use clap::Parser;
use glean_cli::{batch, Run};
use glean_extract::{Dispatcher, OcrExtractor};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Extract text from images, DOCX, and PDF files into one report.
#[derive(Parser, Debug)]
#[command(name = "glean", version, about)]
struct Cli {
    /// Directory scanned for documents to process.
    #[arg(long, default_value = "input")]
    input: PathBuf,

    /// Directory that receives the timestamped report.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Tesseract language used for OCR.
    #[arg(long, default_value = "eng")]
    lang: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    // Create folders if missing
    tokio::fs::create_dir_all(&cli.input).await?;
    tokio::fs::create_dir_all(&cli.output).await?;

    let mut run = Run::create(&cli.output).await?;
    info!(artifact = %run.output_path().display(), "starting run");

    let dispatcher = Dispatcher::with_ocr(OcrExtractor::new().with_lang(cli.lang));
    let processed = batch::process_directory(&mut run, &dispatcher, &cli.input).await?;

    if processed == 0 {
        println!(
            "The input directory is empty, file types inside are not supported, \
             or files inside cannot be detected."
        );
    } else {
        println!(
            "Processed {processed} files into {}",
            run.output_path().display()
        );
    }

    Ok(())
}
