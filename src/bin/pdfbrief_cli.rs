//! Local entrypoint running the summary pipeline against a PDF on disk.
//!
//! Uses the same configuration and generation client as the HTTP server and prints the JSON
//! payload the `/generate-summary` endpoint would have returned.
use anyhow::{Context, Result};
use clap::Parser;
use pdfbrief::{
    config,
    generation::GeminiClient,
    logging,
    processing::{PipelineOptions, SummaryService, UploadedDocument},
};
use std::{num::NonZeroUsize, path::PathBuf, sync::Arc};

#[derive(Parser)]
#[command(
    name = "pdfbrief-cli",
    about = "Summarize a local PDF into a teaching script and flowchart"
)]
struct Cli {
    /// PDF file to summarize.
    #[arg(long)]
    input: PathBuf,
    /// Override the chunk size (characters) from the environment. Must be positive.
    #[arg(long, conflicts_with = "no_chunking")]
    chunk_size: Option<NonZeroUsize>,
    /// Send the whole document in a single summary prompt.
    #[arg(long)]
    no_chunking: bool,
    /// Skip the flowchart step.
    #[arg(long)]
    no_flowchart: bool,
    /// Write the JSON payload here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn options(&self, base: PipelineOptions) -> PipelineOptions {
        let chunk_size = if self.no_chunking {
            None
        } else {
            self.chunk_size.map(NonZeroUsize::get).or(base.chunk_size)
        };
        PipelineOptions {
            chunk_size,
            flowchart: base.flowchart && !self.no_flowchart,
            page_join: base.page_join,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_tracing();
    let config = config::init_config().context("failed to load configuration")?;

    let bytes = tokio::fs::read(&cli.input)
        .await
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let filename = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());

    let client = GeminiClient::from_config(config).context("failed to build generation client")?;
    let service = SummaryService::with_lopdf(Arc::new(client), cli.options(config.into()));
    let outcome = service
        .summarize_document(UploadedDocument { filename, bytes })
        .await
        .with_context(|| format!("failed to summarize {}", cli.input.display()))?;

    let rendered = serde_json::to_string_pretty(&outcome.payload)?;
    match &cli.output {
        Some(path) => tokio::fs::write(path, rendered + "\n")
            .await
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }

    tracing::info!(
        pages = outcome.page_count,
        chunks = outcome.chunk_count,
        "Summary written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfbrief::config::PageJoin;

    fn base() -> PipelineOptions {
        PipelineOptions {
            chunk_size: Some(5000),
            flowchart: true,
            page_join: PageJoin::Concat,
        }
    }

    #[test]
    fn flags_override_environment_options() {
        let cli = Cli::parse_from(["pdfbrief-cli", "--input", "a.pdf", "--chunk-size", "800"]);
        let options = cli.options(base());
        assert_eq!(options.chunk_size, Some(800));
        assert!(options.flowchart);
        assert_eq!(options.page_join, PageJoin::Concat);

        let cli = Cli::parse_from([
            "pdfbrief-cli",
            "--input",
            "a.pdf",
            "--no-chunking",
            "--no-flowchart",
        ]);
        let options = cli.options(base());
        assert_eq!(options.chunk_size, None);
        assert!(!options.flowchart);
    }

    #[test]
    fn chunk_size_conflicts_with_no_chunking() {
        let result = Cli::try_parse_from([
            "pdfbrief-cli",
            "--input",
            "a.pdf",
            "--chunk-size",
            "10",
            "--no-chunking",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_chunk_size_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from(["pdfbrief-cli", "--input", "a.pdf", "--chunk-size", "0"]);
        let error = result.err().expect("zero chunk size should not parse");
        assert_eq!(error.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
