//! Summary service coordinating extraction, chunking, prompting, and generation.

use crate::{
    generation::{GenerationClient, GenerationError},
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        chunking::chunk_text,
        extraction::{self, LopdfExtractor, PdfTextExtractor},
        flowchart::extract_flowchart,
        prompts::{explanation_prompt, flowchart_prompt, script_prompt},
        types::{
            PipelineOptions, ProcessingError, SummaryOutcome, SummaryPayload, UploadedDocument,
            ValidationError,
        },
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Runs the full pipeline for one uploaded PDF: extract, chunk, prompt, generate, assemble.
///
/// The service holds no per-request state. Collaborators are injected at construction so the
/// HTTP surface, the CLI, and tests share one code path with different backends.
pub struct SummaryService {
    generation_client: Arc<dyn GenerationClient>,
    extractor: Arc<dyn PdfTextExtractor>,
    options: PipelineOptions,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Produce the summary (and optional flowchart) payload for an uploaded document.
    async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummaryOutcome, ProcessingError>;

    /// Count a request rejected before it reached the pipeline.
    fn record_rejected_request(&self);

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryService {
    /// Build a service from explicit collaborators.
    pub fn new(
        generation_client: Arc<dyn GenerationClient>,
        extractor: Arc<dyn PdfTextExtractor>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            generation_client,
            extractor,
            options,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build a service that parses PDFs with the bundled `lopdf` extractor.
    pub fn with_lopdf(
        generation_client: Arc<dyn GenerationClient>,
        options: PipelineOptions,
    ) -> Self {
        Self::new(generation_client, Arc::new(LopdfExtractor), options)
    }

    /// Summarize one document, recording the outcome in the metrics registry.
    pub async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummaryOutcome, ProcessingError> {
        let started = Instant::now();
        let filename = document.filename.clone();
        let result = self.run_pipeline(document).await;

        match &result {
            Ok(outcome) => {
                self.metrics.record_document(outcome.chunk_count as u64);
                tracing::info!(
                    filename = %filename,
                    pages = outcome.page_count,
                    chunks = outcome.chunk_count,
                    flowchart = outcome.payload.flowchart.is_some(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Document summarized"
                );
            }
            Err(error) => {
                self.metrics.record_failure();
                if error.is_client_error() {
                    tracing::info!(filename = %filename, error = %error, "Document rejected");
                } else {
                    tracing::error!(
                        filename = %filename,
                        error = %error,
                        "Document summarization failed"
                    );
                }
            }
        }

        result
    }

    async fn run_pipeline(
        &self,
        document: UploadedDocument,
    ) -> Result<SummaryOutcome, ProcessingError> {
        document.validate()?;
        let UploadedDocument { filename, bytes } = document;
        tracing::debug!(filename = %filename, bytes = bytes.len(), "Extracting PDF text");

        let extracted =
            extraction::extract_text(self.extractor.clone(), bytes, self.options.page_join).await?;
        if extracted.text.trim().is_empty() {
            return Err(ValidationError::EmptyDocument.into());
        }
        tracing::debug!(
            filename = %filename,
            pages = extracted.page_count,
            chars = extracted.text.chars().count(),
            "Extracted PDF text"
        );

        let (summary, chunk_count) = self.summarize_text(&extracted.text).await?;

        let flowchart = if self.options.flowchart {
            let raw = self.generate(&flowchart_prompt(&extracted.text)).await?;
            Some(extract_flowchart(&raw))
        } else {
            None
        };

        Ok(SummaryOutcome {
            payload: SummaryPayload { summary, flowchart },
            page_count: extracted.page_count,
            chunk_count,
        })
    }

    /// Generate the summary text, returning it with the number of prompts sent.
    async fn summarize_text(&self, text: &str) -> Result<(String, usize), ProcessingError> {
        let Some(chunk_size) = self.options.chunk_size else {
            let summary = self.generate(&explanation_prompt(text)).await?;
            return Ok((summary.trim().to_string(), 1));
        };

        let chunks = chunk_text(text, chunk_size)?;
        let total = chunks.len();
        let mut sections = Vec::with_capacity(total);
        for (index, chunk) in chunks.into_iter().enumerate() {
            let section = index + 1;
            tracing::debug!(section, total, chunk_size, "Generating section");
            let output = self.generate(&script_prompt(chunk)).await?;
            sections.push(format!("--- Section {section} ---\n{output}"));
        }

        Ok((sections.join("\n\n").trim().to_string(), total))
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.metrics.record_generation_call();
        self.generation_client.generate(prompt).await
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_document(
        &self,
        document: UploadedDocument,
    ) -> Result<SummaryOutcome, ProcessingError> {
        SummaryService::summarize_document(self, document).await
    }

    fn record_rejected_request(&self) {
        self.metrics.record_failure();
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryService::metrics_snapshot(self)
    }
}
