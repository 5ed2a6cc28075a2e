//! Core data types and error definitions for the summarization pipeline.

use crate::config::PageJoin;
use crate::generation::GenerationError;
use serde::Serialize;
use thiserror::Error;

/// Problems with the request itself; surfaced to clients as `4xx` responses.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Multipart body carried no `file` field.
    #[error("No file part in request")]
    MissingFilePart,
    /// The `file` field had no filename attached.
    #[error("No file selected")]
    EmptyFilename,
    /// The uploaded file contained zero bytes.
    #[error("Uploaded file is empty")]
    EmptyFile,
    /// The upload exceeded the configured body limit, in bytes.
    #[error("Uploaded file exceeds the {limit}-byte upload limit")]
    UploadTooLarge {
        /// Configured ceiling on the request body.
        limit: usize,
    },
    /// The body could not be read as `multipart/form-data`.
    #[error("Invalid multipart request: {0}")]
    InvalidMultipart(String),
    /// Extraction succeeded but produced only whitespace.
    #[error("No extractable text found in the uploaded PDF")]
    EmptyDocument,
}

/// Failures while turning PDF bytes into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The document could not be opened or parsed as a PDF.
    #[error("Failed to read PDF: {0}")]
    Parse(String),
    /// The blocking extraction task did not complete.
    #[error("PDF extraction task failed: {0}")]
    Worker(String),
}

/// Errors produced while splitting document text into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// A chunk size of zero can never cover the input.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Request failed intake or post-extraction checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// PDF could not be parsed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Chunker was configured with an impossible size.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Generation service call failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ProcessingError {
    /// Whether the failure is the caller's fault rather than the server's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A PDF received in one request. Owned by the request for its whole lifetime.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Client-supplied filename.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Check the intake rules: non-empty filename and non-empty contents.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filename.trim().is_empty() {
            return Err(ValidationError::EmptyFilename);
        }
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        Ok(())
    }
}

/// Per-request pipeline knobs, built once from configuration and injected into the service.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Maximum chunk length in characters; `None` summarizes the whole document in one call.
    pub chunk_size: Option<usize>,
    /// Whether the flowchart prompt runs after the summary.
    pub flowchart: bool,
    /// Separator policy for extracted pages.
    pub page_join: PageJoin,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: Some(crate::config::DEFAULT_CHUNK_SIZE),
            flowchart: true,
            page_join: PageJoin::Newline,
        }
    }
}

impl From<&crate::config::Config> for PipelineOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            flowchart: config.flowchart_enabled,
            page_join: config.page_join,
        }
    }
}

/// Terminal artifact of one request, serialized as the JSON response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryPayload {
    /// Generated explanation or sectioned script.
    pub summary: String,
    /// Mermaid flowchart, present when the diagram step ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flowchart: Option<String>,
}

/// Result of [`crate::processing::SummaryService::summarize_document`].
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// Response body returned to the caller.
    pub payload: SummaryPayload,
    /// Number of pages the PDF reported.
    pub page_count: usize,
    /// Number of summary prompts sent (chunks, or one for the whole document).
    pub chunk_count: usize,
}
