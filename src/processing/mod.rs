//! Summarization pipeline: PDF text extraction, chunking, prompting, and response assembly.

pub mod chunking;
pub mod extraction;
pub mod flowchart;
pub mod prompts;
mod service;
pub mod types;

pub use extraction::{ExtractedText, LopdfExtractor, PdfTextExtractor};
pub use service::{SummaryApi, SummaryService};
pub use types::{
    ChunkingError, ExtractionError, PipelineOptions, ProcessingError, SummaryOutcome,
    SummaryPayload, UploadedDocument, ValidationError,
};
