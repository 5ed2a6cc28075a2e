use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity since startup.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_summarized: AtomicU64,
    chunks_processed: AtomicU64,
    generation_calls: AtomicU64,
    failed_requests: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document that produced a response, with the number of summary prompts it needed.
    pub fn record_document(&self, chunk_count: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_processed
            .fetch_add(chunk_count, Ordering::Relaxed);
    }

    /// Record one call to the generation service, successful or not.
    pub fn record_generation_call(&self) {
        self.generation_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that ended in an error response.
    pub fn record_failure(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunks_processed: self.chunks_processed.load(Ordering::Relaxed),
            generation_calls: self.generation_calls.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents that produced a summary response.
    pub documents_summarized: u64,
    /// Summary prompts built across all documents (one per chunk, or one per unchunked document).
    pub chunks_processed: u64,
    /// Calls issued to the generation service.
    pub generation_calls: u64,
    /// Requests that failed validation, extraction, or generation.
    pub failed_requests: u64,
}
