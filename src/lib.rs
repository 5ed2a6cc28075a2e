#![deny(missing_docs)]

//! Core library for the pdfbrief summarization server.

/// HTTP routing and request handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text-generation client abstraction and the Gemini adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters.
pub mod metrics;
/// PDF-to-summary pipeline.
pub mod processing;
