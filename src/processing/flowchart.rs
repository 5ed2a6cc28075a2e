//! Recovery of Mermaid flowchart text from free-form model output.
//!
//! Models often wrap the diagram in prose or code fences. Everything from the first
//! `graph TD;` directive onward is taken verbatim; output without the directive degrades to
//! [`FALLBACK_FLOWCHART`] instead of failing the request.

use regex::Regex;
use std::sync::LazyLock;

/// Diagram returned when the model output carries no flowchart directive.
pub const FALLBACK_FLOWCHART: &str = "graph TD;\nA[Could not generate flowchart]";

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"graph\s+TD;").expect("flowchart directive pattern is valid"));

/// Return the flowchart portion of `raw`, or `None` when the directive is absent.
pub fn find_flowchart(raw: &str) -> Option<&str> {
    DIRECTIVE.find(raw).map(|found| &raw[found.start()..])
}

/// Return the flowchart portion of `raw`, falling back to [`FALLBACK_FLOWCHART`].
pub fn extract_flowchart(raw: &str) -> String {
    match find_flowchart(raw) {
        Some(diagram) => diagram.to_string(),
        None => {
            tracing::warn!(
                response_len = raw.len(),
                "Flowchart directive missing from model output; using placeholder"
            );
            FALLBACK_FLOWCHART.to_string()
        }
    }
}
