//! Instruction templates wrapped around document text before generation.

/// Literal that every generated flowchart must begin with.
pub const FLOWCHART_MARKER: &str = "graph TD;";

/// Single-call summary: a structured explanation of the whole document.
pub fn explanation_prompt(text: &str) -> String {
    format!(
        "You are an educational AI assistant. Summarize the content below into a well-structured \
explanation for a video script. Include:
- A short intro
- Key points explained simply
- A short conclusion

Text:
{text}
"
    )
}

/// Chunked summary: a five-part teaching script for one section of the document.
pub fn script_prompt(chunk: &str) -> String {
    format!(
        "You are an educational AI assistant writing a narration script for a teaching video. \
Turn the content below into a script with these five parts:
1. Introduction: what this section is about and why it matters
2. Key concepts: the main ideas and terms, defined simply
3. Detailed explanation: walk through the ideas step by step
4. Real-life examples: concrete situations where the ideas apply
5. Conclusion: a short recap of what was covered

Use a friendly, clear tone suitable for students. Do not mention that the text was split into parts.

Text:
{chunk}
"
    )
}

/// Diagram prompt: asks for bare Mermaid.js flowchart syntax.
pub fn flowchart_prompt(text: &str) -> String {
    format!(
        "You are a diagram assistant. Based on the following content, create a Mermaid.js flowchart.

Instructions:
- Output ONLY valid Mermaid.js syntax
- Must begin with '{FLOWCHART_MARKER}'
- No extra explanation or comments
- Use short and descriptive node labels

Text:
{text}
"
    )
}
