//! Fixed-size chunking of extracted document text.
//!
//! Chunks are measured in characters (Unicode scalar values), never split a character, and cover
//! the input exactly once: concatenating the chunks in order yields the original text.

use super::types::ChunkingError;

/// Split `text` into consecutive chunks of at most `chunk_size` characters.
///
/// The last chunk may be shorter. An empty input produces no chunks. A `chunk_size` of zero is
/// rejected with [`ChunkingError::InvalidChunkSize`].
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<&str>, ChunkingError> {
    if chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chars_in_chunk = 0;

    for (offset, _) in text.char_indices() {
        if chars_in_chunk == chunk_size {
            chunks.push(&text[start..offset]);
            start = offset;
            chars_in_chunk = 0;
        }
        chars_in_chunk += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    Ok(chunks)
}
