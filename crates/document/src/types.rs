//! Document and passage types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered, zero-indexed chunk of a document's normalized text.
///
/// Passages are immutable and derived solely from a document; their ordered
/// sequence is invariant for a given document and chunking configuration.
/// `start`/`end` are byte offsets into the normalized document text, and the
/// passage sequence partitions that text (the single-space separators
/// between passages are the only bytes not covered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Position in the document (0-indexed)
    pub index: u32,

    /// Passage text content
    pub text: String,

    /// Byte offset of the first char in the normalized document text
    pub start: usize,

    /// Byte offset one past the last char in the normalized document text
    pub end: usize,

    /// Whitespace token count of `text`
    pub token_count: usize,
}

/// An ingested document: normalized text plus its derived passages.
///
/// Immutable once ingested; session-scoped, held in memory only and
/// discarded when the session ends or a new document replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    /// Session-scoped identifier (UUID v4)
    pub id: Uuid,

    /// Whitespace-normalized extracted text
    pub text: String,

    /// Ordered passage sequence
    pub passages: Vec<Passage>,
}

impl DocumentIndex {
    /// Total whitespace token count across all passages.
    pub fn total_tokens(&self) -> usize {
        self.passages.iter().map(|p| p.token_count).sum()
    }
}
