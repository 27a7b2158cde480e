//! Askdoc Document Library
//!
//! Document ingestion for the question-answering pipeline: raw text
//! extraction from document bytes, whitespace normalization, and greedy
//! token-window chunking into ordered passages.

pub mod extract;
pub mod passage;
pub mod token;
pub mod types;

pub use types::{DocumentIndex, Passage};

use askdoc_core::{AppResult, ChunkingConfig};
use uuid::Uuid;

/// Ingest document bytes into normalized text and ordered passages.
///
/// Pure function of (bytes, config): ingesting the same bytes with the
/// same chunking configuration always yields the identical passage
/// sequence. Fails with `UnreadableDocument` when no text can be
/// extracted.
pub fn ingest(bytes: &[u8], config: &ChunkingConfig) -> AppResult<DocumentIndex> {
    let text = extract::extract_text(bytes)?;
    let passages = passage::split_passages(&text, config);

    let doc = DocumentIndex {
        id: Uuid::new_v4(),
        text,
        passages,
    };

    tracing::info!(
        document_id = %doc.id,
        passages = doc.passages.len(),
        tokens = doc.total_tokens(),
        "Document ingested"
    );

    Ok(doc)
}
