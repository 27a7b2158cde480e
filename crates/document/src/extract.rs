//! Raw text extraction and whitespace normalization.
//!
//! PDF bytes go through the text layer only; there is no OCR fallback, so
//! a scanned image-only PDF surfaces as `UnreadableDocument`. Anything that
//! is not a PDF must be UTF-8 plain text.

use askdoc_core::{AppError, AppResult};

/// Extract and normalize text from document bytes.
///
/// Fails with `UnreadableDocument` when no extractable text is found:
/// corrupt PDFs, PDFs without a text layer, non-UTF-8 binary content, or
/// documents that are empty after normalization.
pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let raw = if bytes.starts_with(b"%PDF") {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError::UnreadableDocument(format!("PDF text extraction failed: {}", e))
        })?
    } else {
        match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => {
                return Err(AppError::UnreadableDocument(
                    "binary content is neither a PDF nor UTF-8 text".to_string(),
                ))
            }
        }
    };

    let normalized = normalize_whitespace(&raw);

    if normalized.is_empty() {
        return Err(AppError::UnreadableDocument(
            "document contains no extractable text".to_string(),
        ));
    }

    tracing::debug!(
        raw_len = raw.len(),
        normalized_len = normalized.len(),
        "Extracted document text"
    );

    Ok(normalized)
}

/// Collapse all whitespace runs to single spaces and trim the ends.
///
/// Every passage offset in the pipeline refers to this normalized form.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text("The Moon is Earth's only natural satellite.".as_bytes()).unwrap();
        assert_eq!(text, "The Moon is Earth's only natural satellite.");
    }

    #[test]
    fn test_extract_normalizes_whitespace() {
        let text = extract_text(b"  line one\n\n\tline   two  ").unwrap();
        assert_eq!(text, "line one line two");
    }

    #[test]
    fn test_extract_empty_is_unreadable() {
        let err = extract_text(b"").unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_extract_whitespace_only_is_unreadable() {
        let err = extract_text(b" \n\t ").unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_extract_binary_is_unreadable() {
        let err = extract_text(&[0xff, 0xfe, 0x00, 0x12]).unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_extract_corrupt_pdf_is_unreadable() {
        let err = extract_text(b"%PDF-1.7 not actually a pdf").unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_normalize_preserves_unicode() {
        let text = normalize_whitespace("\u{0686}\u{0020}\u{0020}text");
        assert_eq!(text, "\u{0686} text");
    }
}
