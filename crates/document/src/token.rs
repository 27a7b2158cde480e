//! Whitespace and word tokenization helpers.
//!
//! Token budgets are counted in whitespace tokens and passages are ranked
//! by UAX#29 word overlap: deterministic approximations of the model-side
//! subword tokenizers, not a replacement for them. Unsegmented scripts
//! (Japanese) produce coarser tokens than the model will see; the model's
//! own truncation is the final guard.

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// A token's byte range within its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Byte offset of the first char
    pub start: usize,

    /// Byte offset one past the last char
    pub end: usize,
}

/// Split text into whitespace tokens with byte offsets.
pub fn whitespace_spans(text: &str) -> Vec<TokenSpan> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (offset, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push(TokenSpan { start: s, end: offset });
            }
        } else if start.is_none() {
            start = Some(offset);
        }
    }

    if let Some(s) = start {
        spans.push(TokenSpan {
            start: s,
            end: text.len(),
        });
    }

    spans
}

/// Count whitespace tokens. This is the unit of all token budgets.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased word tokens, punctuation stripped (UAX#29 word boundaries).
pub fn words(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Lowercased word-token set, for lexical overlap ranking.
pub fn word_set(text: &str) -> HashSet<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_spans_offsets() {
        let text = "The Moon is bright";
        let spans = whitespace_spans(text);

        assert_eq!(spans.len(), 4);
        assert_eq!(&text[spans[0].start..spans[0].end], "The");
        assert_eq!(&text[spans[3].start..spans[3].end], "bright");
    }

    #[test]
    fn test_whitespace_spans_empty() {
        assert!(whitespace_spans("").is_empty());
        assert!(whitespace_spans("   ").is_empty());
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens("one two  three"), 3);
        assert_eq!(count_tokens(""), 0);
    }

    #[test]
    fn test_words_strip_punctuation() {
        let tokens = words("What is the Moon?");
        assert_eq!(tokens, vec!["what", "is", "the", "moon"]);
    }

    #[test]
    fn test_word_set_devanagari() {
        let set = word_set("चन्द्रः पृथ्वी उपग्रहः अस्ति");
        assert!(set.contains("चन्द्रः"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_word_overlap_case_insensitive() {
        let q = word_set("What is the MOON?");
        let p = word_set("The moon is a satellite.");
        let overlap = q.intersection(&p).count();
        assert_eq!(overlap, 3); // the, is, moon
    }
}
