//! Greedy token-window chunking with sentence-boundary look-back.

use std::collections::HashSet;

use askdoc_core::ChunkingConfig;
use unicode_segmentation::UnicodeSegmentation;

use crate::token::{self, TokenSpan};
use crate::types::Passage;

/// Split normalized text into passages of at most
/// `config.max_passage_tokens` whitespace tokens each.
///
/// Windows are packed greedily. Before closing a window mid-document the
/// splitter looks back up to `config.boundary_tolerance` tokens for a
/// sentence boundary and closes there when one exists; otherwise it splits
/// at the hard token limit. Passages never overlap: their byte ranges
/// partition the normalized text, separated by single spaces.
///
/// Pure function of (text, config): the same inputs always produce the
/// identical passage sequence.
pub fn split_passages(text: &str, config: &ChunkingConfig) -> Vec<Passage> {
    let tokens = token::whitespace_spans(text);
    if tokens.is_empty() {
        return Vec::new();
    }

    let window = config.max_passage_tokens.max(1);
    let breaks = sentence_break_offsets(text);

    let mut passages = Vec::new();
    let mut cursor = 0usize;
    let mut index = 0u32;

    while cursor < tokens.len() {
        let hard_end = (cursor + window).min(tokens.len());
        let cut = if hard_end < tokens.len() {
            boundary_cut(&tokens, &breaks, cursor, hard_end, config.boundary_tolerance)
        } else {
            hard_end
        };

        let start = tokens[cursor].start;
        let end = tokens[cut - 1].end;

        passages.push(Passage {
            index,
            text: text[start..end].to_string(),
            start,
            end,
            token_count: cut - cursor,
        });

        cursor = cut;
        index += 1;
    }

    tracing::debug!(
        passages = passages.len(),
        window,
        "Split document into passages"
    );

    passages
}

/// Find the cut position in `(cursor, hard_end]`, preferring the latest
/// token whose end coincides with a sentence boundary within the look-back
/// tolerance. A window must contain at least one token, so the search never
/// goes below `cursor + 1`.
fn boundary_cut(
    tokens: &[TokenSpan],
    breaks: &HashSet<usize>,
    cursor: usize,
    hard_end: usize,
    tolerance: usize,
) -> usize {
    let floor = hard_end.saturating_sub(tolerance).max(cursor + 1);

    for cut in (floor..=hard_end).rev() {
        if breaks.contains(&tokens[cut - 1].end) {
            return cut;
        }
    }

    hard_end
}

/// Byte offsets at which a sentence ends (trailing whitespace excluded),
/// per UAX#29 sentence boundaries.
fn sentence_break_offsets(text: &str) -> HashSet<usize> {
    let mut breaks = HashSet::new();
    let mut offset = 0usize;

    for sentence in text.split_sentence_bounds() {
        let trimmed = sentence.trim_end();
        if !trimmed.is_empty() {
            breaks.insert(offset + trimmed.len());
        }
        offset += sentence.len();
    }

    breaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(window: usize, tolerance: usize) -> ChunkingConfig {
        ChunkingConfig {
            max_passage_tokens: window,
            boundary_tolerance: tolerance,
        }
    }

    #[test]
    fn test_single_passage_when_text_fits() {
        let text = "The Moon is Earth's only natural satellite.";
        let passages = split_passages(text, &config(160, 24));

        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].index, 0);
        assert_eq!(passages[0].text, text);
        assert_eq!(passages[0].token_count, 7);
    }

    #[test]
    fn test_window_limit_respected() {
        let text = "word ".repeat(100);
        let passages = split_passages(text.trim_end(), &config(16, 4));

        assert!(passages.len() > 1);
        for passage in &passages {
            assert!(passage.token_count <= 16);
        }
    }

    #[test]
    fn test_prefers_sentence_boundary() {
        // 8 tokens to the first period, window of 10 with enough look-back
        let text = "One two three four five six seven eight. Nine ten eleven twelve.";
        let passages = split_passages(text, &config(10, 4));

        assert_eq!(passages[0].text, "One two three four five six seven eight.");
        assert_eq!(passages[1].text, "Nine ten eleven twelve.");
    }

    #[test]
    fn test_hard_split_without_boundary() {
        let text = "a b c d e f g h i j k l";
        let passages = split_passages(text, &config(5, 2));

        assert_eq!(passages[0].token_count, 5);
        assert_eq!(passages[0].text, "a b c d e");
    }

    #[test]
    fn test_offsets_slice_source_text() {
        let text = "First sentence here. Second sentence follows. Third one ends it.";
        let passages = split_passages(text, &config(4, 2));

        for passage in &passages {
            assert_eq!(&text[passage.start..passage.end], passage.text);
        }
    }

    #[test]
    fn test_coverage_reconstructs_text() {
        let text = "One two three four five six seven eight. Nine ten eleven twelve. More words to push past the window edge here.";
        let passages = split_passages(text, &config(6, 2));

        let rebuilt = passages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_deterministic() {
        let text = "Sentence one is short. Sentence two is a little longer than one. Sentence three closes the set.";
        let cfg = config(7, 3);

        let first = split_passages(text, &cfg);
        let second = split_passages(text, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn test_indices_are_sequential() {
        let text = "tok ".repeat(40);
        let passages = split_passages(text.trim_end(), &config(8, 2));

        for (i, passage) in passages.iter().enumerate() {
            assert_eq!(passage.index as usize, i);
        }
    }

    #[test]
    fn test_empty_text_yields_no_passages() {
        assert!(split_passages("", &config(8, 2)).is_empty());
    }
}
