//! Context selection under a model token budget.
//!
//! Ranking is lexical: the size of the word-set intersection between the
//! question and a passage, not semantic retrieval. It guarantees a
//! bounded, deterministic model input for any document size, nothing more.

use std::collections::HashSet;

use askdoc_core::{AppError, AppResult};
use askdoc_document::{token, Passage};

/// Choose the passages to present to the model for a question.
///
/// The budget is `token_limit` minus the question's own token cost. When
/// the whole document fits it is returned unchanged; otherwise passages
/// are ranked by word overlap with the question (ties broken by ascending
/// index), taken greedily while they fit the remaining budget, and
/// returned in ascending index order.
///
/// Fails with `ContextTooLarge` when the question alone exhausts the
/// budget, or when no single passage fits what remains.
pub fn select_context(
    question: &str,
    passages: &[Passage],
    token_limit: usize,
) -> AppResult<Vec<Passage>> {
    let question_tokens = token::count_tokens(question);

    let budget = match token_limit.checked_sub(question_tokens) {
        Some(budget) if budget > 0 => budget,
        _ => {
            return Err(AppError::ContextTooLarge(format!(
                "question uses {} of {} tokens, leaving no room for context",
                question_tokens, token_limit
            )))
        }
    };

    let total_tokens: usize = passages.iter().map(|p| p.token_count).sum();
    if total_tokens <= budget {
        tracing::debug!(
            passages = passages.len(),
            total_tokens,
            budget,
            "Full document fits the token budget"
        );
        return Ok(passages.to_vec());
    }

    let question_words = token::word_set(question);

    // (overlap, index), best first
    let mut ranked: Vec<(usize, usize)> = passages
        .iter()
        .enumerate()
        .map(|(i, p)| (overlap(&question_words, p), i))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut remaining = budget;
    let mut picked: Vec<usize> = Vec::new();

    for (_, index) in ranked {
        let passage = &passages[index];
        if passage.token_count <= remaining {
            remaining -= passage.token_count;
            picked.push(index);
        }
    }

    if picked.is_empty() {
        return Err(AppError::ContextTooLarge(format!(
            "no single passage fits the remaining budget of {} tokens",
            budget
        )));
    }

    picked.sort_unstable();

    tracing::debug!(
        selected = picked.len(),
        of = passages.len(),
        budget_used = budget - remaining,
        budget,
        "Selected context passages by lexical overlap"
    );

    Ok(picked.into_iter().map(|i| passages[i].clone()).collect())
}

fn overlap(question_words: &HashSet<String>, passage: &Passage) -> usize {
    token::word_set(&passage.text)
        .intersection(question_words)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(index: u32, text: &str) -> Passage {
        Passage {
            index,
            text: text.to_string(),
            start: 0,
            end: text.len(),
            token_count: token::count_tokens(text),
        }
    }

    #[test]
    fn test_full_document_returned_when_it_fits() {
        let passages = vec![
            passage(0, "The Moon orbits the Earth."),
            passage(1, "Tides follow the Moon."),
        ];

        let selected = select_context("What is the moon?", &passages, 512).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].index, 0);
        assert_eq!(selected[1].index, 1);
    }

    #[test]
    fn test_ranks_by_lexical_overlap() {
        let passages = vec![
            passage(0, "Volcanoes erupt molten rock from deep below the crust."),
            passage(1, "The Moon is Earth's only natural satellite."),
            passage(2, "Glaciers carve valleys over thousands of years."),
        ];

        // Budget of 12 minus 4 question tokens leaves room for one
        // 8-token passage only
        let selected = select_context("What is the Moon?", &passages, 12).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].index, 1);
    }

    #[test]
    fn test_tie_breaks_by_ascending_index() {
        let passages = vec![
            passage(0, "alpha beta gamma delta"),
            passage(1, "alpha beta gamma delta"),
        ];

        let selected = select_context("alpha beta", &passages, 6).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].index, 0);
    }

    #[test]
    fn test_budget_invariant_holds() {
        let passages: Vec<Passage> = (0..10)
            .map(|i| passage(i, "some words about the moon and other topics entirely"))
            .collect();
        let question = "Tell me about the moon please";

        for token_limit in [10, 16, 32, 64] {
            if let Ok(selected) = select_context(question, &passages, token_limit) {
                let context_tokens: usize = selected.iter().map(|p| p.token_count).sum();
                assert!(context_tokens + token::count_tokens(question) <= token_limit);
            }
        }
    }

    #[test]
    fn test_selection_is_ordered_by_index() {
        let passages = vec![
            passage(0, "moon moon moon"),
            passage(1, "rock rock rock"),
            passage(2, "moon moon moon"),
        ];

        let selected = select_context("moon", &passages, 7).unwrap();
        let indices: Vec<u32> = selected.iter().map(|p| p.index).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_question_exhausting_budget_is_context_too_large() {
        let passages = vec![passage(0, "short text")];
        let question = "a very long question that uses up every single available token slot";

        let err = select_context(question, &passages, 8).unwrap_err();
        assert!(matches!(err, AppError::ContextTooLarge(_)));
    }

    #[test]
    fn test_no_passage_fitting_is_context_too_large() {
        let big = "word ".repeat(50);
        let passages = vec![passage(0, big.trim_end())];

        let err = select_context("what is this", &passages, 20).unwrap_err();
        assert!(matches!(err, AppError::ContextTooLarge(_)));
    }

    #[test]
    fn test_deterministic_selection() {
        let passages = vec![
            passage(0, "the moon shines at night over the sea"),
            passage(1, "the sun shines during the day"),
            passage(2, "stars are distant suns far away"),
        ];

        let first = select_context("when does the moon shine", &passages, 16).unwrap();
        let second = select_context("when does the moon shine", &passages, 16).unwrap();
        assert_eq!(first, second);
    }
}
