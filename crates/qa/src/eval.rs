//! Automated overlap scoring and human-rating packaging.
//!
//! Automated scores are ROUGE-style token overlaps between a produced
//! answer and a reference answer: unigram, bigram, and LCS-based
//! precision/recall/F-measure. Human ratings arrive pre-validated and are
//! stored verbatim; no scoring logic is applied to them.

use askdoc_document::token;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Answer;

/// Precision/recall/F-measure triple for one overlap metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f32,
    pub recall: f32,
    pub fmeasure: f32,
}

impl RougeScore {
    fn from_counts(overlap: usize, candidate_units: usize, reference_units: usize) -> Self {
        if overlap == 0 || candidate_units == 0 || reference_units == 0 {
            return Self {
                precision: 0.0,
                recall: 0.0,
                fmeasure: 0.0,
            };
        }

        let precision = overlap as f32 / candidate_units as f32;
        let recall = overlap as f32 / reference_units as f32;
        let fmeasure = 2.0 * precision * recall / (precision + recall);

        Self {
            precision,
            recall,
            fmeasure,
        }
    }
}

/// Automated overlap scores for one (candidate, reference) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapReport {
    /// Unigram overlap
    pub rouge1: RougeScore,

    /// Bigram overlap
    pub rouge2: RougeScore,

    /// Longest-common-subsequence overlap
    #[serde(rename = "rougeL")]
    pub rouge_l: RougeScore,
}

impl OverlapReport {
    /// Compute all overlap scores over lowercased word tokens.
    pub fn compute(candidate: &str, reference: &str) -> Self {
        let candidate_tokens = token::words(candidate);
        let reference_tokens = token::words(reference);

        Self {
            rouge1: ngram_score(&candidate_tokens, &reference_tokens, 1),
            rouge2: ngram_score(&candidate_tokens, &reference_tokens, 2),
            rouge_l: lcs_score(&candidate_tokens, &reference_tokens),
        }
    }
}

/// The single-number overlap score: ROUGE-L F-measure in [0, 1].
///
/// 1.0 when candidate and reference are token-identical, 0.0 when they
/// share no token.
pub fn overlap_score(candidate: &str, reference: &str) -> f32 {
    let candidate_tokens = token::words(candidate);
    let reference_tokens = token::words(reference);
    lcs_score(&candidate_tokens, &reference_tokens).fmeasure
}

/// Clipped n-gram overlap (each reference n-gram matches at most its
/// occurrence count).
fn ngram_score(candidate: &[String], reference: &[String], n: usize) -> RougeScore {
    let candidate_grams = ngram_counts(candidate, n);
    let reference_grams = ngram_counts(reference, n);

    let overlap: usize = candidate_grams
        .iter()
        .map(|(gram, count)| reference_grams.get(gram).copied().unwrap_or(0).min(*count))
        .sum();

    let candidate_units = candidate.len().saturating_sub(n - 1);
    let reference_units = reference.len().saturating_sub(n - 1);

    RougeScore::from_counts(overlap, candidate_units, reference_units)
}

fn ngram_counts(tokens: &[String], n: usize) -> std::collections::HashMap<&[String], usize> {
    let mut counts = std::collections::HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// LCS-based overlap over token sequences.
fn lcs_score(candidate: &[String], reference: &[String]) -> RougeScore {
    let lcs = lcs_length(candidate, reference);
    RougeScore::from_counts(lcs, candidate.len(), reference.len())
}

/// Longest common subsequence length, two-row DP.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            current[j + 1] = if token_a == token_b {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// User-entered evaluation sliders, bounded 1–5, stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanRatings {
    /// Is the answer factually correct according to the text?
    pub correctness: u8,

    /// Is the answer grammatically correct and easy to understand?
    pub fluency: u8,

    /// How clear and natural was the spoken output?
    #[serde(rename = "voiceClarity")]
    pub voice_clarity: u8,
}

/// Evaluation attached to exactly one answer.
///
/// Created after the answer exists; never mutated afterwards; a new
/// question produces a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Automated overlap scores, present when a reference answer was
    /// supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automated: Option<OverlapReport>,

    /// Human ratings, present when the user entered them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<HumanRatings>,

    /// When the record was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Build a record for an answer.
    ///
    /// Omitting the reference answer is not an error; the automated score
    /// is simply absent.
    pub fn new(answer: &Answer, reference: Option<&str>, ratings: Option<HumanRatings>) -> Self {
        let automated = reference.map(|r| OverlapReport::compute(&answer.text, r));

        if let Some(report) = &automated {
            tracing::debug!(
                rouge_l = report.rouge_l.fmeasure,
                "Computed automated overlap score"
            );
        }

        Self {
            automated,
            ratings,
            created_at: Utc::now(),
        }
    }
}
