//! Answer types.

use askdoc_model::LanguageProfile;
use serde::{Deserialize, Serialize};

/// Where an extractive answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanProvenance {
    /// Index of the passage the span was extracted from
    #[serde(rename = "passageIndex")]
    pub passage_index: u32,

    /// Byte offset of the span start within that passage's text
    pub start: usize,

    /// Byte offset one past the span end within that passage's text
    pub end: usize,
}

/// The produced answer for one QA turn.
///
/// Extractive answers carry a confidence and span provenance; generative
/// answers are free text with neither. Transient, scoped to one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text
    pub text: String,

    /// Language the question was answered in
    pub language: LanguageProfile,

    /// Identity of the model that produced the answer
    #[serde(rename = "modelId")]
    pub model_id: String,

    /// Model confidence (extractive answers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Span provenance (extractive answers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<SpanProvenance>,
}

impl Answer {
    /// Whether this answer is a verbatim span of a passage.
    pub fn is_extractive(&self) -> bool {
        self.provenance.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generative_answer_serializes_without_span_fields() {
        let answer = Answer {
            text: "The Moon is a natural satellite.".to_string(),
            language: LanguageProfile::English,
            model_id: "google/flan-t5-base".to_string(),
            confidence: None,
            provenance: None,
        };

        assert!(!answer.is_extractive());

        let json = serde_json::to_string(&answer).unwrap();
        assert!(!json.contains("confidence"));
        assert!(!json.contains("provenance"));
    }

    #[test]
    fn test_extractive_answer_roundtrip() {
        let answer = Answer {
            text: "उपग्रहः".to_string(),
            language: LanguageProfile::Sanskrit,
            model_id: "google/muril-base-cased".to_string(),
            confidence: Some(0.87),
            provenance: Some(SpanProvenance {
                passage_index: 2,
                start: 14,
                end: 35,
            }),
        };

        assert!(answer.is_extractive());

        let json = serde_json::to_string(&answer).unwrap();
        let back: Answer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.provenance, answer.provenance);
    }
}
