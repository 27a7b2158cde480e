//! Error types for the askdoc pipeline.
//!
//! This module defines a unified error enum covering configuration, I/O and
//! serialization failures plus the question-answering error taxonomy:
//! unreadable documents, unavailable models, oversized contexts, missing
//! answer spans, and empty generations.

use thiserror::Error;

/// Unified error type for the askdoc pipeline.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document yielded no extractable text (corrupt bytes, or an
    /// image-only scan with no text layer).
    #[error("No extractable text in document: {0}")]
    UnreadableDocument(String),

    /// A model backend could not be loaded or reached. This is the only
    /// error class expected to be transient; callers may retry `acquire`
    /// without side effects.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// No context fits the model's token budget, not even a single
    /// minimal unit (e.g. the question alone exceeds the limit).
    #[error("Context too large: {0}")]
    ContextTooLarge(String),

    /// Every candidate passage yielded an empty or below-threshold span.
    #[error("No answer span found: {0}")]
    NoSpanFound(String),

    /// The generative model returned empty output after trimming.
    #[error("Generation produced no output: {0}")]
    GenerationEmpty(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Whether retrying the failed operation could succeed without any
    /// change to the inputs. Deterministic failures (unreadable document,
    /// oversized context, missing span, empty generation) recur on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::ModelUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(AppError::ModelUnavailable("down".into()).is_transient());
        assert!(!AppError::UnreadableDocument("empty".into()).is_transient());
        assert!(!AppError::NoSpanFound("nothing".into()).is_transient());
        assert!(!AppError::ContextTooLarge("question".into()).is_transient());
        assert!(!AppError::GenerationEmpty("blank".into()).is_transient());
    }

    #[test]
    fn test_display_carries_cause() {
        let err = AppError::UnreadableDocument("no text layer".into());
        assert!(err.to_string().contains("no text layer"));
    }
}
