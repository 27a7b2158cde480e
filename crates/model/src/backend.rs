//! Model capability traits and the loaded-model handle.
//!
//! The pipeline treats model backends as opaque capability interfaces:
//! an extractive backend ranks contiguous spans of a passage, a generative
//! backend synthesizes free text from a prompt. The tagged `ModelHandle`
//! union is what the registry caches and the answer engine dispatches on.

use askdoc_core::AppResult;
use serde::{Deserialize, Serialize};

use crate::descriptor::{ModelDescriptor, ModelKind};

/// A candidate answer span within one passage.
///
/// `start`/`end` are byte offsets into the passage text that was submitted
/// to the model; the engine validates them before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanCandidate {
    /// Byte offset of the first char of the span
    pub start: usize,

    /// Byte offset one past the last char of the span
    pub end: usize,

    /// Model confidence in [0, 1]
    pub score: f32,
}

/// Generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The fully rendered prompt text
    pub prompt: String,

    /// System prompt (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerateRequest {
    /// Create a new request with required fields.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// An extractive question-answering backend.
///
/// Scores contiguous spans of a single passage against a question. The
/// returned candidates need not be sorted; the engine compares across
/// passages.
#[async_trait::async_trait]
pub trait SpanModel: Send + Sync {
    /// The descriptor this backend was loaded for.
    fn descriptor(&self) -> &ModelDescriptor;

    /// Rank candidate spans of `passage` answering `question`.
    async fn rank_spans(&self, question: &str, passage: &str) -> AppResult<Vec<SpanCandidate>>;
}

/// A generative question-answering backend.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// The descriptor this backend was loaded for.
    fn descriptor(&self) -> &ModelDescriptor;

    /// Generate free text for the rendered prompt.
    async fn generate(&self, request: &GenerateRequest) -> AppResult<String>;
}

/// A loaded, invocable model: one of the two capability variants.
///
/// Created by a `ModelLoader`, cached per language by the registry for the
/// process lifetime.
pub enum ModelHandle {
    Extractive(Box<dyn SpanModel>),
    Generative(Box<dyn GenerativeModel>),
}

impl ModelHandle {
    /// The descriptor of the underlying backend.
    pub fn descriptor(&self) -> &ModelDescriptor {
        match self {
            Self::Extractive(model) => model.descriptor(),
            Self::Generative(model) => model.descriptor(),
        }
    }

    /// The model kind of the underlying backend.
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Extractive(_) => ModelKind::Extractive,
            Self::Generative(_) => ModelKind::Generative,
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("kind", &self.kind())
            .field("model_id", &self.descriptor().model_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{resolve, LanguageProfile};

    struct FakeSpanModel {
        descriptor: ModelDescriptor,
    }

    #[async_trait::async_trait]
    impl SpanModel for FakeSpanModel {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }

        async fn rank_spans(&self, _q: &str, _p: &str) -> AppResult<Vec<SpanCandidate>> {
            Ok(vec![SpanCandidate {
                start: 0,
                end: 4,
                score: 0.9,
            }])
        }
    }

    #[test]
    fn test_generate_request_builder() {
        let request = GenerateRequest::new("question: q context: c")
            .with_system("answer briefly")
            .with_max_tokens(200)
            .with_temperature(0.3);

        assert_eq!(request.prompt, "question: q context: c");
        assert_eq!(request.system.as_deref(), Some("answer briefly"));
        assert_eq!(request.max_tokens, Some(200));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_handle_dispatch() {
        let handle = ModelHandle::Extractive(Box::new(FakeSpanModel {
            descriptor: resolve(LanguageProfile::Sanskrit),
        }));

        assert_eq!(handle.kind(), ModelKind::Extractive);
        assert_eq!(handle.descriptor().model_id, "google/muril-base-cased");
    }
}
