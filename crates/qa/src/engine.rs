//! The answer engine: per-turn orchestration and model dispatch.
//!
//! A turn moves through `Idle → ContextSelected → ModelInvoked →
//! AnswerProduced | Failed`. Extractive models score spans per candidate
//! passage and the engine picks the global best; generative models get one
//! call with the concatenated candidate context.

use std::sync::Arc;

use askdoc_core::{AppError, AppResult};
use askdoc_document::{DocumentIndex, Passage};
use askdoc_model::{
    GenerateRequest, GenerativeModel, LanguageProfile, ModelHandle, ModelRegistry, SpanCandidate,
    SpanModel,
};
use askdoc_prompt::{build_qa_prompt, PromptDefinition};

use crate::select::select_context;
use crate::types::{Answer, SpanProvenance};

/// Minimum confidence for an extracted span to count as an answer.
pub const MIN_SPAN_CONFIDENCE: f32 = 0.10;

/// Output cap for generative answers, in model tokens.
pub const MAX_ANSWER_TOKENS: u32 = 200;

/// Sampling temperature for generative answers. Low, for factual replies.
const GENERATION_TEMPERATURE: f32 = 0.3;

/// Separator between concatenated candidate passages.
const PASSAGE_SEPARATOR: &str = "\n\n";

/// Progression of a single QA turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    ContextSelected,
    ModelInvoked,
    AnswerProduced,
    Failed,
}

/// Orchestrates one question against one ingested document.
///
/// Holds the registry by reference so concurrent sessions share the
/// process-wide model cache.
pub struct QaEngine {
    registry: Arc<ModelRegistry>,
    prompt: PromptDefinition,
}

impl QaEngine {
    /// Create an engine with an explicit generative prompt definition.
    pub fn new(registry: Arc<ModelRegistry>, prompt: PromptDefinition) -> Self {
        Self { registry, prompt }
    }

    /// Create an engine with the built-in generative prompt.
    pub fn with_default_prompt(registry: Arc<ModelRegistry>) -> Self {
        Self::new(registry, PromptDefinition::generative_default())
    }

    /// Answer a question against an ingested document.
    ///
    /// Deterministic for a fixed (question, document, model): repeated
    /// invocations select the same context and, for extractive models,
    /// the same winning span.
    pub async fn answer(
        &self,
        question: &str,
        language: LanguageProfile,
        document: &DocumentIndex,
    ) -> AppResult<Answer> {
        let mut phase = TurnPhase::Idle;
        let result = self.run_turn(question, language, document, &mut phase).await;

        match &result {
            Ok(answer) => {
                tracing::info!(
                    language = %language,
                    extractive = answer.is_extractive(),
                    chars = answer.text.len(),
                    "QA turn produced an answer"
                );
            }
            Err(error) => {
                let terminal = TurnPhase::Failed;
                tracing::warn!(
                    language = %language,
                    reached = ?phase,
                    ?terminal,
                    %error,
                    "QA turn failed"
                );
            }
        }

        result
    }

    async fn run_turn(
        &self,
        question: &str,
        language: LanguageProfile,
        document: &DocumentIndex,
        phase: &mut TurnPhase,
    ) -> AppResult<Answer> {
        let descriptor = self.registry.resolve(language);

        let candidates = select_context(question, &document.passages, descriptor.token_limit)?;
        *phase = TurnPhase::ContextSelected;
        tracing::debug!(
            candidates = candidates.len(),
            token_limit = descriptor.token_limit,
            "Context selected"
        );

        let model = self.registry.acquire(language).await?;
        *phase = TurnPhase::ModelInvoked;

        let answer = match model.as_ref() {
            ModelHandle::Extractive(span_model) => {
                self.answer_extractive(question, language, &candidates, span_model.as_ref())
                    .await?
            }
            ModelHandle::Generative(generator) => {
                self.answer_generative(question, language, &candidates, generator.as_ref())
                    .await?
            }
        };

        *phase = TurnPhase::AnswerProduced;
        Ok(answer)
    }

    /// Extractive path: score every candidate passage, keep the globally
    /// best span. Ties break toward the lower passage index, then the
    /// lower start offset. A passage whose scoring call fails is excluded
    /// rather than failing the turn; only when every passage fails or
    /// yields nothing does the turn end in `NoSpanFound`.
    async fn answer_extractive(
        &self,
        question: &str,
        language: LanguageProfile,
        candidates: &[Passage],
        model: &dyn SpanModel,
    ) -> AppResult<Answer> {
        let mut best: Option<(SpanCandidate, &Passage)> = None;
        let mut scored_passages = 0usize;

        for passage in candidates {
            let spans = match model.rank_spans(question, &passage.text).await {
                Ok(spans) => spans,
                Err(error) => {
                    tracing::warn!(
                        passage = passage.index,
                        %error,
                        "Passage scoring failed, excluding it from span comparison"
                    );
                    continue;
                }
            };
            scored_passages += 1;

            for span in spans {
                if !valid_span(&span, &passage.text) {
                    tracing::debug!(
                        passage = passage.index,
                        start = span.start,
                        end = span.end,
                        "Discarding malformed span"
                    );
                    continue;
                }

                if span.score < MIN_SPAN_CONFIDENCE {
                    continue;
                }

                if is_better(&span, passage, &best) {
                    best = Some((span, passage));
                }
            }
        }

        if scored_passages == 0 {
            return Err(AppError::NoSpanFound(
                "every candidate passage failed scoring".to_string(),
            ));
        }

        let (span, passage) = best.ok_or_else(|| {
            AppError::NoSpanFound(format!(
                "no span reached the {} confidence floor in {} passages",
                MIN_SPAN_CONFIDENCE, scored_passages
            ))
        })?;

        Ok(Answer {
            text: passage.text[span.start..span.end].to_string(),
            language,
            model_id: model.descriptor().model_id.clone(),
            confidence: Some(span.score),
            provenance: Some(SpanProvenance {
                passage_index: passage.index,
                start: span.start,
                end: span.end,
            }),
        })
    }

    /// Generative path: one model call over the concatenated candidate
    /// passages, output capped at `MAX_ANSWER_TOKENS`.
    async fn answer_generative(
        &self,
        question: &str,
        language: LanguageProfile,
        candidates: &[Passage],
        model: &dyn GenerativeModel,
    ) -> AppResult<Answer> {
        let context = candidates
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR);

        let built = build_qa_prompt(&self.prompt, question, &context)?;

        let mut request = GenerateRequest::new(built.user)
            .with_max_tokens(MAX_ANSWER_TOKENS)
            .with_temperature(GENERATION_TEMPERATURE);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        let text = model.generate(&request).await?;
        let text = text.trim();

        if text.is_empty() {
            return Err(AppError::GenerationEmpty(
                "model returned only whitespace".to_string(),
            ));
        }

        Ok(Answer {
            text: text.to_string(),
            language,
            model_id: model.descriptor().model_id.clone(),
            confidence: None,
            provenance: None,
        })
    }
}

/// A span is usable when it is non-inverted, in bounds, on char
/// boundaries, and non-empty after trimming.
fn valid_span(span: &SpanCandidate, passage_text: &str) -> bool {
    span.start < span.end
        && span.end <= passage_text.len()
        && passage_text.is_char_boundary(span.start)
        && passage_text.is_char_boundary(span.end)
        && !passage_text[span.start..span.end].trim().is_empty()
}

/// Global winner ordering: higher score, then lower passage index, then
/// lower start offset.
fn is_better(span: &SpanCandidate, passage: &Passage, best: &Option<(SpanCandidate, &Passage)>) -> bool {
    let Some((best_span, best_passage)) = best else {
        return true;
    };

    if span.score > best_span.score {
        return true;
    }
    if span.score < best_span.score {
        return false;
    }

    (passage.index, span.start) < (best_passage.index, best_span.start)
}
