//! Hosted span-prediction provider.
//!
//! Speaks the hosted question-answering inference wire format: a POST to
//! `{base}/models/{model_id}` with `{"inputs": {"question", "context"}}`
//! returns ranked answers with char offsets into the submitted context.

use askdoc_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::backend::{SpanCandidate, SpanModel};
use crate::descriptor::ModelDescriptor;

/// How many ranked spans to request per passage.
const SPANS_PER_PASSAGE: u32 = 3;

/// Span API request format.
#[derive(Debug, Serialize)]
struct SpanRequest<'a> {
    inputs: SpanInputs<'a>,
    parameters: SpanParameters,
}

#[derive(Debug, Serialize)]
struct SpanInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct SpanParameters {
    top_k: u32,
}

/// One ranked answer from the span API.
#[derive(Debug, Deserialize)]
struct SpanAnswer {
    #[allow(dead_code)]
    answer: String,
    score: f32,
    start: usize,
    end: usize,
}

/// Extractive model served through a hosted span-prediction endpoint.
pub struct SpanEndpointModel {
    descriptor: ModelDescriptor,

    /// Base URL of the span service
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl SpanEndpointModel {
    /// Create a span model for `descriptor` served at `base_url`.
    pub fn new(
        descriptor: ModelDescriptor,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            descriptor,
            base_url: base_url.into(),
            client,
        }
    }

    /// Check that the span service is reachable.
    ///
    /// Used at load time; a failure here is `ModelUnavailable` and leaves
    /// no state behind.
    pub async fn probe(&self) -> AppResult<()> {
        let response = self.client.get(&self.base_url).send().await.map_err(|e| {
            AppError::ModelUnavailable(format!(
                "Span service unreachable at {}: {}",
                self.base_url, e
            ))
        })?;

        // Any HTTP answer proves the service is up; some deployments 404
        // on the bare base path.
        tracing::debug!(status = %response.status(), "Span service probe answered");
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.descriptor.model_id)
    }
}

#[async_trait::async_trait]
impl SpanModel for SpanEndpointModel {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn rank_spans(&self, question: &str, passage: &str) -> AppResult<Vec<SpanCandidate>> {
        let request = SpanRequest {
            inputs: SpanInputs {
                question,
                context: passage,
            },
            parameters: SpanParameters {
                top_k: SPANS_PER_PASSAGE,
            },
        };

        tracing::debug!(
            model = %self.descriptor.model_id,
            passage_chars = passage.len(),
            "Requesting span predictions"
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::ModelUnavailable(format!("Failed to send span request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ModelUnavailable(format!(
                "Span API error ({}): {}",
                status, error_text
            )));
        }

        let answers: Vec<SpanAnswer> = response.json().await.map_err(|e| {
            AppError::ModelUnavailable(format!("Failed to parse span response: {}", e))
        })?;

        Ok(answers
            .into_iter()
            .map(|a| SpanCandidate {
                start: a.start,
                end: a.end,
                score: a.score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{resolve, LanguageProfile};

    #[test]
    fn test_endpoint_includes_model_id() {
        let model = SpanEndpointModel::new(
            resolve(LanguageProfile::Sanskrit),
            "http://localhost:8091",
            reqwest::Client::new(),
        );

        assert_eq!(
            model.endpoint(),
            "http://localhost:8091/models/google/muril-base-cased"
        );
    }

    #[test]
    fn test_span_answer_deserialization() {
        let json = r#"[{"answer": "उपग्रहः", "score": 0.87, "start": 14, "end": 21}]"#;
        let answers: Vec<SpanAnswer> = serde_json::from_str(json).unwrap();

        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].start, 14);
        assert_eq!(answers[0].end, 21);
        assert!((answers[0].score - 0.87).abs() < f32::EPSILON);
    }
}
