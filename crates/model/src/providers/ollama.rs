//! Ollama-backed generative provider.
//!
//! Speaks the Ollama generation API (non-streaming):
//! https://github.com/ollama/ollama/blob/main/docs/api.md

use askdoc_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::backend::{GenerateRequest, GenerativeModel};
use crate::descriptor::ModelDescriptor;

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    stream: bool,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Generative model served through an Ollama runtime.
pub struct OllamaGenerator {
    descriptor: ModelDescriptor,

    /// Base URL for the Ollama API
    base_url: String,

    /// Name of the served model (may differ from the descriptor identity
    /// when the runtime registers it under a local alias)
    served_model: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a generator for `descriptor` served at `base_url`.
    pub fn new(
        descriptor: ModelDescriptor,
        base_url: impl Into<String>,
        served_model: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        let served_model = served_model.unwrap_or_else(|| descriptor.model_id.clone());
        Self {
            descriptor,
            base_url: base_url.into(),
            served_model,
            client,
        }
    }

    /// Check that the runtime is reachable.
    ///
    /// Used at load time; a failure here is `ModelUnavailable` and leaves
    /// no state behind.
    pub async fn probe(&self) -> AppResult<()> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ModelUnavailable(format!(
                "Generation runtime unreachable at {}: {}",
                self.base_url, e
            ))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ModelUnavailable(format!(
                "Generation runtime at {} returned {}",
                self.base_url,
                response.status()
            )));
        }

        Ok(())
    }

    fn to_ollama_request(&self, request: &GenerateRequest) -> OllamaRequest {
        OllamaRequest {
            model: self.served_model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            temperature: request.temperature,
            num_predict: request.max_tokens,
            stream: false,
        }
    }
}

#[async_trait::async_trait]
impl GenerativeModel for OllamaGenerator {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn generate(&self, request: &GenerateRequest) -> AppResult<String> {
        tracing::info!(model = %self.served_model, "Sending generation request");
        tracing::debug!("Request: {:?}", request);

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                AppError::ModelUnavailable(format!("Failed to send generation request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ModelUnavailable(format!(
                "Generation API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            AppError::ModelUnavailable(format!("Failed to parse generation response: {}", e))
        })?;

        tracing::info!(
            chars = ollama_response.response.len(),
            "Received generation response"
        );

        Ok(ollama_response.response)
    }
}
