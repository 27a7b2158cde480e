//! Production model loader.
//!
//! Binds HTTP-backed providers for a descriptor: the Ollama generation
//! runtime for generative models, the hosted span service for extractive
//! ones. Each load probes the endpoint first so an unreachable backend
//! fails fast as `ModelUnavailable` without caching anything.

use std::sync::Arc;
use std::time::Duration;

use askdoc_core::{AppError, AppResult, BackendConfig};

use crate::backend::ModelHandle;
use crate::descriptor::{LanguageProfile, ModelDescriptor, ModelKind};
use crate::providers::{OllamaGenerator, SpanEndpointModel};
use crate::registry::ModelLoader;

/// Loader that binds HTTP providers from backend configuration.
pub struct HttpModelLoader {
    backends: BackendConfig,
    client: reqwest::Client,
}

impl HttpModelLoader {
    /// Create a loader from backend configuration.
    pub fn new(backends: BackendConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout_secs) = backends.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { backends, client })
    }
}

#[async_trait::async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(
        &self,
        language: LanguageProfile,
        descriptor: &ModelDescriptor,
    ) -> AppResult<ModelHandle> {
        tracing::debug!(
            language = %language,
            model_id = %descriptor.model_id,
            kind = ?descriptor.kind,
            "Binding HTTP provider"
        );

        match descriptor.kind {
            ModelKind::Generative => {
                let generator = OllamaGenerator::new(
                    descriptor.clone(),
                    self.backends.generate_endpoint.clone(),
                    self.backends.generate_model.clone(),
                    self.client.clone(),
                );
                generator.probe().await?;
                Ok(ModelHandle::Generative(Box::new(generator)))
            }
            ModelKind::Extractive => {
                let model = SpanEndpointModel::new(
                    descriptor.clone(),
                    self.backends.span_endpoint.clone(),
                    self.client.clone(),
                );
                model.probe().await?;
                Ok(ModelHandle::Extractive(Box::new(model)))
            }
        }
    }
}

/// Create the production loader for the given backend configuration.
pub fn create_loader(backends: &BackendConfig) -> AppResult<Arc<dyn ModelLoader>> {
    Ok(Arc::new(HttpModelLoader::new(backends.clone())?))
}
