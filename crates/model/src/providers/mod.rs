//! HTTP-backed model providers.

pub mod ollama;
pub mod span;

pub use ollama::OllamaGenerator;
pub use span::SpanEndpointModel;
