//! Askdoc Model Library
//!
//! Model registry for the question-answering pipeline: the fixed
//! language → model mapping, the extractive/generative capability traits,
//! the cached registry with per-language exclusive loading, and the
//! HTTP-backed providers.

pub mod backend;
pub mod descriptor;
pub mod factory;
pub mod providers;
pub mod registry;

pub use backend::{GenerateRequest, GenerativeModel, ModelHandle, SpanCandidate, SpanModel};
pub use descriptor::{resolve, LanguageProfile, ModelDescriptor, ModelKind};
pub use factory::{create_loader, HttpModelLoader};
pub use registry::{ModelLoader, ModelRegistry};
