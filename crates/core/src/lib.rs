//! Askdoc Core Library
//!
//! This crate provides the foundational utilities for the askdoc
//! document question-answering pipeline:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, BackendConfig, ChunkingConfig};
pub use error::{AppError, AppResult};
