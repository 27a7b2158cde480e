//! Configuration management for the askdoc pipeline.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.askdoc/config.yaml)
//!
//! Precedence is env < YAML < CLI flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global options that affect pipeline behavior:
/// chunking geometry, model backend endpoints, and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .askdoc/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Passage chunking geometry
    pub chunking: ChunkingConfig,

    /// Model backend endpoints
    pub backends: BackendConfig,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Geometry of document chunking.
///
/// `max_passage_tokens` is the passage window `C`, a chunking constant
/// independent of any single model's input limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum tokens per passage
    #[serde(rename = "maxPassageTokens")]
    pub max_passage_tokens: usize,

    /// How many tokens to look back for a sentence boundary before
    /// splitting at the hard token limit
    #[serde(rename = "boundaryTolerance")]
    pub boundary_tolerance: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_passage_tokens: 160,
            boundary_tolerance: 24,
        }
    }
}

/// Endpoints for the HTTP model backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the generation runtime (Ollama wire format)
    #[serde(rename = "generateEndpoint")]
    pub generate_endpoint: String,

    /// Base URL of the hosted span-prediction service
    #[serde(rename = "spanEndpoint")]
    pub span_endpoint: String,

    /// Override the served generation model name (defaults to the
    /// language's descriptor model id)
    #[serde(rename = "generateModel", skip_serializing_if = "Option::is_none")]
    pub generate_model: Option<String>,

    /// Request timeout in seconds
    #[serde(rename = "timeoutSecs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            // Local-first default
            generate_endpoint: "http://localhost:11434".to_string(),
            span_endpoint: "http://localhost:8091".to_string(),
            generate_model: None,
            timeout_secs: Some(120),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    chunking: Option<ChunkingConfig>,
    backends: Option<BackendConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            chunking: ChunkingConfig::default(),
            backends: BackendConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `ASKDOC_WORKSPACE`: Override workspace path
    /// - `ASKDOC_CONFIG`: Path to config file
    /// - `ASKDOC_GENERATE_ENDPOINT`: Generation runtime base URL
    /// - `ASKDOC_SPAN_ENDPOINT`: Span service base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("ASKDOC_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("ASKDOC_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Validate workspace exists
        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.workspace.join(".askdoc/config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(endpoint) = std::env::var("ASKDOC_GENERATE_ENDPOINT") {
            config.backends.generate_endpoint = endpoint;
        }

        if let Ok(endpoint) = std::env::var("ASKDOC_SPAN_ENDPOINT") {
            config.backends.span_endpoint = endpoint;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(chunking) = config_file.chunking {
            result.chunking = chunking;
        }

        if let Some(backends) = config_file.backends {
            result.backends = backends;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over both environment variables
    /// and the YAML config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        generate_endpoint: Option<String>,
        span_endpoint: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(endpoint) = generate_endpoint {
            self.backends.generate_endpoint = endpoint;
        }

        if let Some(endpoint) = span_endpoint {
            self.backends.span_endpoint = endpoint;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .askdoc directory.
    pub fn askdoc_dir(&self) -> PathBuf {
        self.workspace.join(".askdoc")
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunking.max_passage_tokens == 0 {
            return Err(AppError::Config(
                "chunking.maxPassageTokens must be at least 1".to_string(),
            ));
        }

        if self.chunking.boundary_tolerance >= self.chunking.max_passage_tokens {
            return Err(AppError::Config(format!(
                "chunking.boundaryTolerance ({}) must be smaller than maxPassageTokens ({})",
                self.chunking.boundary_tolerance, self.chunking.max_passage_tokens
            )));
        }

        if self.backends.generate_endpoint.is_empty() || self.backends.span_endpoint.is_empty() {
            return Err(AppError::Config(
                "backend endpoints cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
