//! Language profiles and the static model mapping.
//!
//! Every supported language maps to exactly one model descriptor. The
//! mapping is total and fixed at compile time; only backend endpoints are
//! configurable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported document/question language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageProfile {
    English,
    Sanskrit,
    Japanese,
}

impl LanguageProfile {
    /// All supported languages, in display order.
    pub fn all() -> [LanguageProfile; 3] {
        [Self::English, Self::Sanskrit, Self::Japanese]
    }

    /// Parse a language from its name or ISO 639 code.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Some(Self::English),
            "sanskrit" | "sa" => Some(Self::Sanskrit),
            "japanese" | "ja" => Some(Self::Japanese),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Sanskrit => "sanskrit",
            Self::Japanese => "japanese",
        }
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Unknown language: {}. Supported: {}",
                s,
                Self::all().map(|l| l.as_str()).join(", ")
            )
        })
    }
}

/// How a model produces answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Answers are verbatim contiguous spans of the context, scored by
    /// confidence
    Extractive,

    /// Answers are free-form synthesized text conditioned on the context
    Generative,
}

/// Process-wide, immutable model configuration for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identity (e.g., "google/flan-t5-base")
    #[serde(rename = "modelId")]
    pub model_id: String,

    /// Extractive or generative
    pub kind: ModelKind,

    /// Maximum input length in token units
    #[serde(rename = "tokenLimit")]
    pub token_limit: usize,
}

/// Resolve a language to its model descriptor.
///
/// Total function over the language enum; there is no failure path.
pub fn resolve(language: LanguageProfile) -> ModelDescriptor {
    match language {
        LanguageProfile::English => ModelDescriptor {
            model_id: "google/flan-t5-base".to_string(),
            kind: ModelKind::Generative,
            token_limit: 1024,
        },
        LanguageProfile::Sanskrit => ModelDescriptor {
            model_id: "google/muril-base-cased".to_string(),
            kind: ModelKind::Extractive,
            token_limit: 512,
        },
        LanguageProfile::Japanese => ModelDescriptor {
            model_id: "cl-tohoku/bert-base-japanese-whole-word-masking".to_string(),
            kind: ModelKind::Extractive,
            token_limit: 512,
        },
    }
}
