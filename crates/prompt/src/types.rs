//! Prompt types for the generative answer path.

use serde::{Deserialize, Serialize};

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// User-message template with Handlebars syntax; receives `question`
    /// and `context` variables
    pub template: String,

    /// Optional system-message template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl PromptDefinition {
    /// The built-in generative QA prompt.
    ///
    /// The user template matches the input format the generative model was
    /// trained on: `question: … context: …`.
    pub fn generative_default() -> Self {
        Self {
            id: "qa.generate.default".to_string(),
            title: "Document QA generation".to_string(),
            api_version: "1.0".to_string(),
            template: "question: {{question}} context: {{context}}".to_string(),
            system: Some(
                "Answer the question using only the provided context. \
                 Reply with the answer alone, without commentary. \
                 If the context does not contain the answer, say you could not \
                 find it in the document."
                    .to_string(),
            ),
        }
    }
}

/// A fully built prompt ready for the generative backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,
}
