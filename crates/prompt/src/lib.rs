//! Askdoc Prompt Library
//!
//! Handlebars templating for the generative answer path: YAML-loadable
//! prompt definitions with a built-in default, and a builder that renders
//! (question, context) into system/user messages.

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::build_qa_prompt;
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, PromptDefinition};
