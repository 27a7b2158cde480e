//! Prompt builder for rendering QA templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use askdoc_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a generative QA prompt from a definition, question, and context.
///
/// Renders the user template (and the system template when present) with
/// Handlebars. The context string is the engine's concatenated candidate
/// passages.
pub fn build_qa_prompt(
    definition: &PromptDefinition,
    question: &str,
    context: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("context".to_string(), context.to_string());

    let user = render_template(&definition.template, &variables)?;

    let system = match &definition.system {
        Some(template) => Some(render_template(template, &variables)?),
        None => None,
    };

    Ok(BuiltPrompt {
        system,
        user,
        source_prompt_id: definition.id.clone(),
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is the moon?".to_string());
        vars.insert("context".to_string(), "The Moon is a satellite.".to_string());

        let result =
            render_template("question: {{question}} context: {{context}}", &vars).unwrap();
        assert_eq!(
            result,
            "question: What is the moon? context: The Moon is a satellite."
        );
    }

    #[test]
    fn test_build_default_prompt() {
        let def = PromptDefinition::generative_default();
        let built = build_qa_prompt(&def, "What is the moon?", "The Moon is a satellite.").unwrap();

        assert!(built.user.contains("question: What is the moon?"));
        assert!(built.user.contains("context: The Moon is a satellite."));
        assert!(built.system.is_some());
        assert_eq!(built.source_prompt_id, "qa.generate.default");
    }

    #[test]
    fn test_no_html_escaping() {
        let def = PromptDefinition::generative_default();
        let built = build_qa_prompt(&def, "Is x < y?", "x < y & y > z").unwrap();

        assert!(built.user.contains("x < y & y > z"));
    }
}
