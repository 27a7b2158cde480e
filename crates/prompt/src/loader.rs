//! Prompt loader for YAML prompt definitions.
//!
//! A workspace may override the built-in prompt by placing
//! `.askdoc/prompts/<id>.yml`; otherwise the built-in default is used.

use crate::types::PromptDefinition;
use askdoc_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID, falling back to the built-in default.
///
/// # Arguments
/// * `workspace_path` - Root workspace directory containing `.askdoc/`
/// * `prompt_id` - Prompt identifier (e.g., "qa.generate.default")
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompts_dir = workspace_path.join(".askdoc/prompts");
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        tracing::debug!(prompt_id, "No workspace override, using built-in prompt");
        return builtin(prompt_id);
    }

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List all prompt IDs overridden in the workspace.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = workspace_path.join(".askdoc/prompts");

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    Ok(prompt_ids)
}

/// Resolve a built-in prompt by ID.
fn builtin(prompt_id: &str) -> AppResult<PromptDefinition> {
    match prompt_id {
        "qa.generate.default" => Ok(PromptDefinition::generative_default()),
        _ => Err(AppError::Prompt(format!(
            "Unknown prompt ID: {} (no built-in and no workspace override)",
            prompt_id
        ))),
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.template.contains("{{question}}") || !def.template.contains("{{context}}") {
        return Err(AppError::Prompt(format!(
            "Prompt template '{}' must reference {{{{question}}}} and {{{{context}}}}",
            def.id
        )));
    }

    Ok(())
}
