//! Passages command handler.
//!
//! Ingests a document and lists its passage sequence, the inspection
//! view of what the context selector will rank.

use clap::Args;
use std::path::PathBuf;

use askdoc_core::{config::AppConfig, AppResult};

/// Inspect a document's extracted passages
#[derive(Args, Debug)]
pub struct PassagesCommand {
    /// Path to the document (PDF or UTF-8 text)
    #[arg(short, long)]
    pub document: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Preview length for the text column, in chars.
const PREVIEW_CHARS: usize = 60;

impl PassagesCommand {
    /// Execute the passages command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing passages command");

        let bytes = std::fs::read(&self.document)?;
        let document = askdoc_document::ingest(&bytes, &config.chunking)?;

        if self.json {
            let json = serde_json::to_string_pretty(&document)?;
            println!("{}", json);
            return Ok(());
        }

        println!(
            "document {}: {} passages, {} tokens",
            document.id,
            document.passages.len(),
            document.total_tokens()
        );

        for passage in &document.passages {
            println!(
                "[{:>3}] {:>4} tokens  {:>6}..{:<6}  {}",
                passage.index,
                passage.token_count,
                passage.start,
                passage.end,
                preview(&passage.text)
            );
        }

        Ok(())
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "च".repeat(100);
        let p = preview(&text);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
    }
}
