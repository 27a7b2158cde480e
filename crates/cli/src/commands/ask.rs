//! Ask command handler.
//!
//! Runs one question through the full pipeline: ingest the document,
//! select context, dispatch to the language's model, and optionally
//! evaluate the answer against a reference and/or record human ratings.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use askdoc_core::{config::AppConfig, AppError, AppResult};
use askdoc_model::{create_loader, LanguageProfile, ModelRegistry};
use askdoc_qa::{Answer, EvaluationRecord, HumanRatings, QaEngine};

/// Ask a question against a document
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Path to the document (PDF or UTF-8 text)
    #[arg(short, long)]
    pub document: PathBuf,

    /// Document/question language
    #[arg(short, long, default_value = "english")]
    pub language: LanguageProfile,

    /// Reference answer for automated overlap scoring
    #[arg(long)]
    pub reference: Option<String>,

    /// Human rating: factual correctness (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rate_correctness: Option<u8>,

    /// Human rating: answer fluency (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rate_fluency: Option<u8>,

    /// Human rating: voice output clarity (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rate_voice: Option<u8>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        // 1. Ingest the document
        let bytes = std::fs::read(&self.document)?;
        let document = askdoc_document::ingest(&bytes, &config.chunking)?;

        // 2. Build the registry and engine
        let loader = create_loader(&config.backends)?;
        let registry = Arc::new(ModelRegistry::new(loader));
        let prompt = askdoc_prompt::load_prompt(&config.workspace, "qa.generate.default")?;
        let engine = QaEngine::new(registry, prompt);

        // 3. Run the QA turn
        let answer = engine
            .answer(&self.question, self.language, &document)
            .await?;

        // 4. Optionally evaluate
        let ratings = self.ratings()?;
        let record = if self.reference.is_some() || ratings.is_some() {
            Some(EvaluationRecord::new(
                &answer,
                self.reference.as_deref(),
                ratings,
            ))
        } else {
            None
        };

        // 5. Print
        if self.json {
            self.print_json(&answer, record.as_ref())?;
        } else {
            self.print_text(&answer, record.as_ref());
        }

        Ok(())
    }

    /// Collect the rating flags into a record, requiring all or none.
    fn ratings(&self) -> AppResult<Option<HumanRatings>> {
        match (self.rate_correctness, self.rate_fluency, self.rate_voice) {
            (Some(correctness), Some(fluency), Some(voice_clarity)) => Ok(Some(HumanRatings {
                correctness,
                fluency,
                voice_clarity,
            })),
            (None, None, None) => Ok(None),
            _ => Err(AppError::Config(
                "Provide all of --rate-correctness, --rate-fluency and --rate-voice, or none"
                    .to_string(),
            )),
        }
    }

    fn print_json(&self, answer: &Answer, record: Option<&EvaluationRecord>) -> AppResult<()> {
        let output = serde_json::json!({
            "answer": answer,
            "evaluation": record,
        });

        let json = serde_json::to_string_pretty(&output)?;
        println!("{}", json);
        Ok(())
    }

    fn print_text(&self, answer: &Answer, record: Option<&EvaluationRecord>) {
        println!("{}", answer.text);

        if let Some(confidence) = answer.confidence {
            eprintln!("confidence: {:.2}", confidence);
        }

        if let Some(provenance) = &answer.provenance {
            eprintln!(
                "span: passage {} [{}..{}]",
                provenance.passage_index, provenance.start, provenance.end
            );
        }

        if let Some(record) = record {
            if let Some(report) = &record.automated {
                eprintln!(
                    "rouge-1 F: {:.3}  rouge-2 F: {:.3}  rouge-L F: {:.3}",
                    report.rouge1.fmeasure, report.rouge2.fmeasure, report.rouge_l.fmeasure
                );
            }
            if let Some(ratings) = &record.ratings {
                eprintln!(
                    "ratings: correctness {} fluency {} voice {}",
                    ratings.correctness, ratings.fluency, ratings.voice_clarity
                );
            }
        }
    }
}
