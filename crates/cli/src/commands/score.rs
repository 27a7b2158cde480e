//! Score command handler.
//!
//! Computes the automated overlap scores between a candidate answer and a
//! reference answer, without running a model.

use clap::Args;

use askdoc_core::AppResult;
use askdoc_qa::OverlapReport;

/// Score a candidate answer against a reference answer
#[derive(Args, Debug)]
pub struct ScoreCommand {
    /// The produced (candidate) answer
    pub candidate: String,

    /// The reference ("gold standard") answer
    #[arg(short, long)]
    pub reference: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScoreCommand {
    /// Execute the score command.
    pub async fn execute(&self) -> AppResult<()> {
        tracing::info!("Executing score command");

        let report = OverlapReport::compute(&self.candidate, &self.reference);

        if self.json {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
            return Ok(());
        }

        println!("metric    precision  recall  f-measure");
        for (name, score) in [
            ("rouge-1", report.rouge1),
            ("rouge-2", report.rouge2),
            ("rouge-L", report.rouge_l),
        ] {
            println!(
                "{:<9} {:>9.3} {:>7.3} {:>10.3}",
                name, score.precision, score.recall, score.fmeasure
            );
        }

        Ok(())
    }
}
