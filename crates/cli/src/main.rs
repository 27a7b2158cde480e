//! askdoc CLI
//!
//! Main entry point for the askdoc command-line tool: document
//! question-answering with per-language extractive and generative model
//! backends.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, PassagesCommand, ScoreCommand};
use askdoc_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// askdoc CLI - document question answering with per-language models
#[derive(Parser, Debug)]
#[command(name = "askdoc")]
#[command(about = "Ask questions against a document, by language", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "ASKDOC_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "ASKDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Generation runtime base URL
    #[arg(long, global = true, env = "ASKDOC_GENERATE_ENDPOINT")]
    generate_endpoint: Option<String>,

    /// Span service base URL
    #[arg(long, global = true, env = "ASKDOC_SPAN_ENDPOINT")]
    span_endpoint: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question against a document
    Ask(AskCommand),

    /// Inspect a document's extracted passages
    Passages(PassagesCommand),

    /// Score a candidate answer against a reference answer
    Score(ScoreCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.generate_endpoint,
        cli.span_endpoint,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    tracing::info!("askdoc CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Generate endpoint: {}", config.backends.generate_endpoint);
    tracing::debug!("Span endpoint: {}", config.backends.span_endpoint);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Passages(_) => "passages",
        Commands::Score(_) => "score",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Passages(cmd) => cmd.execute(&config).await,
        Commands::Score(cmd) => cmd.execute().await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
