//! EchoType CLI
//!
//! # Commands
//!
//! - `serve`: HTTP API (`/api/health`, `/api/questions/:test_type`, `/api/predict`)
//! - `predict`: one-shot prediction from comma-separated answers
//! - `questions`: list the questions of a test variant
//! - `quiz`: interactive terminal questionnaire
//! - `train`: fit the text classifier from the CSV corpus
//!
//! Exit code 1 on error.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use echotype::cli::{self as commands, PredictArgs, ServeArgs, VariantArgs};
use echotype::Config;

/// EchoType - MBTI personality typing from questionnaire answers and text
#[derive(Parser)]
#[command(name = "echotype")]
#[command(version)]
#[command(about = "MBTI personality typing from questionnaire answers and text")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    ///
    /// Loads the question catalog and classifier artifact before binding;
    /// a missing or corrupt artifact aborts startup.
    Serve(ServeArgs),
    /// Predict a type from answers and optional text
    Predict(PredictArgs),
    /// List the questions of a test variant in presentation order
    Questions(VariantArgs),
    /// Take the questionnaire interactively in the terminal
    Quiz(VariantArgs),
    /// Train the text classifier and write the artifact
    Train,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> echotype::Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    match cli.command {
        Commands::Serve(args) => commands::handle_serve(&config, args).await,
        Commands::Predict(args) => commands::handle_predict(&config, args),
        Commands::Questions(args) => commands::handle_questions(&config, args),
        Commands::Quiz(args) => commands::handle_quiz(&config, args),
        Commands::Train => commands::handle_train(&config),
    }
}
