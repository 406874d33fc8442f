//! Command handlers for the `echotype` binary.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::catalog::{Polarity, QuestionCatalog, TestVariant};
use crate::config::Config;
use crate::descriptions::describe;
use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::predictor::{text_is_usable, Prediction, Predictor};
use crate::scorer::{MAX_RESPONSE, MIN_RESPONSE};
use crate::server::{self, AppState, PredictResponse};
use crate::text::{ArtifactClassifier, ClassifierArtifact};
use crate::training;

const BAR_WIDTH: usize = 30;
const RULE: &str = "==================================================";

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, overrides `server.bind`
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Comma-separated answers in question order, each 1-5
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub answers: Vec<i64>,

    /// Test variant: short or full
    #[arg(long, default_value = "short")]
    pub variant: String,

    /// Optional free text (used when at least 50 characters)
    #[arg(long)]
    pub text: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct VariantArgs {
    /// Test variant: short or full
    #[arg(long, default_value = "short")]
    pub variant: String,
}

/// Catalog from `catalog.path`, or the built-in one.
pub fn load_catalog(config: &Config) -> Result<QuestionCatalog> {
    match &config.catalog.path {
        Some(path) => QuestionCatalog::load(path),
        None => QuestionCatalog::builtin(),
    }
}

/// Catalog plus classifier artifact, both loaded eagerly.
pub fn load_predictor(config: &Config) -> Result<Predictor> {
    let catalog = load_catalog(config)?;
    let artifact = ClassifierArtifact::load(&config.model.artifact_path)?;
    Predictor::new(
        Arc::new(catalog),
        Arc::new(ArtifactClassifier::new(artifact)),
        config.fusion.settings(),
    )
}

pub async fn handle_serve(config: &Config, args: ServeArgs) -> Result<()> {
    let predictor = load_predictor(config)?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    server::serve(AppState::new(predictor), &bind).await
}

pub fn handle_predict(config: &Config, args: PredictArgs) -> Result<()> {
    let predictor = load_predictor(config)?;
    let prediction = predictor.predict_lenient(&args.answers, &args.variant, args.text.as_deref())?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&PredictResponse::from(&prediction))?
        );
    } else {
        print!("{}", render_prediction(&prediction));
    }
    Ok(())
}

pub fn handle_questions(config: &Config, args: VariantArgs) -> Result<()> {
    let catalog = load_catalog(config)?;
    let variant: TestVariant = args.variant.parse()?;
    let set = catalog.set(variant);
    println!("{} questions for the {} test:\n", set.len(), variant);
    for (i, question) in set.questions().iter().enumerate() {
        let marker = if question.polarity == Polarity::Reverse { " (R)" } else { "" };
        println!(
            "{:>3}. [{}] {}{}",
            i + 1,
            question.dimension,
            question.text,
            marker
        );
    }
    Ok(())
}

pub fn handle_quiz(config: &Config, args: VariantArgs) -> Result<()> {
    let predictor = load_predictor(config)?;
    let variant: TestVariant = args.variant.parse()?;
    let stdin = io::stdin();
    let prediction = run_quiz(&predictor, variant, stdin.lock(), io::stdout())?;
    info!(personality_type = %prediction.personality_type, "quiz complete");
    Ok(())
}

pub fn handle_train(config: &Config) -> Result<()> {
    training::run(&config.training, &config.model.artifact_path)?;
    Ok(())
}

/// Interactive questionnaire over arbitrary input/output streams.
///
/// Each answer is re-prompted until it parses as an integer in 1..=5.
pub fn run_quiz<R: BufRead, W: Write>(
    predictor: &Predictor,
    variant: TestVariant,
    mut input: R,
    mut output: W,
) -> Result<Prediction> {
    let set = predictor.catalog().set(variant);

    writeln!(output, "{}", RULE)?;
    writeln!(output, "  ECHOTYPE - MBTI Personality Test ({})", variant)?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "\nAnswer each question on a scale of 1-5")?;
    writeln!(output, "1 = Strongly Disagree")?;
    writeln!(output, "2 = Disagree")?;
    writeln!(output, "3 = Neutral")?;
    writeln!(output, "4 = Agree")?;
    writeln!(output, "5 = Strongly Agree")?;

    let mut answers = Vec::with_capacity(set.len());
    for (i, question) in set.questions().iter().enumerate() {
        writeln!(output, "\n{}. {}", i + 1, question.text)?;
        loop {
            write!(output, "Your answer (1-5): ")?;
            output.flush()?;
            let line = read_line(&mut input)?.ok_or_else(|| {
                Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before the quiz was finished",
                ))
            })?;
            match line.trim().parse::<i64>() {
                Ok(value) if (MIN_RESPONSE..=MAX_RESPONSE).contains(&value) => {
                    answers.push(value);
                    break;
                }
                Ok(_) => writeln!(output, "Please enter a number between 1 and 5")?,
                Err(_) => writeln!(output, "Please enter a valid number (1-5)")?,
            }
        }
    }

    writeln!(output, "\n{}", RULE)?;
    writeln!(output, "OPTIONAL: Tell us more about yourself")?;
    writeln!(
        output,
        "(Press Enter to skip, or write at least {} characters)",
        predictor.settings().min_text_chars
    )?;
    writeln!(output, "{}", RULE)?;
    write!(output, "\nYour thoughts: ")?;
    output.flush()?;
    let text = read_line(&mut input)?.unwrap_or_default();
    let text = text.trim();
    let text = text_is_usable(Some(text), predictor.settings().min_text_chars).then_some(text);

    writeln!(output, "\nAnalyzing your personality...")?;
    let prediction = predictor.predict_lenient(&answers, variant.as_str(), text)?;
    write!(output, "{}", render_prediction(&prediction))?;
    Ok(prediction)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Type, one bar per dimension and the type description.
pub fn render_prediction(prediction: &Prediction) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", RULE));
    out.push_str("  YOUR PERSONALITY TYPE\n");
    out.push_str(&format!("{}\n", RULE));
    out.push_str(&format!("\n{}\n\n", prediction.personality_type));

    out.push_str("Confidence Breakdown:\n");
    for (dimension, &score) in prediction.scores.iter() {
        out.push_str(&format!("  {}\n", bar_line(dimension, score, prediction.letter(dimension))));
    }
    if prediction.text_used() {
        out.push_str("  (answers blended with your text)\n");
    }

    out.push_str(&format!("\n{}\n", describe(&prediction.personality_type)));
    out.push_str(&format!("\n{}\n", RULE));
    out
}

fn bar_line(dimension: Dimension, score: f64, letter: char) -> String {
    let filled = ((score * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    format!(
        "{} ({} ({})): {}{} {:.1}%",
        dimension,
        letter,
        dimension.trait_name(letter),
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        score * 100.0
    )
}
