//! poq-cli: command-line proof-of-quality scoring.
//!
//! Reads an already-extracted metric bundle (JSON), layers configuration
//! over the network defaults, and prints the scoring result. Contains no
//! scoring logic of its own.

mod settings;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use poq_core::error::ScoringError;
use poq_core::traits::LlmValidator;
use poq_core::types::RecordBundle;
use poq_score::blender::{FixedScore, Unavailable};
use poq_score::encoding::pack_result;
use poq_score::engine::compute_proof_of_quality;
use tracing::{debug, error};

/// Exit code for configuration and input errors.
const EXIT_CONFIG: i32 = 1;
/// Exit code when the bundle holds no usable category.
const EXIT_INSUFFICIENT_DATA: i32 = 2;

/// Proof-of-quality scoring for exported commerce and media data.
#[derive(Parser)]
#[command(name = "poq-cli")]
#[command(version, about = "Score a bundle of extracted user data")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a metric bundle.
    Score(ScoreArgs),
}

#[derive(Args)]
struct ScoreArgs {
    /// Path to the JSON metric bundle.
    #[arg(short, long)]
    records: PathBuf,

    /// Network profile (mainnet or testnet).
    #[arg(short, long)]
    network: String,

    /// Validation score in [0, 1]. Without it scoring runs degraded.
    #[arg(long)]
    llm_score: Option<f64>,

    /// TOML config file (default: <config dir>/poq/poq.toml if present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the packed hex score string instead of JSON.
    #[arg(long)]
    packed: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let result = match cli.command {
        Commands::Score(args) => score(args),
    };

    if let Err(e) = result {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        process::exit(exit_code(&e));
    }
}

/// Map a failure to the process exit code.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScoringError>() {
        Some(ScoringError::InsufficientData) => EXIT_INSUFFICIENT_DATA,
        _ => EXIT_CONFIG,
    }
}

fn score(args: ScoreArgs) -> Result<()> {
    let records = read_bundle(&args.records)?;
    let overrides = settings::load_overrides(args.config.as_deref())?;
    debug!(?overrides, "configuration loaded");

    let validator: Box<dyn LlmValidator> = match args.llm_score {
        Some(s) => Box::new(FixedScore::new(s)),
        None => Box::new(Unavailable::new("no validation score supplied")),
    };

    let result = compute_proof_of_quality(&records, validator.as_ref(), &args.network, Some(&overrides))?;

    if args.packed {
        println!("{}", pack_result(&result));
    } else {
        let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
        println!("{json}");
    }
    Ok(())
}

fn read_bundle(path: &Path) -> Result<RecordBundle> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid record bundle: {}", path.display()))
}

/// Route tracing output to stderr, keeping stdout for the scoring result.
///
/// `RUST_LOG` wins over `level_str` when set. `format` is checked by clap.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
