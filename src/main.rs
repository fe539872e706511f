//! # deckfit CLI
//!
//! Usage:
//!   deckfit check deck.json
//!   deckfit fix deck.json -o fixed.json --profile strict
//!   cat deck.json | deckfit check -
//!   deckfit split-diagram flow.mmd
//!
//! Logs go to stderr and are controlled by `RUST_LOG` (default `warn`).

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use deckfit::diagram::split_diagram;
use deckfit::{CompileOptions, DeckEngine, DeckError, DeckSpec, QualityProfile};

/// deckfit - fit slide content to its placeholders
#[derive(Parser, Debug)]
#[command(name = "deckfit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Compile options JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Quality profile: draft, standard or strict
    #[arg(long, global = true)]
    profile: Option<QualityProfile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a deck and print findings and the quality report
    Check {
        /// Deck spec JSON file, or `-` for stdin
        deck: PathBuf,
    },
    /// Run the autofix loop and write the fixed deck
    Fix {
        /// Deck spec JSON file, or `-` for stdin
        deck: PathBuf,

        /// Where to write the fixed deck (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Split a flowchart source into two halves
    SplitDiagram {
        /// Flowchart source file, or `-` for stdin
        source: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput<'a> {
    is_valid: bool,
    is_passing: bool,
    findings: &'a [deckfit::ValidationFinding],
    quality: &'a deckfit::quality::QualityReport,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when the command ran but the deck does not pass.
fn run() -> Result<bool, DeckError> {
    let cli = Cli::parse();
    let mut options = match &cli.config {
        Some(path) => CompileOptions::from_path(path)?,
        None => CompileOptions::default(),
    };
    if let Some(profile) = cli.profile {
        options = options.with_profile(profile);
    }

    match cli.command {
        Commands::Check { deck } => {
            let spec = read_deck(&deck)?;
            let report = DeckEngine::new(options).compile(&spec);
            let output = CheckOutput {
                is_valid: report.is_valid,
                is_passing: report.is_passing,
                findings: &report.findings,
                quality: &report.quality,
            };
            println!("{}", to_json(&output)?);
            if let Err(blocked) = report.ensure_buildable() {
                eprintln!("✗ {blocked}");
                return Ok(false);
            }
            if !report.quality.is_passing {
                for reason in &report.quality.failing_reasons {
                    eprintln!("✗ {reason}");
                }
            }
            Ok(report.is_passing)
        }
        Commands::Fix { deck, output } => {
            let spec = read_deck(&deck)?;
            let report = DeckEngine::new(options).autofix(&spec, None);
            for it in &report.iterations {
                eprintln!(
                    "iteration {}: {} error(s), quality {}, {} fix(es)",
                    it.iteration,
                    it.validation_errors,
                    if it.quality_passing { "passing" } else { "failing" },
                    it.fixes.len()
                );
                for fix in &it.fixes {
                    eprintln!("  - slide {}: {}", fix.slide_index, fix.description);
                }
            }
            let json = to_json(&report.spec)?;
            match output {
                Some(path) => {
                    fs::write(&path, json).map_err(|e| DeckError::io(&path, e))?;
                    eprintln!("✓ Wrote {} slide(s) to {}", report.spec.slides.len(), path.display());
                }
                None => println!("{json}"),
            }
            Ok(report.is_passing)
        }
        Commands::SplitDiagram { source } => {
            let text = read_input(&source)?;
            match split_diagram(&text) {
                Ok(split) => {
                    println!("%% part 1\n{}", split.first);
                    println!("%% part 2\n{}", split.second);
                    Ok(true)
                }
                Err(rejection) => {
                    eprintln!("✗ Cannot split: {rejection}");
                    Ok(false)
                }
            }
        }
    }
}

fn read_input(path: &Path) -> Result<String, DeckError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| DeckError::io(path, e))?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| DeckError::io(path, e))
}

fn read_deck(path: &Path) -> Result<DeckSpec, DeckError> {
    Ok(serde_json::from_str(&read_input(path)?)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, DeckError> {
    Ok(serde_json::to_string_pretty(value)?)
}
