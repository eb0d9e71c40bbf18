//! chess-perft - Counts move-generation leaf nodes and checks them against
//! known values.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`, e.g.
//! `RUST_LOG=chess_perft=info,chess_engine=trace`.

mod config;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::PerftConfig;
use runner::SuiteOutcome;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-perft")]
#[command(about = "Perft runner for the chess move generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes below a position
    Run {
        /// Position in FEN, optionally prefixed with a variant ("chess960:...")
        fen: String,
        /// Search depth
        #[arg(short, long, default_value = "1")]
        depth: u32,
        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the suites of a configuration file
    Suite {
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Only run the suite with this name
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            fen,
            depth,
            divide,
            json,
        } => run(&fen, depth, divide, json),
        Commands::Suite { config, name } => suite(config, name.as_deref()),
    }
}

fn run(fen: &str, depth: u32, divide: bool, json: bool) -> ExitCode {
    let report = match runner::run(fen, depth, divide) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if json {
        match report.to_json() {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report.to_text());
    }
    ExitCode::SUCCESS
}

fn suite(path: Option<PathBuf>, name: Option<&str>) -> ExitCode {
    let path = path.unwrap_or_else(PerftConfig::default_path);
    let config = match PerftConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let selected: Vec<(&str, &config::SuiteConfig)> = match name {
        Some(name) => match config.get_suite(name) {
            Ok(suite) => vec![(name, suite)],
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => config
            .suites
            .iter()
            .map(|(name, suite)| (name.as_str(), suite))
            .collect(),
    };
    if selected.is_empty() {
        eprintln!("No suites in {}", path.display());
        return ExitCode::FAILURE;
    }
    tracing::info!(config = %path.display(), suites = selected.len(), "running suites");

    let mut failures = 0;
    for (name, suite) in selected {
        let outcome = runner::check_suite(name, suite);
        if !outcome.is_success() {
            failures += 1;
        }
        match outcome {
            SuiteOutcome::Passed { depths } => println!("{}: ok ({} depths)", name, depths),
            SuiteOutcome::Failed(mismatches) => {
                for m in mismatches {
                    println!(
                        "{}: depth {} expected {} got {}",
                        name, m.depth, m.expected, m.actual
                    );
                }
            }
            SuiteOutcome::InvalidFen(message) => println!("{}: {}", name, message),
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{} suite(s) failed", failures);
        ExitCode::FAILURE
    }
}
