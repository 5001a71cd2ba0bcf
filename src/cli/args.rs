//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DecisionStrategy;

/// Default location of the persisted reference statistics
pub const DEFAULT_STATS_FILE: &str = "reference_stats.json";

#[derive(Parser, Debug)]
#[command(name = "voicecheckr")]
#[command(version)]
#[command(about = "Detect AI-generated speech using FFT phase geometry")]
pub struct Args {
    /// Verbose output (debug logging, per-file diagnostics)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Worker threads for per-file analysis (defaults to all cores)
    #[arg(short = 'j', long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute reference statistics from labelled corpora
    BuildStats {
        /// Directory of human speech (searched recursively for wav/mp3)
        #[arg(long)]
        human: PathBuf,

        /// Directory of AI-generated speech (searched recursively for wav/mp3)
        #[arg(long)]
        nonhuman: PathBuf,

        /// Where to write the statistics record
        #[arg(short, long, default_value = DEFAULT_STATS_FILE, env = "VOICECHECKR_STATS")]
        output: PathBuf,

        /// Disable progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Classify audio files (or directories of them) as human or AI
    Predict {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Reference statistics record
        #[arg(short, long, default_value = DEFAULT_STATS_FILE, env = "VOICECHECKR_STATS")]
        stats: PathBuf,

        /// Decision strategy: weighted or threshold
        #[arg(long, value_parser = parse_strategy)]
        strategy: Option<DecisionStrategy>,

        /// JSON classifier configuration (strategy and weights)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON output format
        #[arg(long)]
        json: bool,
    },

    /// Print the reference statistics and decision rule
    ShowStats {
        /// Reference statistics record
        #[arg(short, long, default_value = DEFAULT_STATS_FILE, env = "VOICECHECKR_STATS")]
        stats: PathBuf,

        /// JSON output format
        #[arg(long)]
        json: bool,
    },
}

fn parse_strategy(name: &str) -> Result<DecisionStrategy, String> {
    DecisionStrategy::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = DecisionStrategy::all().iter().map(|s| s.name()).collect();
        format!("unknown strategy '{}' (expected one of: {})", name, known.join(", "))
    })
}
