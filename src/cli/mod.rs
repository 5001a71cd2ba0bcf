// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{Args, Command, DEFAULT_STATS_FILE};
pub use output::{
    format_batch, format_batch_json, format_build_report, format_result, format_statistics,
};

use anyhow::{bail, Context, Result};
use colorful::Colorful;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::{ClassifierConfig, DecisionStrategy};
use crate::core::decoder::AudioFormat;
use crate::core::detector::Classifier;
use crate::core::reference::{
    CorpusSource, DirectoryCorpus, ReferenceStatistics, ReferenceStatisticsBuilder,
};

/// Run a parsed command
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Command::BuildStats {
            human,
            nonhuman,
            output,
            no_progress,
        } => build_stats(&human, &nonhuman, &output, !no_progress),
        Command::Predict {
            inputs,
            stats,
            strategy,
            config,
            json,
        } => predict(&inputs, &stats, strategy, config.as_deref(), json, args.verbose),
        Command::ShowStats { stats, json } => show_stats(&stats, json),
    }
}

fn build_stats(human: &Path, nonhuman: &Path, output: &Path, progress: bool) -> Result<()> {
    for dir in [human, nonhuman] {
        if !dir.is_dir() {
            bail!("Corpus directory not found: {}", dir.display());
        }
    }

    let human = DirectoryCorpus::new(human);
    let nonhuman = DirectoryCorpus::new(nonhuman);

    let report = ReferenceStatisticsBuilder::new()
        .show_progress(progress)
        .build_with_report(&human, &nonhuman);

    println!("{}", format_build_report(&report));

    report
        .statistics
        .validate()
        .context("At least one dataset has no usable audio files; statistics not saved")?;

    report
        .statistics
        .save(output)
        .with_context(|| format!("Failed to write statistics to {}", output.display()))?;

    println!("Statistics saved to {}", output.display().to_string().as_str().green());
    Ok(())
}

fn predict(
    inputs: &[PathBuf],
    stats_path: &Path,
    strategy: Option<DecisionStrategy>,
    config_path: Option<&Path>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ClassifierConfig::from_file(path)
            .with_context(|| format!("Failed to load classifier config {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    if let Some(strategy) = strategy {
        config = config.with_strategy(strategy);
    }

    let classifier = Classifier::from_file(stats_path, config)
        .context("Failed to initialize classifier")?;

    let files = collect_audio_files(inputs);
    if files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(());
    }

    info!(
        "Classifying {} file(s) with the {} strategy",
        files.len(),
        classifier.strategy()
    );

    let entries = classifier.predict_batch(&files);

    if json {
        println!("{}", format_batch_json(&entries)?);
    } else {
        println!("{}", format_batch(&entries, verbose));
    }

    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    if failed > 0 {
        bail!("{} of {} file(s) could not be classified", failed, entries.len());
    }

    Ok(())
}

fn show_stats(stats_path: &Path, json: bool) -> Result<()> {
    let stats = ReferenceStatistics::load(stats_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_statistics(&stats));
    }

    Ok(())
}

/// Expand directories into their audio files; explicit files are kept as
/// given so unsupported ones are reported rather than dropped
fn collect_audio_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(DirectoryCorpus::new(input).audio_files());
        } else {
            if !AudioFormat::is_supported(input) {
                log::warn!("{} does not look like a wav/mp3 file", input.display());
            }
            files.push(input.clone());
        }
    }

    files
}
