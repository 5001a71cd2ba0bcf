//! Output formatting for CLI results

use colorful::Colorful;
use std::path::Path;

use crate::core::analysis::Feature;
use crate::core::reference::{BuildReport, ClassLabel, ReferenceStatistics};
use crate::detection::{BatchEntry, BatchRecord, ClassificationResult, Prediction};

const RULE: &str = "======================================================================";

/// Format one classification for terminal output
pub fn format_result(path: &Path, result: &ClassificationResult, verbose: bool) -> String {
    let mut output = String::new();

    let verdict = format!(
        "{} {}",
        result.prediction.symbol(),
        result.prediction.description()
    );
    let verdict = match result.prediction {
        Prediction::Human => verdict.as_str().green().to_string(),
        Prediction::Ai => verdict.as_str().red().to_string(),
    };

    output.push_str(&format!("{}\n", path.display().to_string().as_str().cyan()));
    output.push_str(&format!(
        "  {} (confidence: {:.1}%, {})\n",
        verdict,
        result.confidence * 100.0,
        result.confidence_level().name()
    ));

    if verbose {
        output.push_str("  Details:\n");
        output.push_str(&format!("    Phase coherence:   {:.4}\n", result.phase_coherence));
        output.push_str(&format!("    Phase velocity:    {:.4} rad\n", result.phase_velocity));
        output.push_str(&format!("    Spectral entropy:  {:.4} nats\n", result.spectral_entropy));
        output.push_str(&format!("    Spectral L2 norm:  {:.4}\n", result.spectral_l2_norm));
        output.push_str(&format!("    Distance to human: {:.4}\n", result.distance_to_human));
        output.push_str(&format!("    Distance to AI:    {:.4}\n", result.distance_to_ai));
    }

    output
}

/// Format a failed batch item
pub fn format_failure(path: &Path, error: &str) -> String {
    format!(
        "{}\n  {}\n",
        path.display().to_string().as_str().cyan(),
        format!("ERROR: {}", error).as_str().red()
    )
}

/// Format a batch for terminal output
pub fn format_batch(entries: &[BatchEntry], verbose: bool) -> String {
    entries
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(result) => format_result(&entry.path, result, verbose),
            Err(e) => format_failure(&entry.path, &e.to_string()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a batch as a JSON array
pub fn format_batch_json(entries: &[BatchEntry]) -> serde_json::Result<String> {
    let records: Vec<BatchRecord> = entries.iter().map(BatchRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

/// Format reference statistics and the θ decision rule
pub fn format_statistics(stats: &ReferenceStatistics) -> String {
    let mut output = String::new();

    for label in [ClassLabel::Human, ClassLabel::Nonhuman] {
        let class = stats.class(label);
        output.push_str(&format!(
            "\n{} SPEECH (N={})\n",
            label.name().to_uppercase(),
            class.count()
        ));

        for feature in Feature::all() {
            let s = class.get(feature);
            output.push_str(&format!("  {}:\n", feature_title(feature)));
            output.push_str(&format!("    μ = {:.4}\n", s.mean));
            output.push_str(&format!("    σ = {:.4}\n", s.std));
            if let (Some(min), Some(max)) = (s.min, s.max) {
                output.push_str(&format!("    range = [{:.4}, {:.4}]\n", min, max));
            }
        }
    }

    output.push_str(&format!("\n{}\nDECISION THRESHOLD (Midpoint Rule)\n{}\n", RULE, RULE));
    output.push_str(&format!("  μ(human) = {:.4}\n", stats.human.phase_coherence.mean));
    output.push_str(&format!("  μ(AI)    = {:.4}\n", stats.nonhuman.phase_coherence.mean));
    output.push_str(&format!("  Threshold θ = {:.4}\n", stats.decision_threshold));
    output.push_str("\nDecision Rule:\n");
    output.push_str("  if C(x) > θ -> HUMAN\n");
    output.push_str("  if C(x) ≤ θ -> AI-GENERATED\n");
    output.push_str(RULE);
    output.push('\n');

    output
}

/// Format the outcome of a statistics build
pub fn format_build_report(report: &BuildReport) -> String {
    let mut output = String::new();

    if !report.failures.is_empty() {
        output.push_str(&format!(
            "{}\n",
            format!("Skipped {} file(s):", report.failures.len()).as_str().yellow()
        ));
        for failure in &report.failures {
            output.push_str(&format!(
                "  [{}] {}: {}\n",
                failure.class,
                failure.path.display(),
                failure.error
            ));
        }
    }

    output.push_str(&format_statistics(&report.statistics));
    output
}

fn feature_title(feature: Feature) -> &'static str {
    match feature {
        Feature::PhaseCoherence => "Phase Coherence",
        Feature::PhaseVelocity => "Phase Velocity",
        Feature::SpectralEntropy => "Spectral Entropy",
    }
}
