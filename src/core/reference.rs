// src/core/reference.rs
//
// Reference statistics: per-class feature distributions aggregated over
// labelled corpora, the coherence midpoint threshold, and their JSON
// persistence.

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::analysis::{Feature, FeatureVector};
use super::analyzer::FeatureExtractor;
use super::decoder::AudioFormat;
use super::dsp::stats;
use crate::error::{Result, VoiceCheckError};

/// Added to every standard deviation used as a divisor
pub const STD_EPSILON: f64 = 1e-6;

/// Corpus class of a reference recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Human,
    Nonhuman,
}

impl ClassLabel {
    pub fn name(&self) -> &'static str {
        match self {
            ClassLabel::Human => "human",
            ClassLabel::Nonhuman => "nonhuman",
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Summary of one feature over one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub count: usize,
}

impl FeatureStats {
    /// Summarise a collection of values. Empty input gives all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let min = stats::min(values);
        let max = stats::max(values);
        // Summation rounding can push the mean of identical values past them
        let mut mean = stats::mean(values);
        if min <= max {
            mean = mean.clamp(min, max);
        }

        Self {
            mean,
            std: stats::population_std(values),
            min: Some(min),
            max: Some(max),
            count: values.len(),
        }
    }

    /// Standard deviation safe to divide by
    pub fn divisor(&self) -> f64 {
        self.std.max(0.0) + STD_EPSILON
    }

    /// |value - mean| in units of this class's spread
    pub fn standardized_distance(&self, value: f64) -> f64 {
        (value - self.mean).abs() / self.divisor()
    }
}

/// Feature distributions for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {
    pub phase_coherence: FeatureStats,
    pub phase_velocity: FeatureStats,
    pub spectral_entropy: FeatureStats,
}

impl ClassStatistics {
    pub fn from_features(features: &[FeatureVector]) -> Self {
        let collect = |feature: Feature| -> Vec<f64> {
            features.iter().map(|f| f.get(feature)).collect()
        };

        Self {
            phase_coherence: FeatureStats::from_values(&collect(Feature::PhaseCoherence)),
            phase_velocity: FeatureStats::from_values(&collect(Feature::PhaseVelocity)),
            spectral_entropy: FeatureStats::from_values(&collect(Feature::SpectralEntropy)),
        }
    }

    pub fn get(&self, feature: Feature) -> &FeatureStats {
        match feature {
            Feature::PhaseCoherence => &self.phase_coherence,
            Feature::PhaseVelocity => &self.phase_velocity,
            Feature::SpectralEntropy => &self.spectral_entropy,
        }
    }

    /// Number of files the class was built from
    pub fn count(&self) -> usize {
        self.phase_coherence.count
    }
}

/// Both class distributions plus the coherence decision threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStatistics {
    pub human: ClassStatistics,
    pub nonhuman: ClassStatistics,
    pub decision_threshold: f64,
}

impl ReferenceStatistics {
    /// Combine class statistics; θ is the midpoint of the mean coherences
    pub fn from_classes(human: ClassStatistics, nonhuman: ClassStatistics) -> Self {
        let decision_threshold =
            (human.phase_coherence.mean + nonhuman.phase_coherence.mean) / 2.0;
        Self {
            human,
            nonhuman,
            decision_threshold,
        }
    }

    pub fn class(&self, label: ClassLabel) -> &ClassStatistics {
        match label {
            ClassLabel::Human => &self.human,
            ClassLabel::Nonhuman => &self.nonhuman,
        }
    }

    /// Reject records where a class was built from no usable files
    pub fn validate(&self) -> Result<()> {
        for label in [ClassLabel::Human, ClassLabel::Nonhuman] {
            let class = self.class(label);
            if Feature::all().iter().any(|&f| class.get(f).count == 0) {
                return Err(VoiceCheckError::DegenerateStatistics { class: label });
            }
        }
        Ok(())
    }

    /// Read a persisted record
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(VoiceCheckError::StatisticsNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the record as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("Reference statistics saved to {}", path.display());
        Ok(())
    }
}

/// Supplies the audio files of one corpus
pub trait CorpusSource {
    fn audio_files(&self) -> Vec<PathBuf>;
}

/// Explicit file lists keep their order; non-audio entries are dropped
impl CorpusSource for [PathBuf] {
    fn audio_files(&self) -> Vec<PathBuf> {
        self.iter()
            .filter(|p| AudioFormat::is_supported(p))
            .cloned()
            .collect()
    }
}

impl CorpusSource for Vec<PathBuf> {
    fn audio_files(&self) -> Vec<PathBuf> {
        self.as_slice().audio_files()
    }
}

/// Every `wav`/`mp3` under a directory, recursively, in sorted order.
/// A missing directory is an empty corpus.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
}

impl DirectoryCorpus {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl CorpusSource for DirectoryCorpus {
    fn audio_files(&self) -> Vec<PathBuf> {
        if !self.root.exists() {
            warn!("Corpus directory {} does not exist", self.root.display());
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| AudioFormat::is_supported(p))
            .collect();

        files.sort();
        files
    }
}

/// A corpus file that could not be turned into features
#[derive(Debug, Clone)]
pub struct CorpusFailure {
    pub class: ClassLabel,
    pub path: PathBuf,
    pub error: String,
}

/// Statistics plus the files that were skipped while building them
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub statistics: ReferenceStatistics,
    pub failures: Vec<CorpusFailure>,
}

/// Aggregates features over a human and a non-human corpus
#[derive(Debug, Clone, Default)]
pub struct ReferenceStatisticsBuilder {
    show_progress: bool,
}

impl ReferenceStatisticsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar per corpus on stderr
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build statistics, discarding the failure list
    pub fn build<H, N>(&self, human: &H, nonhuman: &N) -> ReferenceStatistics
    where
        H: CorpusSource + ?Sized,
        N: CorpusSource + ?Sized,
    {
        self.build_with_report(human, nonhuman).statistics
    }

    /// Build statistics and report every file that was skipped
    pub fn build_with_report<H, N>(&self, human: &H, nonhuman: &N) -> BuildReport
    where
        H: CorpusSource + ?Sized,
        N: CorpusSource + ?Sized,
    {
        let (human_stats, mut failures) =
            self.process_class(ClassLabel::Human, human.audio_files());
        let (nonhuman_stats, nonhuman_failures) =
            self.process_class(ClassLabel::Nonhuman, nonhuman.audio_files());
        failures.extend(nonhuman_failures);

        let statistics = ReferenceStatistics::from_classes(human_stats, nonhuman_stats);

        info!(
            "Decision threshold θ = {:.4} (μ human = {:.4}, μ nonhuman = {:.4})",
            statistics.decision_threshold,
            statistics.human.phase_coherence.mean,
            statistics.nonhuman.phase_coherence.mean
        );

        BuildReport {
            statistics,
            failures,
        }
    }

    fn process_class(
        &self,
        class: ClassLabel,
        files: Vec<PathBuf>,
    ) -> (ClassStatistics, Vec<CorpusFailure>) {
        info!("Found {} {} speech file(s)", files.len(), class);

        let progress = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{prefix:>9} [{bar:40}] {pos}/{len}") {
                pb.set_style(style.progress_chars("=> "));
            }
            pb.set_prefix(class.name());
            pb
        } else {
            ProgressBar::hidden()
        };

        // Extraction runs in parallel; aggregation below is sequential and
        // in corpus order.
        let outcomes: Vec<(PathBuf, Result<FeatureVector>)> = files
            .par_iter()
            .progress_with(progress.clone())
            .map_init(FeatureExtractor::new, |extractor, path| {
                (path.clone(), extractor.extract_file(path))
            })
            .collect();

        progress.finish_and_clear();

        let mut features = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (path, outcome) in outcomes {
            match outcome {
                Ok(f) => features.push(f),
                Err(e) => {
                    warn!("Skipping {} ({}): {}", path.display(), class, e);
                    failures.push(CorpusFailure {
                        class,
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        if features.is_empty() {
            warn!("No usable {} files; class statistics are empty", class);
        }

        (ClassStatistics::from_features(&features), failures)
    }
}
