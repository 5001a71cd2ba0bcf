// src/core/analyzer.rs
//
// The load -> spectrum -> features pipeline shared by the statistics
// builder and the classifier.

use log::debug;
use std::path::Path;

use super::analysis::{extract_features, FeatureVector};
use super::decoder::{load_audio, Waveform};
use super::dsp::SpectralAnalyzer;
use crate::error::Result;

/// Turns audio files into feature vectors.
///
/// Holds an FFT planner so repeated clips of the same length reuse plans.
/// Not `Sync`; parallel callers keep one extractor per worker.
pub struct FeatureExtractor {
    analyzer: SpectralAnalyzer,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            analyzer: SpectralAnalyzer::new(),
        }
    }

    /// Extract features from an already decoded waveform
    pub fn extract_waveform(&mut self, waveform: &Waveform) -> Result<FeatureVector> {
        let spectrum = self.analyzer.analyze(&waveform.samples, waveform.sample_rate)?;
        Ok(extract_features(&spectrum))
    }

    /// Load a `wav`/`mp3` file and extract its features
    pub fn extract_file(&mut self, path: &Path) -> Result<FeatureVector> {
        let waveform = load_audio(path)?;
        let features = self.extract_waveform(&waveform)?;

        debug!(
            "{}: coherence={:.4} velocity={:.4} entropy={:.4} l2={:.4}",
            path.display(),
            features.phase_coherence,
            features.phase_velocity,
            features.spectral_entropy,
            features.spectral_l2_norm
        );

        Ok(features)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot helper for a single file
pub fn extract_features_from_file<P: AsRef<Path>>(path: P) -> Result<FeatureVector> {
    FeatureExtractor::new().extract_file(path.as_ref())
}
