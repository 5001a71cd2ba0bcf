//! Feature extraction from a whole-clip spectrum
//!
//! - Phase coherence and phase velocity (`phase`)
//! - Spectral entropy and L2 norm (`spectral`)
//!
//! The same code path runs when reference statistics are built and when a
//! clip is classified, so distances between them stay comparable.

mod phase;
mod spectral;

use serde::{Deserialize, Serialize};

use super::dsp::Spectrum;
use super::dsp::stats::sanitize;

pub use phase::{
    analyze_phase, phase_coherence, phase_velocity, PhaseAnalysis, COHERENCE_WINDOW,
    SHORT_SIGNAL_COHERENCE,
};
pub use spectral::{analyze_spectral_shape, spectral_entropy, SpectralShape, ENTROPY_EPSILON};

/// The four scalar features of one clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub phase_coherence: f64,
    pub phase_velocity: f64,
    pub spectral_entropy: f64,
    pub spectral_l2_norm: f64,
}

impl FeatureVector {
    /// Value of one of the features kept in reference statistics
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::PhaseCoherence => self.phase_coherence,
            Feature::PhaseVelocity => self.phase_velocity,
            Feature::SpectralEntropy => self.spectral_entropy,
        }
    }
}

/// Features that carry reference statistics and enter the distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PhaseCoherence,
    PhaseVelocity,
    SpectralEntropy,
}

impl Feature {
    pub fn all() -> [Self; 3] {
        [Self::PhaseCoherence, Self::PhaseVelocity, Self::SpectralEntropy]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feature::PhaseCoherence => "phase_coherence",
            Feature::PhaseVelocity => "phase_velocity",
            Feature::SpectralEntropy => "spectral_entropy",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Derive all features from a spectrum
pub fn extract_features(spectrum: &Spectrum) -> FeatureVector {
    let phase = analyze_phase(&spectrum.phase);
    let shape = analyze_spectral_shape(&spectrum.magnitude);

    FeatureVector {
        phase_coherence: sanitize(phase.phase_coherence),
        phase_velocity: sanitize(phase.phase_velocity),
        spectral_entropy: sanitize(shape.entropy),
        spectral_l2_norm: sanitize(shape.l2_norm),
    }
}
