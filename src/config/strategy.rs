// src/config/strategy.rs
//
// Decision strategy and feature weighting for the classifier

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::analysis::Feature;
use crate::error::{Result, VoiceCheckError};

/// Tolerance on the sum of feature weights
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// How a feature vector is turned into a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStrategy {
    /// Weighted Euclidean combination of standardized distances over
    /// coherence, velocity and entropy; nearest class wins
    #[default]
    WeightedDistance,
    /// `phase_coherence > θ` is human, anything else is AI
    CoherenceThreshold,
}

impl DecisionStrategy {
    pub fn all() -> Vec<Self> {
        vec![Self::WeightedDistance, Self::CoherenceThreshold]
    }

    /// Parse a strategy name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "weighted" | "weighted_distance" | "distance" => Some(Self::WeightedDistance),
            "threshold" | "coherence_threshold" | "theta" => Some(Self::CoherenceThreshold),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WeightedDistance => "weighted",
            Self::CoherenceThreshold => "threshold",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::WeightedDistance => "Weighted standardized distance over three features",
            Self::CoherenceThreshold => "Phase coherence against the midpoint threshold θ",
        }
    }
}

impl std::fmt::Display for DecisionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-feature weights for the weighted distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub spectral_entropy: f64,
    pub phase_coherence: f64,
    pub phase_velocity: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            spectral_entropy: 0.80,
            phase_coherence: 0.10,
            phase_velocity: 0.10,
        }
    }
}

impl FeatureWeights {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::PhaseCoherence => self.phase_coherence,
            Feature::PhaseVelocity => self.phase_velocity,
            Feature::SpectralEntropy => self.spectral_entropy,
        }
    }

    /// Weights must be finite, non-negative and sum to 1
    pub fn validate(&self) -> Result<()> {
        for feature in Feature::all() {
            let w = self.get(feature);
            if !w.is_finite() || w < 0.0 {
                return Err(VoiceCheckError::InvalidConfig(format!(
                    "weight for {} must be a non-negative number, got {}",
                    feature, w
                )));
            }
        }

        let sum: f64 = Feature::all().iter().map(|&f| self.get(f)).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(VoiceCheckError::InvalidConfig(format!(
                "feature weights must sum to 1.0, got {:.6}",
                sum
            )));
        }

        Ok(())
    }
}

/// Complete classifier configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub strategy: DecisionStrategy,
    #[serde(default)]
    pub weights: FeatureWeights,
}

impl ClassifierConfig {
    pub fn new(strategy: DecisionStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: DecisionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_weights(mut self, weights: FeatureWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Load a JSON configuration file; missing fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()
    }
}
