// src/core/detector.rs
//
// Human / AI classification against reference class statistics.

use log::{debug, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use super::analysis::{Feature, FeatureVector};
use super::analyzer::FeatureExtractor;
use super::reference::{ClassStatistics, ReferenceStatistics};
use crate::config::{ClassifierConfig, DecisionStrategy, FeatureWeights};
use crate::detection::{BatchEntry, ClassificationResult, Prediction};
use crate::error::Result;

/// Added to the larger distance in the confidence ratio
pub const CONFIDENCE_EPSILON: f64 = 1e-6;

/// Classifies clips using read-only reference statistics.
///
/// Holds no mutable state; one instance can serve concurrent predictions.
#[derive(Debug, Clone)]
pub struct Classifier {
    stats: ReferenceStatistics,
    config: ClassifierConfig,
}

impl Classifier {
    /// Fails when either class was built from zero files or the weights
    /// are invalid
    pub fn new(stats: ReferenceStatistics, config: ClassifierConfig) -> Result<Self> {
        stats.validate()?;
        config.validate()?;

        debug!(
            "Classifier ready: strategy={}, θ={:.4}, human n={}, nonhuman n={}",
            config.strategy,
            stats.decision_threshold,
            stats.human.count(),
            stats.nonhuman.count()
        );

        Ok(Self { stats, config })
    }

    /// Load persisted statistics and build a classifier
    pub fn from_file<P: AsRef<Path>>(path: P, config: ClassifierConfig) -> Result<Self> {
        Self::new(ReferenceStatistics::load(path)?, config)
    }

    pub fn reference_statistics(&self) -> &ReferenceStatistics {
        &self.stats
    }

    pub fn strategy(&self) -> DecisionStrategy {
        self.config.strategy
    }

    /// Classify an already extracted feature vector
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let (prediction, distance_to_human, distance_to_ai) = match self.config.strategy {
            DecisionStrategy::WeightedDistance => {
                let d_human = weighted_distance(features, &self.stats.human, &self.config.weights);
                let d_ai = weighted_distance(features, &self.stats.nonhuman, &self.config.weights);
                let prediction = if d_ai < d_human {
                    Prediction::Ai
                } else {
                    Prediction::Human
                };
                (prediction, d_human, d_ai)
            }
            DecisionStrategy::CoherenceThreshold => {
                let c = features.phase_coherence;
                let d_human = self.stats.human.phase_coherence.standardized_distance(c);
                let d_ai = self.stats.nonhuman.phase_coherence.standardized_distance(c);
                let prediction = if c > self.stats.decision_threshold {
                    Prediction::Human
                } else {
                    Prediction::Ai
                };
                (prediction, d_human, d_ai)
            }
        };

        ClassificationResult {
            prediction,
            confidence: relative_confidence(distance_to_human, distance_to_ai),
            phase_coherence: features.phase_coherence,
            phase_velocity: features.phase_velocity,
            spectral_entropy: features.spectral_entropy,
            spectral_l2_norm: features.spectral_l2_norm,
            distance_to_human,
            distance_to_ai,
        }
    }

    /// Load, analyze and classify one file
    pub fn predict<P: AsRef<Path>>(&self, path: P) -> Result<ClassificationResult> {
        let mut extractor = FeatureExtractor::new();
        self.predict_with(&mut extractor, path.as_ref())
    }

    fn predict_with(
        &self,
        extractor: &mut FeatureExtractor,
        path: &Path,
    ) -> Result<ClassificationResult> {
        let features = extractor.extract_file(path)?;
        let result = self.classify(&features);
        debug!(
            "{}: {} (confidence {:.3}, d_human={:.4}, d_ai={:.4})",
            path.display(),
            result.prediction,
            result.confidence,
            result.distance_to_human,
            result.distance_to_ai
        );
        Ok(result)
    }

    /// Classify every path independently; failures are reported per entry
    /// and results keep input order
    pub fn predict_batch(&self, paths: &[PathBuf]) -> Vec<BatchEntry> {
        paths
            .par_iter()
            .map_init(FeatureExtractor::new, |extractor, path| {
                let outcome = self.predict_with(extractor, path);
                if let Err(ref e) = outcome {
                    warn!("Prediction failed for {}: {}", path.display(), e);
                }
                BatchEntry {
                    path: path.clone(),
                    outcome,
                }
            })
            .collect()
    }
}

/// Weighted Euclidean norm of per-feature standardized distances:
/// `sqrt(Σ (w_f · |x_f − μ_f| / (σ_f + ε))²)`
pub fn weighted_distance(
    features: &FeatureVector,
    class: &ClassStatistics,
    weights: &FeatureWeights,
) -> f64 {
    Feature::all()
        .iter()
        .map(|&feature| {
            let z = class.get(feature).standardized_distance(features.get(feature));
            let weighted = weights.get(feature) * z;
            weighted * weighted
        })
        .sum::<f64>()
        .sqrt()
}

/// `1 − min(d) / (max(d) + ε)`, exactly 0 for equal distances
pub fn relative_confidence(distance_to_human: f64, distance_to_ai: f64) -> f64 {
    if distance_to_human == distance_to_ai {
        return 0.0;
    }
    let min_dist = distance_to_human.min(distance_to_ai);
    let max_dist = distance_to_human.max(distance_to_ai);
    let confidence = 1.0 - min_dist / (max_dist + CONFIDENCE_EPSILON);
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::FeatureStats;
    use crate::error::VoiceCheckError;

    fn stats(mean: f64, std: f64, count: usize) -> FeatureStats {
        FeatureStats {
            mean,
            std,
            min: None,
            max: None,
            count,
        }
    }

    fn reference() -> ReferenceStatistics {
        let human = ClassStatistics {
            phase_coherence: stats(0.8, 0.05, 20),
            phase_velocity: stats(1.0, 0.2, 20),
            spectral_entropy: stats(7.0, 0.5, 20),
        };
        let nonhuman = ClassStatistics {
            phase_coherence: stats(0.4, 0.05, 20),
            phase_velocity: stats(1.5, 0.2, 20),
            spectral_entropy: stats(6.0, 0.5, 20),
        };
        ReferenceStatistics::from_classes(human, nonhuman)
    }

    fn features(coherence: f64, velocity: f64, entropy: f64) -> FeatureVector {
        FeatureVector {
            phase_coherence: coherence,
            phase_velocity: velocity,
            spectral_entropy: entropy,
            spectral_l2_norm: 42.0,
        }
    }

    #[test]
    fn test_weighted_predicts_nearest_class() {
        let classifier = Classifier::new(reference(), ClassifierConfig::default()).unwrap();

        let human = classifier.classify(&features(0.8, 1.0, 7.0));
        assert_eq!(human.prediction, Prediction::Human);
        assert!(human.distance_to_human < 1e-6);
        assert!(human.confidence > 0.99);

        let ai = classifier.classify(&features(0.4, 1.5, 6.0));
        assert_eq!(ai.prediction, Prediction::Ai);
        assert!(ai.distance_to_ai < 1e-6);
    }

    #[test]
    fn test_weighted_distance_formula() {
        let reference = reference();
        let weights = FeatureWeights::default();
        // One std away on entropy only
        let d = weighted_distance(&features(0.8, 1.0, 7.5), &reference.human, &weights);
        let expected = 0.8 * 0.5 / (0.5 + 1e-6);
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_dominates_weighted_decision() {
        let classifier = Classifier::new(reference(), ClassifierConfig::default()).unwrap();
        // Human-like coherence, AI-like entropy
        let result = classifier.classify(&features(0.8, 1.0, 6.0));
        assert_eq!(result.prediction, Prediction::Ai);
    }

    #[test]
    fn test_threshold_strategy_uses_coherence_only() {
        let config = ClassifierConfig::new(DecisionStrategy::CoherenceThreshold);
        let classifier = Classifier::new(reference(), config).unwrap();

        // AI-like entropy but coherence above θ = 0.6
        let result = classifier.classify(&features(0.65, 1.5, 6.0));
        assert_eq!(result.prediction, Prediction::Human);
        let expected_h = (0.65f64 - 0.8).abs() / (0.05 + 1e-6);
        assert!((result.distance_to_human - expected_h).abs() < 1e-9);

        let at_threshold = classifier.classify(&features(0.6, 1.0, 7.0));
        assert_eq!(at_threshold.prediction, Prediction::Ai);
    }

    #[test]
    fn test_equal_distances_zero_confidence() {
        assert_eq!(relative_confidence(0.0, 0.0), 0.0);
        assert_eq!(relative_confidence(2.5, 2.5), 0.0);
    }

    #[test]
    fn test_confidence_bounds() {
        let pairs = [(0.0, 3.0), (3.0, 0.0), (1.0, 2.0), (1e-9, 1e9), (7.0, 6.999)];
        for (a, b) in pairs {
            let c = relative_confidence(a, b);
            assert!((0.0..=1.0).contains(&c), "confidence {} for ({}, {})", c, a, b);
        }
        assert!((relative_confidence(1.0, 2.0) - (1.0 - 1.0 / (2.0 + 1e-6))).abs() < 1e-12);
    }

    #[test]
    fn test_diagnostics_carried_through() {
        let classifier = Classifier::new(reference(), ClassifierConfig::default()).unwrap();
        let input = features(0.55, 1.3, 6.4);
        let result = classifier.classify(&input);
        assert_eq!(result.features(), input);
    }

    #[test]
    fn test_rejects_degenerate_statistics() {
        let mut reference = reference();
        reference.nonhuman = ClassStatistics::from_features(&[]);
        let err = Classifier::new(reference, ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, VoiceCheckError::DegenerateStatistics { .. }));
    }

    #[test]
    fn test_rejects_invalid_weights() {
        let config = ClassifierConfig::default().with_weights(FeatureWeights {
            spectral_entropy: 0.9,
            phase_coherence: 0.9,
            phase_velocity: 0.9,
        });
        assert!(Classifier::new(reference(), config).is_err());
    }

    #[test]
    fn test_zero_variance_reference_stays_finite() {
        let mut reference = reference();
        reference.human.spectral_entropy.std = 0.0;
        let classifier = Classifier::new(reference, ClassifierConfig::default()).unwrap();
        let result = classifier.classify(&features(0.7, 1.1, 7.1));
        assert!(result.distance_to_human.is_finite());
        assert!(result.confidence.is_finite());
    }

    #[test]
    fn test_batch_reports_failures_in_order() {
        let classifier = Classifier::new(reference(), ClassifierConfig::default()).unwrap();
        let paths = vec![
            PathBuf::from("/nonexistent/one.wav"),
            PathBuf::from("two.flac"),
        ];
        let entries = classifier.predict_batch(&paths);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, paths[0]);
        assert!(matches!(entries[0].outcome, Err(VoiceCheckError::Decode { .. })));
        assert!(matches!(entries[1].outcome, Err(VoiceCheckError::UnsupportedFormat(_))));
    }
}
