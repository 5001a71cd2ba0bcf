//! Classification result types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::analysis::FeatureVector;
use crate::error::VoiceCheckError;

/// Predicted origin of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Human,
    Ai,
}

impl Prediction {
    pub fn name(&self) -> &'static str {
        match self {
            Prediction::Human => "human",
            Prediction::Ai => "ai",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Prediction::Human => "✓",
            Prediction::Ai => "✗",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Prediction::Human => "Human speech",
            Prediction::Ai => "AI-generated speech",
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coarse confidence band for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceLevel {
    Uncertain,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        match confidence {
            c if c >= 0.85 => ConfidenceLevel::High,
            c if c >= 0.65 => ConfidenceLevel::Medium,
            c if c >= 0.40 => ConfidenceLevel::Low,
            _ => ConfidenceLevel::Uncertain,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfidenceLevel::Uncertain => "uncertain",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

/// Outcome of classifying one clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub prediction: Prediction,
    /// In [0, 1]; 0 when both class distances are equal
    pub confidence: f64,
    pub phase_coherence: f64,
    pub phase_velocity: f64,
    pub spectral_entropy: f64,
    pub spectral_l2_norm: f64,
    pub distance_to_human: f64,
    pub distance_to_ai: f64,
}

impl ClassificationResult {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            phase_coherence: self.phase_coherence,
            phase_velocity: self.phase_velocity,
            spectral_entropy: self.spectral_entropy,
            spectral_l2_norm: self.spectral_l2_norm,
        }
    }
}

/// One item of a batch prediction
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: Result<ClassificationResult, VoiceCheckError>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Serialisable view of a batch entry: the result fields, or an error
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub filepath: String,
    #[serde(flatten)]
    pub result: Option<ClassificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&BatchEntry> for BatchRecord {
    fn from(entry: &BatchEntry) -> Self {
        let filepath = entry.path.display().to_string();
        match &entry.outcome {
            Ok(result) => Self {
                filepath,
                result: Some(*result),
                error: None,
            },
            Err(e) => Self {
                filepath,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }
}
