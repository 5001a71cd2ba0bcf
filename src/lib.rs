//! VoiceCheckr - Detect AI-generated speech from FFT phase geometry
//!
//! Each clip is transformed as one block with a DFT; four features are read
//! off the positive-frequency half of the spectrum and compared against
//! per-class reference distributions built offline from labelled corpora.
//!
//! ## Features
//!
//! - **Phase coherence**: mean resultant length of unit phasors over sliding
//!   windows of 5 adjacent bins
//! - **Phase velocity**: mean absolute wrapped phase step between bins
//! - **Spectral entropy**: Shannon entropy of the normalised magnitudes
//! - **Spectral L2 norm**: energy of the magnitude spectrum (diagnostic only)
//!
//! ## Module Structure
//!
//! - `core` - Loading, spectral analysis, statistics and classification
//! - `cli` - Command-line interface
//! - `config` - Decision strategy and feature weights
//! - `detection` - Classification result types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voicecheckr::{Classifier, ClassifierConfig, DirectoryCorpus, ReferenceStatisticsBuilder};
//!
//! // Offline: aggregate reference statistics
//! let stats = ReferenceStatisticsBuilder::new()
//!     .build(&DirectoryCorpus::new("data/human"), &DirectoryCorpus::new("data/nonhuman"));
//! stats.save("reference_stats.json")?;
//!
//! // Online: classify a clip
//! let classifier = Classifier::new(stats, ClassifierConfig::default())?;
//! let result = classifier.predict("clip.wav")?;
//! println!("{} ({:.0}%)", result.prediction, result.confidence * 100.0);
//! ```
//!
//! ## Decision Strategies
//!
//! | Strategy   | Rule                                                         |
//! |------------|--------------------------------------------------------------|
//! | `weighted` | Nearest class by weighted standardized distance (default)    |
//! | `threshold`| `phase_coherence > θ` is human, θ = midpoint of class means  |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration
pub mod config;

// Classification result types
pub mod detection;

// Error taxonomy
pub mod error;

pub use config::{ClassifierConfig, DecisionStrategy, FeatureWeights};
pub use detection::{BatchEntry, BatchRecord, ClassificationResult, ConfidenceLevel, Prediction};
pub use error::{Result, VoiceCheckError};
pub use crate::core::{
    extract_features_from_file, load_audio, AudioFormat, BuildReport, ClassLabel,
    ClassStatistics, Classifier, CorpusFailure, CorpusSource, DirectoryCorpus, Feature,
    FeatureExtractor, FeatureStats, FeatureVector, ReferenceStatistics,
    ReferenceStatisticsBuilder, SpectralAnalyzer, Spectrum, Waveform,
};
