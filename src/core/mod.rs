//! Core loading, spectral analysis, reference statistics and classification

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod detector;
pub mod dsp;
pub mod reference;

pub use analysis::{extract_features, Feature, FeatureVector};
pub use analyzer::{extract_features_from_file, FeatureExtractor};
pub use decoder::{load_audio, AudioFormat, Waveform};
pub use detector::Classifier;
pub use dsp::{SpectralAnalyzer, Spectrum};
pub use reference::{
    BuildReport, ClassLabel, ClassStatistics, CorpusFailure, CorpusSource, DirectoryCorpus,
    FeatureStats, ReferenceStatistics, ReferenceStatisticsBuilder,
};
