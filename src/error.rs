// src/error.rs
//
// Error taxonomy shared by the loader, extractor, statistics builder and
// classifier.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::reference::ClassLabel;

/// Errors produced by the detection pipeline
#[derive(Debug, Error)]
pub enum VoiceCheckError {
    /// File extension is not `wav` or `mp3`
    #[error("Unsupported file format: {0}. Use WAV or MP3.")]
    UnsupportedFormat(String),

    /// The codec or container library failed on a recognised format
    #[error("Error loading audio file {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Empty or otherwise unusable waveform
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    /// Reference statistics record is missing
    #[error(
        "Reference statistics file not found: {}. Run `voicecheckr build-stats` to generate it.",
        .0.display()
    )]
    StatisticsNotFound(PathBuf),

    /// A class had no usable files when the statistics were built
    #[error("Reference statistics for class '{class}' were built from zero usable files")]
    DegenerateStatistics { class: ClassLabel },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VoiceCheckError {
    pub(crate) fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VoiceCheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_keeps_cause() {
        let err = VoiceCheckError::decode("clip.mp3", "unexpected end of stream");
        let message = err.to_string();
        assert!(message.contains("clip.mp3"));
        assert!(message.contains("unexpected end of stream"));
    }

    #[test]
    fn test_degenerate_names_class() {
        let err = VoiceCheckError::DegenerateStatistics { class: ClassLabel::Nonhuman };
        assert!(err.to_string().contains("nonhuman"));
    }
}
