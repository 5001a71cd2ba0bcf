//! Detection module for VoiceCheckr

mod result;

pub use result::{BatchEntry, BatchRecord, ClassificationResult, ConfidenceLevel, Prediction};
