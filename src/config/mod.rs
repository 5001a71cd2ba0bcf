//! Configuration module for VoiceCheckr

mod strategy;

pub use strategy::{ClassifierConfig, DecisionStrategy, FeatureWeights};
