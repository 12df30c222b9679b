//! Error types for proof-of-quality scoring.
use thiserror::Error;

use crate::types::Category;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("insufficient data: no category has any non-zero metric")] InsufficientData,
    #[error("invalid weight spec for {category}: {reason}")] InvalidWeightSpec { category: Category, reason: String },
    #[error("unknown network: {0}")] UnknownNetwork(String),
    #[error("unknown metric key: {0}")] UnknownMetric(String),
    #[error("invalid config: {0}")] InvalidConfig(String),
}

/// Reported by an LLM validator that could not produce a score.
///
/// Never a scoring failure: the blender falls back to the metadata score.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation unavailable: {0}")]
pub struct ValidationUnavailable(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("packed scores have odd length {0}")] OddLength(usize),
    #[error("invalid hex digit at offset {0}")] InvalidHex(usize),
    #[error("section length mismatch: metadata {metadata}, validation {validation}")] LengthMismatch { metadata: usize, validation: usize },
    #[error("too many scores: {got} > {max}")] TooManyScores { got: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_spec_error_names_category() {
        let err = ScoringError::InvalidWeightSpec {
            category: Category::AudibleLibrary,
            reason: "sum 0.9".into(),
        };
        assert_eq!(err.to_string(), "invalid weight spec for Audible Library: sum 0.9");
    }

    #[test]
    fn unknown_network_message() {
        let err = ScoringError::UnknownNetwork("devnet".into());
        assert_eq!(err.to_string(), "unknown network: devnet");
    }

    #[test]
    fn unknown_metric_message() {
        let err = ScoringError::UnknownMetric("item_cnt".into());
        assert_eq!(err.to_string(), "unknown metric key: item_cnt");
    }

    #[test]
    fn unavailable_message() {
        let err = ValidationUnavailable("timed out".into());
        assert_eq!(err.to_string(), "validation unavailable: timed out");
    }
}
