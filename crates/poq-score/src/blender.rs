//! Blend of the metadata score with an external validation score.

use poq_core::constants::{LLM_BLEND_WEIGHT, METADATA_BLEND_WEIGHT};
use poq_core::error::ValidationUnavailable;
use poq_core::traits::LlmValidator;
use poq_core::types::{RecordBundle, ValidationReport};
use tracing::warn;

use crate::transforms::clamp_unit;

/// Outcome of one blend.
#[derive(Debug, Clone, PartialEq)]
pub struct Blended {
    pub score: f64,
    /// Validation score actually used, after clamping.
    pub llm_score: Option<f64>,
    pub degraded: bool,
    pub flags: Vec<String>,
}

/// `0.6 * metadata + 0.4 * llm`, or `metadata` alone when validation is
/// unavailable.
pub fn blend(metadata: f64, validation: Result<ValidationReport, ValidationUnavailable>) -> Blended {
    let metadata = clamp_unit(metadata);

    let report = match validation {
        Ok(report) if report.score.is_finite() => report,
        Ok(report) => {
            warn!(score = report.score, "validator returned a non-finite score, falling back to metadata");
            return degraded(metadata);
        }
        Err(e) => {
            warn!(error = %e, "falling back to metadata score");
            return degraded(metadata);
        }
    };

    let llm = if (0.0..=1.0).contains(&report.score) {
        report.score
    } else {
        warn!(score = report.score, "validation score outside [0, 1], clamping");
        clamp_unit(report.score)
    };

    Blended {
        score: clamp_unit(METADATA_BLEND_WEIGHT * metadata + LLM_BLEND_WEIGHT * llm),
        llm_score: Some(llm),
        degraded: false,
        flags: report.flags,
    }
}

fn degraded(metadata: f64) -> Blended {
    Blended {
        score: metadata,
        llm_score: None,
        degraded: true,
        flags: Vec::new(),
    }
}

/// Validator that always reports the same score.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedScore {
    pub score: f64,
    pub flags: Vec<String>,
}

impl FixedScore {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            flags: Vec::new(),
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }
}

impl LlmValidator for FixedScore {
    fn validate(&self, _records: &RecordBundle) -> Result<ValidationReport, ValidationUnavailable> {
        Ok(ValidationReport {
            score: self.score,
            flags: self.flags.clone(),
        })
    }
}

/// Validator that is never reachable. Scoring runs in degraded mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unavailable {
    pub reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl LlmValidator for Unavailable {
    fn validate(&self, _records: &RecordBundle) -> Result<ValidationReport, ValidationUnavailable> {
        Err(ValidationUnavailable(self.reason.clone()))
    }
}
