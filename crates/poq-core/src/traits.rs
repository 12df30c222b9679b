//! Trait interfaces between the scoring core and its collaborators.
//!
//! - [`QualityScorer`]: category and metadata scoring (poq-score implements)
//! - [`LlmValidator`]: external semantic/authenticity validation, injected by
//!   the caller so the core stays testable without a live model call

use std::collections::BTreeMap;

use crate::error::{ScoringError, ValidationUnavailable};
use crate::types::{Category, CategoryRecord, RecordBundle, ValidationReport};

/// Pure computation of per-category and combined metadata scores.
pub trait QualityScorer: Send + Sync {
    /// Score one category's record in `[0, 1]`. Absent records score 0.
    fn category_score(&self, category: Category, record: &CategoryRecord) -> f64;

    /// Combine present categories' scores into one metadata score.
    ///
    /// Fails with [`ScoringError::InsufficientData`] when `scores` is empty.
    fn combine(&self, scores: &BTreeMap<Category, f64>) -> Result<f64, ScoringError>;

    /// Whether `record` carries usable data for `category`.
    ///
    /// Default: any metric holds a positive finite value. Implementations
    /// with per-category weights should only count weighted metrics.
    fn is_present(&self, _category: Category, record: &CategoryRecord) -> bool {
        !record.is_absent()
    }

    /// Scores for every present category in `bundle`.
    ///
    /// Default implementation delegates to [`category_score`](Self::category_score).
    fn present_scores(&self, bundle: &RecordBundle) -> BTreeMap<Category, f64> {
        bundle
            .iter()
            .filter(|(category, record)| self.is_present(**category, record))
            .map(|(category, record)| (*category, self.category_score(*category, record)))
            .collect()
    }

    /// Metadata score for a whole bundle.
    ///
    /// Default implementation: `combine(present_scores(bundle))`.
    fn metadata_score(&self, bundle: &RecordBundle) -> Result<f64, ScoringError> {
        self.combine(&self.present_scores(bundle))
    }
}

/// External validator producing a score in `[0, 1]` for a record bundle.
///
/// Implementations own their timeout; a failed or timed-out call returns
/// [`ValidationUnavailable`] and scoring continues in degraded mode.
pub trait LlmValidator: Send + Sync {
    fn validate(&self, records: &RecordBundle) -> Result<ValidationReport, ValidationUnavailable>;
}
