//! Scoring engine implementing the [`QualityScorer`] trait.
//!
//! A [`ScoringEngine`] holds one validated configuration: the resolved
//! network profile, a weight spec per category, and the category importance
//! map. It is immutable and `Send + Sync`, so one engine can score many
//! bundles from many threads. [`compute_proof_of_quality`] is the one-shot
//! entry point built on top of it.

use std::collections::{BTreeMap, BTreeSet};

use poq_core::error::ScoringError;
use poq_core::network::{NetworkKind, NetworkProfile, ScoringOverrides};
use poq_core::traits::{LlmValidator, QualityScorer};
use poq_core::types::{Category, CategoryRecord, PoQResult, RecordBundle};
use tracing::{debug, info, warn};

use crate::aggregator::{aggregate, CategoryImportance};
use crate::blender::blend;
use crate::category::CategoryScorer;
use crate::weights::{shipped_specs, CategoryWeightSpec};

/// Validated scoring configuration for one network.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    profile: NetworkProfile,
    specs: BTreeMap<Category, CategoryWeightSpec>,
    importance: CategoryImportance,
}

impl ScoringEngine {
    /// Resolve `network` defaults with `overrides` and validate the result.
    ///
    /// Uses the shipped weight specs; see [`with_weight_specs`](Self::with_weight_specs).
    pub fn new(network: NetworkKind, overrides: &ScoringOverrides) -> Result<Self, ScoringError> {
        let profile = NetworkProfile::for_network(network).with_overrides(overrides);
        profile.validate()?;

        let importance = match &overrides.category_importance {
            Some(map) => CategoryImportance::default().with_overrides(map)?,
            None => CategoryImportance::default(),
        };

        let specs = shipped_specs();
        for spec in specs.values() {
            spec.validate()?;
        }

        debug!(%network, ?profile, "scoring engine configured");
        Ok(Self {
            profile,
            specs,
            importance,
        })
    }

    /// Replace the weight specs of the categories named in `specs`.
    ///
    /// Each spec is validated as given; none are renormalized.
    pub fn with_weight_specs<I>(mut self, specs: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = CategoryWeightSpec>,
    {
        for spec in specs {
            spec.validate()?;
            self.specs.insert(spec.category, spec);
        }
        Ok(self)
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    pub fn importance(&self) -> &CategoryImportance {
        &self.importance
    }

    pub fn weight_spec(&self, category: Category) -> Option<&CategoryWeightSpec> {
        self.specs.get(&category)
    }

    /// Present categories scoring below the threshold score or holding a
    /// count or date-range metric below its scaled reference minimum.
    fn flagged(&self, records: &RecordBundle, scores: &BTreeMap<Category, f64>) -> BTreeSet<Category> {
        scores
            .iter()
            .filter(|(category, score)| {
                if **score < self.profile.threshold_score {
                    return true;
                }
                let (Some(spec), Some(record)) = (self.specs.get(*category), records.get(*category)) else {
                    return false;
                };
                let short = spec.shortfalls(record, self.profile.min_threshold);
                if !short.is_empty() {
                    debug!(%category, ?short, "metrics below reference minimum");
                }
                !short.is_empty()
            })
            .map(|(category, _)| *category)
            .collect()
    }

    /// Score a bundle and blend with one call to `validator`.
    ///
    /// Fails with [`ScoringError::InsufficientData`] when no category is
    /// present. Validator failures never fail the call.
    pub fn score(
        &self,
        records: &RecordBundle,
        validator: &dyn LlmValidator,
    ) -> Result<PoQResult, ScoringError> {
        let category_scores = self.present_scores(records);
        for (category, score) in &category_scores {
            debug!(%category, score, "category scored");
        }

        let metadata_score = self.combine(&category_scores)?;
        let blended = blend(metadata_score, validator.validate(records));

        let flagged_categories = self.flagged(records, &category_scores);
        if !flagged_categories.is_empty() {
            warn!(
                count = flagged_categories.len(),
                threshold = self.profile.threshold_score,
                "categories below quality threshold"
            );
        }

        info!(
            network = %self.profile.network,
            score = blended.score,
            metadata_score,
            llm_score = ?blended.llm_score,
            degraded = blended.degraded,
            categories = category_scores.len(),
            "proof of quality computed"
        );

        Ok(PoQResult {
            score: blended.score,
            category_scores,
            metadata_score,
            llm_score: blended.llm_score,
            network: self.profile.network,
            validation_degraded: blended.degraded,
            validation_flags: blended.flags,
            flagged_categories,
        })
    }
}

impl QualityScorer for ScoringEngine {
    fn is_present(&self, category: Category, record: &CategoryRecord) -> bool {
        self.specs
            .get(&category)
            .is_some_and(|spec| spec.is_present(record))
    }

    fn category_score(&self, category: Category, record: &CategoryRecord) -> f64 {
        match self.specs.get(&category) {
            Some(spec) => CategoryScorer::score(record, spec, &self.profile),
            None => 0.0,
        }
    }

    fn combine(&self, scores: &BTreeMap<Category, f64>) -> Result<f64, ScoringError> {
        aggregate(scores, Some(&self.importance))
    }
}

/// Score `records` on the network named `network`.
///
/// The network name is required; no default is assumed.
pub fn compute_proof_of_quality(
    records: &RecordBundle,
    validator: &dyn LlmValidator,
    network: &str,
    overrides: Option<&ScoringOverrides>,
) -> Result<PoQResult, ScoringError> {
    let kind: NetworkKind = network.parse()?;
    let default_overrides = ScoringOverrides::default();
    let engine = ScoringEngine::new(kind, overrides.unwrap_or(&default_overrides))?;
    engine.score(records, validator)
}
