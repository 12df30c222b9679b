//! Cross-category combination into one metadata score.
//!
//! Only categories present in the bundle take part: their importance weights
//! are renormalized to sum to 1, so a bundle with two categories is not
//! penalized for the five it lacks.

use std::collections::BTreeMap;

use poq_core::error::ScoringError;
use poq_core::types::Category;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::transforms::clamp_unit;

/// Relative importance of each category in the metadata score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryImportance(BTreeMap<Category, f64>);

impl Default for CategoryImportance {
    /// Order history carries the most signal; Prime Video the least.
    fn default() -> Self {
        Self(BTreeMap::from([
            (Category::RetailCartItems, 1.5),
            (Category::DigitalItems, 1.5),
            (Category::RetailOrderHistory, 4.0),
            (Category::AudiblePurchaseHistory, 2.0),
            (Category::AudibleLibrary, 2.0),
            (Category::AudibleMembership, 1.5),
            (Category::PrimeVideoHistory, 1.0),
        ]))
    }
}

impl CategoryImportance {
    /// Every category weighted 1.0.
    pub fn equal() -> Self {
        Self(Category::ALL.iter().map(|c| (*c, 1.0)).collect())
    }

    /// Replace individual entries. Rejects negative or non-finite weights.
    pub fn with_overrides(mut self, overrides: &BTreeMap<Category, f64>) -> Result<Self, ScoringError> {
        for (category, weight) in overrides {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "importance for {category} must be non-negative, got {weight}"
                )));
            }
            self.0.insert(*category, *weight);
        }
        Ok(self)
    }

    /// Raw importance of `category`; unlisted categories weigh 0.
    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    /// Weights over `present`, renormalized to sum to 1.
    ///
    /// Falls back to equal weights when every present category has zero
    /// importance. Empty input yields an empty map.
    pub fn normalized_weights<I>(&self, present: I) -> BTreeMap<Category, f64>
    where
        I: IntoIterator<Item = Category>,
    {
        let raw: BTreeMap<Category, f64> = present.into_iter().map(|c| (c, self.get(c))).collect();
        if raw.is_empty() {
            return raw;
        }

        let total: f64 = raw.values().sum();
        if total > 0.0 {
            raw.into_iter().map(|(c, w)| (c, w / total)).collect()
        } else {
            warn!(categories = raw.len(), "all present categories have zero importance, using equal weights");
            let n = raw.len() as f64;
            raw.into_keys().map(|c| (c, 1.0 / n)).collect()
        }
    }
}

/// Importance-weighted mean of per-category scores, in `[0, 1]`.
///
/// `None` weights every category equally. Fails with
/// [`ScoringError::InsufficientData`] when `scores` is empty.
pub fn aggregate(
    scores: &BTreeMap<Category, f64>,
    importance: Option<&CategoryImportance>,
) -> Result<f64, ScoringError> {
    if scores.is_empty() {
        return Err(ScoringError::InsufficientData);
    }

    let equal = CategoryImportance::equal();
    let weights = importance.unwrap_or(&equal).normalized_weights(scores.keys().copied());

    let combined: f64 = scores
        .iter()
        .map(|(c, s)| weights.get(c).copied().unwrap_or(0.0) * clamp_unit(*s))
        .sum();
    Ok(clamp_unit(combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn empty_scores_are_insufficient() {
        assert_eq!(
            aggregate(&BTreeMap::new(), None),
            Err(ScoringError::InsufficientData)
        );
    }

    #[test]
    fn single_category_passes_through() {
        let scores = BTreeMap::from([(Category::AudibleLibrary, 0.42)]);
        let s = aggregate(&scores, Some(&CategoryImportance::default())).unwrap();
        assert!((s - 0.42).abs() < EPS);
    }

    #[test]
    fn two_of_seven_renormalize() {
        let w = CategoryImportance::default()
            .normalized_weights([Category::RetailOrderHistory, Category::PrimeVideoHistory]);
        assert_eq!(w.len(), 2);
        assert!((w.values().sum::<f64>() - 1.0).abs() < EPS);
        assert!((w[&Category::RetailOrderHistory] - 0.8).abs() < EPS);
        assert!((w[&Category::PrimeVideoHistory] - 0.2).abs() < EPS);
    }

    #[test]
    fn no_importance_means_equal_weights() {
        let scores = BTreeMap::from([(Category::RetailCartItems, 0.2), (Category::DigitalItems, 0.6)]);
        let s = aggregate(&scores, None).unwrap();
        assert!((s - 0.4).abs() < EPS);
    }

    #[test]
    fn zero_importance_falls_back_to_equal() {
        let zeros = BTreeMap::from([(Category::RetailCartItems, 0.0), (Category::DigitalItems, 0.0)]);
        let imp = CategoryImportance::default().with_overrides(&zeros).unwrap();
        let scores = BTreeMap::from([(Category::RetailCartItems, 0.2), (Category::DigitalItems, 0.6)]);
        let s = aggregate(&scores, Some(&imp)).unwrap();
        assert!((s - 0.4).abs() < EPS);
    }

    #[test]
    fn overrides_replace_single_entries() {
        let imp = CategoryImportance::default()
            .with_overrides(&BTreeMap::from([(Category::PrimeVideoHistory, 4.0)]))
            .unwrap();
        assert_eq!(imp.get(Category::PrimeVideoHistory), 4.0);
        assert_eq!(imp.get(Category::RetailOrderHistory), 4.0);
        assert_eq!(imp.get(Category::DigitalItems), 1.5);
    }

    #[test]
    fn negative_override_rejected() {
        let bad = BTreeMap::from([(Category::DigitalItems, -1.0)]);
        assert!(matches!(
            CategoryImportance::default().with_overrides(&bad),
            Err(ScoringError::InvalidConfig(_))
        ));
    }

    #[test]
    fn importance_deserializes_as_plain_map() {
        let imp: CategoryImportance =
            serde_json::from_str(r#"{"digital_items": 2.5, "audible_library": 1.0}"#).unwrap();
        assert_eq!(imp.get(Category::DigitalItems), 2.5);
        assert_eq!(imp.get(Category::RetailCartItems), 0.0);
    }

    proptest! {
        #[test]
        fn aggregate_in_unit_range(
            scores in proptest::collection::btree_map(0usize..7, 0f64..=1.0, 1..=7)
        ) {
            let scores: BTreeMap<Category, f64> =
                scores.into_iter().map(|(i, s)| (Category::ALL[i], s)).collect();
            let s = aggregate(&scores, Some(&CategoryImportance::default())).unwrap();
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn normalized_weights_sum_to_one(mask in 1u8..128) {
            let present: Vec<Category> = Category::ALL
                .iter()
                .copied()
                .filter(|c| mask & (1 << c.index()) != 0)
                .collect();
            let w = CategoryImportance::default().normalized_weights(present);
            prop_assert!((w.values().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}
