//! Per-category metric weights and reference minimums.
//!
//! Every category is scored as a weighted sum of metric sub-scores. The
//! shipped tables are static and must each sum to 1.0; custom specs go through
//! the same [`CategoryWeightSpec::validate`] check and are never renormalized.

use std::collections::{BTreeMap, BTreeSet};

use poq_core::constants::WEIGHT_SUM_TOLERANCE;
use poq_core::error::ScoringError;
use poq_core::types::{Category, CategoryRecord, Metric, MetricKind};
use serde::{Deserialize, Serialize};

/// One metric's contribution to a category score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedMetric {
    pub metric: Metric,
    pub weight: f64,
    /// Reference minimum on the mainnet scale, multiplied by the profile's
    /// `min_threshold`. Ignored for ratio metrics.
    #[serde(default)]
    pub reference: f64,
}

const fn wm(metric: Metric, weight: f64, reference: f64) -> WeightedMetric {
    WeightedMetric {
        metric,
        weight,
        reference,
    }
}

/// Weights for a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeightSpec {
    pub category: Category,
    pub metrics: Vec<WeightedMetric>,
    /// Metric whose raw value feeds the volume bonus.
    pub primary_volume: Metric,
}

// --- Shipped tables ---

const RETAIL_CART: [WeightedMetric; 4] = [
    wm(Metric::ItemCount, 0.40, 10.0),
    wm(Metric::UniqueProducts, 0.30, 10.0),
    wm(Metric::DateRangeDays, 0.20, 30.0),
    wm(Metric::ActiveRatio, 0.10, 0.0),
];

const DIGITAL_ITEMS: [WeightedMetric; 3] = [
    wm(Metric::ItemCount, 0.30, 10.0),
    wm(Metric::UniqueProducts, 0.30, 10.0),
    wm(Metric::TotalAmount, 0.40, 50.0),
];

const RETAIL_ORDERS: [WeightedMetric; 8] = [
    wm(Metric::OrderCount, 0.20, 20.0),
    wm(Metric::TotalAmount, 0.20, 500.0),
    wm(Metric::UniqueProducts, 0.20, 20.0),
    wm(Metric::DateRangeDays, 0.10, 180.0),
    wm(Metric::Websites, 0.10, 1.0),
    wm(Metric::PaymentMethods, 0.10, 1.0),
    wm(Metric::CompletionRatio, 0.05, 0.0),
    wm(Metric::GiftRatio, 0.05, 0.0),
];

const AUDIBLE_PURCHASES: [WeightedMetric; 5] = [
    wm(Metric::PurchaseCount, 0.25, 10.0),
    wm(Metric::TotalAmount, 0.30, 100.0),
    wm(Metric::UniqueTitles, 0.25, 10.0),
    wm(Metric::DateRangeDays, 0.10, 90.0),
    wm(Metric::PurchaseTypes, 0.10, 2.0),
];

const AUDIBLE_LIBRARY: [WeightedMetric; 4] = [
    wm(Metric::ItemCount, 0.40, 10.0),
    wm(Metric::UniqueTitles, 0.30, 10.0),
    wm(Metric::DateRangeDays, 0.20, 90.0),
    wm(Metric::DownloadedRatio, 0.10, 0.0),
];

const AUDIBLE_MEMBERSHIP: [WeightedMetric; 3] = [
    wm(Metric::BillingCount, 0.40, 6.0),
    wm(Metric::TotalAmount, 0.40, 60.0),
    wm(Metric::DateRangeDays, 0.20, 180.0),
];

const PRIME_VIDEO: [WeightedMetric; 5] = [
    wm(Metric::SessionCount, 0.25, 20.0),
    wm(Metric::TotalHours, 0.25, 10.0),
    wm(Metric::UniqueTitles, 0.25, 10.0),
    wm(Metric::DateRangeDays, 0.15, 60.0),
    wm(Metric::Devices, 0.10, 2.0),
];

impl CategoryWeightSpec {
    /// The shipped spec for `category`.
    pub fn shipped(category: Category) -> Self {
        let (metrics, primary_volume): (&[WeightedMetric], Metric) = match category {
            Category::RetailCartItems => (&RETAIL_CART, Metric::ItemCount),
            Category::DigitalItems => (&DIGITAL_ITEMS, Metric::ItemCount),
            Category::RetailOrderHistory => (&RETAIL_ORDERS, Metric::OrderCount),
            Category::AudiblePurchaseHistory => (&AUDIBLE_PURCHASES, Metric::PurchaseCount),
            Category::AudibleLibrary => (&AUDIBLE_LIBRARY, Metric::ItemCount),
            Category::AudibleMembership => (&AUDIBLE_MEMBERSHIP, Metric::BillingCount),
            Category::PrimeVideoHistory => (&PRIME_VIDEO, Metric::SessionCount),
        };
        Self {
            category,
            metrics: metrics.to_vec(),
            primary_volume,
        }
    }

    /// Sum of all metric weights.
    pub fn total_weight(&self) -> f64 {
        self.metrics.iter().map(|m| m.weight).sum()
    }

    /// True when some weighted metric of `record` is positive.
    ///
    /// Keys the spec does not weigh, including misspelled ones, never make a
    /// category present.
    pub fn is_present(&self, record: &CategoryRecord) -> bool {
        self.metrics.iter().any(|m| record.get(m.metric) > 0.0)
    }

    /// Count and date-range metrics of `record` below their reference
    /// minimum scaled by `min_threshold`. Ratios have no minimum.
    pub fn shortfalls(&self, record: &CategoryRecord, min_threshold: f64) -> Vec<Metric> {
        self.metrics
            .iter()
            .filter(|m| m.metric.kind() != MetricKind::Ratio)
            .filter(|m| record.get(m.metric) < m.reference * min_threshold)
            .map(|m| m.metric)
            .collect()
    }

    /// Check invariants.
    ///
    /// Weights must be finite and non-negative, sum to 1.0 within
    /// [`WEIGHT_SUM_TOLERANCE`], and name each metric at most once. Count and
    /// date-range metrics need a positive reference.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let invalid = |reason: String| ScoringError::InvalidWeightSpec {
            category: self.category,
            reason,
        };

        if self.metrics.is_empty() {
            return Err(invalid("no metrics".into()));
        }

        let mut seen = BTreeSet::new();
        for m in &self.metrics {
            if !m.weight.is_finite() || m.weight < 0.0 {
                return Err(invalid(format!("weight for {} is {}", m.metric, m.weight)));
            }
            if !seen.insert(m.metric) {
                return Err(invalid(format!("duplicate metric {}", m.metric)));
            }
            if m.metric.kind() != MetricKind::Ratio && !(m.reference.is_finite() && m.reference > 0.0)
            {
                return Err(invalid(format!(
                    "reference for {} must be positive, got {}",
                    m.metric, m.reference
                )));
            }
        }

        let total = self.total_weight();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!("weights sum to {total}, expected 1.0")));
        }

        if self.primary_volume.kind() != MetricKind::Count {
            return Err(invalid(format!(
                "primary volume metric {} is not a count",
                self.primary_volume
            )));
        }
        Ok(())
    }
}

/// Shipped specs for every category, keyed by category.
pub fn shipped_specs() -> BTreeMap<Category, CategoryWeightSpec> {
    Category::ALL
        .iter()
        .map(|c| (*c, CategoryWeightSpec::shipped(*c)))
        .collect()
}
