//! Single-category scoring.
//!
//! A category score is the weighted sum of its metric sub-scores plus a
//! volume bonus, pushed through the shared progressive scale. Which metrics
//! count, and how much, is decided entirely by the [`CategoryWeightSpec`].

use poq_core::network::NetworkProfile;
use poq_core::types::{CategoryRecord, MetricKind};

use crate::decay::TimeDecay;
use crate::transforms::{clamp_unit, log_score, progressive_scale, volume_bonus};
use crate::weights::{CategoryWeightSpec, WeightedMetric};

/// Stateless scorer for one category record.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryScorer;

impl CategoryScorer {
    /// Score `record` against `spec` under `profile`. Result is in `[0, 1]`;
    /// a record with no positive weighted metric scores 0.
    pub fn score(record: &CategoryRecord, spec: &CategoryWeightSpec, profile: &NetworkProfile) -> f64 {
        if !spec.is_present(record) {
            return 0.0;
        }
        let raw = Self::raw_score(record, spec, profile);
        progressive_scale(raw)
    }

    /// Weighted sum plus volume bonus, clamped to `[0, 1]`, before the
    /// progressive scale.
    pub fn raw_score(record: &CategoryRecord, spec: &CategoryWeightSpec, profile: &NetworkProfile) -> f64 {
        let decay = TimeDecay::from_profile(profile);

        let weighted: f64 = spec
            .metrics
            .iter()
            .map(|m| m.weight * Self::metric_score(m, record, profile, &decay))
            .sum();

        let bonus = volume_bonus(record.get(spec.primary_volume), profile.volume_bonus_cap);
        clamp_unit(weighted + bonus)
    }

    /// Sub-score in `[0, 1]` for one weighted metric.
    pub fn metric_score(
        m: &WeightedMetric,
        record: &CategoryRecord,
        profile: &NetworkProfile,
        decay: &TimeDecay,
    ) -> f64 {
        let value = record.get(m.metric);
        match m.metric.kind() {
            MetricKind::Ratio => clamp_unit(value),
            MetricKind::Count => log_score(value, m.reference * profile.min_threshold, profile.growth_rate),
            MetricKind::DateRange => {
                let base = log_score(value, m.reference * profile.min_threshold, profile.growth_rate);
                clamp_unit(base * decay.recency_multiplier(record.latest_age_days))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poq_core::types::{Category, Metric};
    use proptest::prelude::*;

    fn cart(count: f64, unique: f64) -> CategoryRecord {
        CategoryRecord::new()
            .with(Metric::ItemCount, count)
            .with(Metric::UniqueProducts, unique)
            .with(Metric::DateRangeDays, 30.0)
            .with(Metric::ActiveRatio, 0.9)
    }

    fn cart_score(record: &CategoryRecord) -> f64 {
        CategoryScorer::score(
            record,
            &CategoryWeightSpec::shipped(Category::RetailCartItems),
            &NetworkProfile::mainnet(),
        )
    }

    #[test]
    fn absent_record_scores_zero() {
        assert_eq!(cart_score(&CategoryRecord::new()), 0.0);
    }

    #[test]
    fn unknown_keys_score_zero() {
        let mut r = CategoryRecord::new();
        r.metrics.insert("item_cnt".into(), 40.0);
        assert_eq!(cart_score(&r), 0.0);
    }

    #[test]
    fn medium_cart_lands_in_medium_band() {
        let s = cart_score(&cart(50.0, 40.0));
        assert!((0.6..=0.8).contains(&s), "score {s}");
    }

    #[test]
    fn small_cart_lands_in_small_band() {
        let s = cart_score(&cart(5.0, 3.0));
        assert!((0.4..=0.6).contains(&s), "score {s}");
    }

    #[test]
    fn large_cart_scores_high() {
        let r = CategoryRecord::new()
            .with(Metric::ItemCount, 5_000.0)
            .with(Metric::UniqueProducts, 3_000.0)
            .with(Metric::DateRangeDays, 2_000.0)
            .with(Metric::ActiveRatio, 1.0)
            .with_latest_age_days(1.0);
        let s = cart_score(&r);
        assert!(s > 0.8, "score {s}");
    }

    #[test]
    fn ratio_above_one_is_clamped() {
        let a = cart_score(&cart(50.0, 40.0).with(Metric::ActiveRatio, 1.0));
        let b = cart_score(&cart(50.0, 40.0).with(Metric::ActiveRatio, 7.0));
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn unknown_age_scores_no_better_than_known() {
        let unknown = cart_score(&cart(50.0, 40.0));
        for age in [0.0, 15.0, 1_000.0, 1e6] {
            assert!(unknown <= cart_score(&cart(50.0, 40.0).with_latest_age_days(age)), "age {age}");
        }
    }

    #[test]
    fn stale_data_scores_lower() {
        let fresh = cart_score(&cart(50.0, 40.0).with_latest_age_days(1.0));
        let stale = cart_score(&cart(50.0, 40.0).with_latest_age_days(1_500.0));
        assert!(fresh > stale, "fresh {fresh} stale {stale}");
    }

    #[test]
    fn unweighted_metrics_are_ignored() {
        let base = cart_score(&cart(50.0, 40.0));
        let extra = cart_score(&cart(50.0, 40.0).with(Metric::TotalHours, 900.0));
        assert_eq!(base, extra);
    }

    #[test]
    fn testnet_is_more_lenient() {
        let spec = CategoryWeightSpec::shipped(Category::AudibleLibrary);
        let r = CategoryRecord::new()
            .with(Metric::ItemCount, 8.0)
            .with(Metric::UniqueTitles, 6.0);
        let main = CategoryScorer::score(&r, &spec, &NetworkProfile::mainnet());
        let test = CategoryScorer::score(&r, &spec, &NetworkProfile::testnet());
        assert!(test > main, "testnet {test} mainnet {main}");
    }

    proptest! {
        #[test]
        fn every_category_in_unit_range(
            idx in 0usize..7,
            count in 0f64..1e7,
            amount in 0f64..1e7,
            days in 0f64..1e5,
            ratio in -1f64..2.0,
            age in proptest::option::of(0f64..1e5),
        ) {
            let category = Category::ALL[idx];
            let mut r = CategoryRecord::new();
            for m in Metric::ALL {
                let v = match m.kind() {
                    MetricKind::Count if m == Metric::TotalAmount => amount,
                    MetricKind::Count => count,
                    MetricKind::DateRange => days,
                    MetricKind::Ratio => ratio,
                };
                r = r.with(m, v);
            }
            r.latest_age_days = age;
            for profile in [NetworkProfile::mainnet(), NetworkProfile::testnet()] {
                let s = CategoryScorer::score(&r, &CategoryWeightSpec::shipped(category), &profile);
                prop_assert!((0.0..=1.0).contains(&s), "{category}: {s}");
            }
        }

        #[test]
        fn monotonic_in_item_count(a in 0f64..1e5, b in 0f64..1e5) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(cart_score(&cart(lo, 10.0)) <= cart_score(&cart(hi, 10.0)));
        }

        #[test]
        fn monotonic_in_recency(a in 0f64..3000.0, b in 0f64..3000.0) {
            let (young, old) = if a <= b { (a, b) } else { (b, a) };
            let s_young = cart_score(&cart(20.0, 10.0).with_latest_age_days(young));
            let s_old = cart_score(&cart(20.0, 10.0).with_latest_age_days(old));
            prop_assert!(s_young >= s_old);
        }
    }
}
