//! Core data types: categories, metrics, records, and the scoring result.
//!
//! Records arrive already extracted by the data-access layer; nothing in this
//! module parses raw export files.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;
use crate::error::ScoringError;
use crate::network::NetworkKind;

/// A class of user data scored independently.
///
/// Variant order is the canonical order used for packing scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RetailCartItems,
    DigitalItems,
    RetailOrderHistory,
    AudiblePurchaseHistory,
    AudibleLibrary,
    AudibleMembership,
    PrimeVideoHistory,
}

impl Category {
    /// Every category in canonical order.
    pub const ALL: [Category; 7] = [
        Category::RetailCartItems,
        Category::DigitalItems,
        Category::RetailOrderHistory,
        Category::AudiblePurchaseHistory,
        Category::AudibleLibrary,
        Category::AudibleMembership,
        Category::PrimeVideoHistory,
    ];

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::RetailCartItems => "Retail Cart Items",
            Category::DigitalItems => "Digital Items",
            Category::RetailOrderHistory => "Retail Order History",
            Category::AudiblePurchaseHistory => "Audible Purchase History",
            Category::AudibleLibrary => "Audible Library",
            Category::AudibleMembership => "Audible Membership",
            Category::PrimeVideoHistory => "Prime Video History",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a metric's raw value becomes a sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Count- or amount-like: logarithmic growth above a reference minimum.
    Count,
    /// Span of days covered; logarithmic, then weighted by recency.
    DateRange,
    /// Already a fraction in `[0, 1]`; used directly.
    Ratio,
}

/// Metric keys accepted in a [`CategoryRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ItemCount,
    OrderCount,
    PurchaseCount,
    BillingCount,
    SessionCount,
    UniqueProducts,
    UniqueTitles,
    TotalAmount,
    TotalHours,
    DateRangeDays,
    Websites,
    PaymentMethods,
    PurchaseTypes,
    Devices,
    ActiveRatio,
    DownloadedRatio,
    CompletionRatio,
    GiftRatio,
}

impl Metric {
    pub const ALL: [Metric; 18] = [
        Metric::ItemCount,
        Metric::OrderCount,
        Metric::PurchaseCount,
        Metric::BillingCount,
        Metric::SessionCount,
        Metric::UniqueProducts,
        Metric::UniqueTitles,
        Metric::TotalAmount,
        Metric::TotalHours,
        Metric::DateRangeDays,
        Metric::Websites,
        Metric::PaymentMethods,
        Metric::PurchaseTypes,
        Metric::Devices,
        Metric::ActiveRatio,
        Metric::DownloadedRatio,
        Metric::CompletionRatio,
        Metric::GiftRatio,
    ];

    /// Stable key used in record maps and config files.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::ItemCount => "item_count",
            Metric::OrderCount => "order_count",
            Metric::PurchaseCount => "purchase_count",
            Metric::BillingCount => "billing_count",
            Metric::SessionCount => "session_count",
            Metric::UniqueProducts => "unique_products",
            Metric::UniqueTitles => "unique_titles",
            Metric::TotalAmount => "total_amount",
            Metric::TotalHours => "total_hours",
            Metric::DateRangeDays => "date_range_days",
            Metric::Websites => "websites",
            Metric::PaymentMethods => "payment_methods",
            Metric::PurchaseTypes => "purchase_types",
            Metric::Devices => "devices",
            Metric::ActiveRatio => "active_ratio",
            Metric::DownloadedRatio => "downloaded_ratio",
            Metric::CompletionRatio => "completion_ratio",
            Metric::GiftRatio => "gift_ratio",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::DateRangeDays => MetricKind::DateRange,
            Metric::ActiveRatio
            | Metric::DownloadedRatio
            | Metric::CompletionRatio
            | Metric::GiftRatio => MetricKind::Ratio,
            _ => MetricKind::Count,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.key() == s)
            .ok_or_else(|| ScoringError::UnknownMetric(s.to_string()))
    }
}

/// One category's extracted metrics.
///
/// Keys are metric names (see [`Metric::key`]); unknown keys are carried but
/// ignored by the scorer and never make a category present. Missing keys
/// read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    /// Age in days of the most recent record, if known.
    #[serde(default)]
    pub latest_age_days: Option<f64>,
}

impl CategoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style metric setter.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.insert(metric.key().to_string(), value);
        self
    }

    pub fn with_latest_age_days(mut self, age_days: f64) -> Self {
        self.latest_age_days = Some(age_days);
        self
    }

    /// Set the latest-record age from timestamps. Timestamps after `now`
    /// count as age zero.
    pub fn with_latest_activity(mut self, latest: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let secs = (now - latest).num_seconds().max(0) as f64;
        self.latest_age_days = Some(secs / SECONDS_PER_DAY);
        self
    }

    /// Value for `metric`; missing and non-finite values read as zero.
    pub fn get(&self, metric: Metric) -> f64 {
        match self.metrics.get(metric.key()) {
            Some(v) if v.is_finite() => *v,
            _ => 0.0,
        }
    }

    /// True when no key at all carries a positive finite value. Presence for
    /// scoring is decided per category by the weight spec.
    pub fn is_absent(&self) -> bool {
        !self.metrics.values().any(|v| v.is_finite() && *v > 0.0)
    }
}

/// All categories supplied for one scoring call.
pub type RecordBundle = BTreeMap<Category, CategoryRecord>;

/// Output of an external LLM validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub score: f64,
    /// Per-item remarks raised by the validator.
    #[serde(default)]
    pub flags: Vec<String>,
}

impl ValidationReport {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            flags: Vec::new(),
        }
    }
}

/// Final result of one scoring invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoQResult {
    pub score: f64,
    pub category_scores: BTreeMap<Category, f64>,
    pub metadata_score: f64,
    /// `None` when validation was unavailable.
    pub llm_score: Option<f64>,
    pub network: NetworkKind,
    pub validation_degraded: bool,
    #[serde(default)]
    pub validation_flags: Vec<String>,
    /// Present categories scoring below the network's threshold score or
    /// holding a count or date-range metric below its reference minimum.
    #[serde(default)]
    pub flagged_categories: BTreeSet<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn category_order_matches_index() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn category_serde_snake_case() {
        let json = serde_json::to_string(&Category::PrimeVideoHistory).unwrap();
        assert_eq!(json, "\"prime_video_history\"");
    }

    #[test]
    fn metric_keys_roundtrip_through_from_str() {
        for m in Metric::ALL {
            assert_eq!(m.key().parse::<Metric>().unwrap(), m);
        }
        assert_eq!(
            "item_cnt".parse::<Metric>(),
            Err(ScoringError::UnknownMetric("item_cnt".into()))
        );
    }

    #[test]
    fn metric_kinds() {
        assert_eq!(Metric::DateRangeDays.kind(), MetricKind::DateRange);
        assert_eq!(Metric::GiftRatio.kind(), MetricKind::Ratio);
        assert_eq!(Metric::TotalHours.kind(), MetricKind::Count);
    }

    #[test]
    fn missing_metric_reads_zero() {
        let r = CategoryRecord::new().with(Metric::ItemCount, 4.0);
        assert_eq!(r.get(Metric::ItemCount), 4.0);
        assert_eq!(r.get(Metric::UniqueProducts), 0.0);
    }

    #[test]
    fn non_finite_metric_reads_zero() {
        let r = CategoryRecord::new().with(Metric::TotalAmount, f64::NAN);
        assert_eq!(r.get(Metric::TotalAmount), 0.0);
        assert!(r.is_absent());
    }

    #[test]
    fn absent_when_all_zero() {
        assert!(CategoryRecord::new().is_absent());
        let zeros = CategoryRecord::new()
            .with(Metric::ItemCount, 0.0)
            .with(Metric::ActiveRatio, 0.0);
        assert!(zeros.is_absent());
        assert!(!zeros.with(Metric::ActiveRatio, 0.5).is_absent());
    }

    #[test]
    fn latest_activity_sets_age() {
        let now = Utc::now();
        let r = CategoryRecord::new().with_latest_activity(now - Duration::days(10), now);
        let age = r.latest_age_days.unwrap();
        assert!((age - 10.0).abs() < 1e-9, "age {age}");
    }

    #[test]
    fn future_activity_is_age_zero() {
        let now = Utc::now();
        let r = CategoryRecord::new().with_latest_activity(now + Duration::days(3), now);
        assert_eq!(r.latest_age_days, Some(0.0));
    }

    #[test]
    fn record_deserializes_from_json() {
        let json = r#"{"metrics": {"item_count": 12, "active_ratio": 0.5}, "latest_age_days": 3}"#;
        let r: CategoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.get(Metric::ItemCount), 12.0);
        assert_eq!(r.latest_age_days, Some(3.0));
    }

    #[test]
    fn bundle_deserializes_with_category_keys() {
        let json = r#"{"audible_library": {"metrics": {"item_count": 3}}}"#;
        let b: RecordBundle = serde_json::from_str(json).unwrap();
        assert_eq!(b[&Category::AudibleLibrary].get(Metric::ItemCount), 3.0);
    }
}
