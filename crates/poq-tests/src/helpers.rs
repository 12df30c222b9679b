//! Shared record and bundle builders for integration tests.

use poq_core::network::{NetworkKind, ScoringOverrides};
use poq_core::types::{Category, CategoryRecord, Metric, RecordBundle};
use poq_score::engine::ScoringEngine;

/// Retail cart record with the given volume metrics, a 30-day range and a
/// 0.9 active ratio.
pub fn cart(count: f64, unique: f64) -> CategoryRecord {
    CategoryRecord::new()
        .with(Metric::ItemCount, count)
        .with(Metric::UniqueProducts, unique)
        .with(Metric::DateRangeDays, 30.0)
        .with(Metric::ActiveRatio, 0.9)
}

/// Retail order history with `orders` orders spread over `days` days.
pub fn orders(orders: f64, days: f64) -> CategoryRecord {
    CategoryRecord::new()
        .with(Metric::OrderCount, orders)
        .with(Metric::TotalAmount, orders * 35.0)
        .with(Metric::UniqueProducts, orders * 0.8)
        .with(Metric::DateRangeDays, days)
        .with(Metric::Websites, 1.0)
        .with(Metric::PaymentMethods, 2.0)
        .with(Metric::CompletionRatio, 0.95)
        .with(Metric::GiftRatio, 0.1)
}

/// Prime Video history with `sessions` viewing sessions.
pub fn prime_video(sessions: f64) -> CategoryRecord {
    CategoryRecord::new()
        .with(Metric::SessionCount, sessions)
        .with(Metric::TotalHours, sessions * 1.5)
        .with(Metric::UniqueTitles, sessions * 0.6)
        .with(Metric::DateRangeDays, 120.0)
        .with(Metric::Devices, 2.0)
}

/// A record with every metric set to `value`.
pub fn uniform(value: f64) -> CategoryRecord {
    Metric::ALL
        .iter()
        .fold(CategoryRecord::new(), |r, m| r.with(*m, value))
}

/// Bundle with every category populated by `uniform(value)`.
pub fn full_bundle(value: f64) -> RecordBundle {
    Category::ALL.iter().map(|c| (*c, uniform(value))).collect()
}

/// Engine with shipped defaults for `network`.
pub fn engine(network: NetworkKind) -> ScoringEngine {
    ScoringEngine::new(network, &ScoringOverrides::default())
        .expect("shipped configuration is valid")
}
