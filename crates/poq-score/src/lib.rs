//! # poq-score
//! Proof-of-quality scoring engine.
//!
//! Turns a bundle of extracted per-category metrics into one score in
//! `[0, 1]`:
//! - **Transforms**: bounded logarithmic sub-scores above per-metric
//!   reference minimums, a saturating volume bonus, and a shared
//!   progressive scale that places small, medium and large datasets in
//!   fixed score bands.
//! - **Time decay**: date-range metrics are weighted by half-life decay and
//!   a short recency boost, both set per network.
//! - **Aggregation**: present categories are combined by importance weights
//!   renormalized over what the bundle actually contains.
//! - **Blending**: the metadata score is blended 60/40 with an external
//!   validation score, falling back to metadata alone when the validator is
//!   unavailable.
//!
//! All scoring is pure and synchronous.

pub mod aggregator;
pub mod blender;
pub mod category;
pub mod decay;
pub mod encoding;
pub mod engine;
pub mod transforms;
pub mod weights;

pub use aggregator::{aggregate, CategoryImportance};
pub use blender::{blend, FixedScore, Unavailable};
pub use category::CategoryScorer;
pub use decay::TimeDecay;
pub use engine::{compute_proof_of_quality, ScoringEngine};
pub use weights::CategoryWeightSpec;
