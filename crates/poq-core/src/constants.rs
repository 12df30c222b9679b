//! Scoring constants shared by every crate in the workspace.
//!
//! Network-dependent tunables live in [`crate::network`]; the values here are
//! fixed for all networks.

/// Weight of the metadata score in the final blend.
pub const METADATA_BLEND_WEIGHT: f64 = 0.6;

/// Weight of the LLM validation score in the final blend.
pub const LLM_BLEND_WEIGHT: f64 = 0.4;

/// Allowed deviation of a category weight spec's sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Record count at which the volume bonus saturates at its cap.
pub const VOLUME_SATURATION: f64 = 10_000.0;

/// Upper bound accepted for a profile's volume bonus cap.
pub const MAX_VOLUME_BONUS_CAP: f64 = 0.25;

/// Largest quantized score value in the packed score format.
pub const QUANTIZED_SCORE_MAX: u8 = 255;

/// Prefix for environment variables read by the CLI configuration layer.
pub const ENV_PREFIX: &str = "POQ";

/// Seconds per day, for converting timestamp differences to ages.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// --- Mainnet defaults ---

pub const MAINNET_HALF_LIFE_DAYS: f64 = 730.0;
pub const MAINNET_MIN_THRESHOLD: f64 = 1.0;
pub const MAINNET_GROWTH_RATE: f64 = 0.30;
pub const MAINNET_VOLUME_BONUS_CAP: f64 = 0.05;
pub const MAINNET_BOOST_WINDOW_DAYS: f64 = 14.0;
pub const MAINNET_BOOST_FACTOR: f64 = 0.10;
pub const MAINNET_THRESHOLD_SCORE: f64 = 0.15;

// --- Testnet defaults ---

pub const TESTNET_HALF_LIFE_DAYS: f64 = 365.0;
pub const TESTNET_MIN_THRESHOLD: f64 = 0.5;
pub const TESTNET_GROWTH_RATE: f64 = 0.35;
pub const TESTNET_VOLUME_BONUS_CAP: f64 = 0.10;
pub const TESTNET_BOOST_WINDOW_DAYS: f64 = 30.0;
pub const TESTNET_BOOST_FACTOR: f64 = 0.20;
pub const TESTNET_THRESHOLD_SCORE: f64 = 0.10;
