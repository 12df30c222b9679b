//! Per-network scoring tunables.
//!
//! A [`NetworkProfile`] is selected once per scoring call by a pure lookup on
//! [`NetworkKind`] and passed by value from then on. Mainnet uses a longer
//! half-life and a stricter recency boost; testnet lowers metric minimums and
//! rewards recent data more generously.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ScoringError;
use crate::types::Category;

/// Deployment profile selecting stricter or looser tunables.
///
/// # Examples
///
/// ```
/// use poq_core::network::NetworkKind;
/// assert_eq!("mainnet".parse::<NetworkKind>().unwrap(), NetworkKind::Mainnet);
/// assert!("devnet".parse::<NetworkKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Testnet,
    Mainnet,
}

impl NetworkKind {
    pub fn name(&self) -> &'static str {
        match self {
            NetworkKind::Testnet => "testnet",
            NetworkKind::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkKind {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(NetworkKind::Testnet),
            "mainnet" => Ok(NetworkKind::Mainnet),
            _ => Err(ScoringError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Tunables for one network. Immutable during a scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub network: NetworkKind,
    /// Age at which a record's recency weight falls to 50%.
    pub half_life_days: f64,
    /// Multiplier applied to every metric's reference minimum.
    pub min_threshold: f64,
    /// Slope of the logarithmic sub-score curve.
    pub growth_rate: f64,
    /// Largest additive bonus granted for dataset volume.
    pub volume_bonus_cap: f64,
    /// Ages up to this many days earn a recency boost.
    pub boost_window_days: f64,
    /// Boost at age zero, as a fraction (0.1 = +10%).
    pub boost_factor: f64,
    /// Category scores below this are reported as flagged.
    pub threshold_score: f64,
}

impl NetworkProfile {
    pub fn mainnet() -> Self {
        Self {
            network: NetworkKind::Mainnet,
            half_life_days: MAINNET_HALF_LIFE_DAYS,
            min_threshold: MAINNET_MIN_THRESHOLD,
            growth_rate: MAINNET_GROWTH_RATE,
            volume_bonus_cap: MAINNET_VOLUME_BONUS_CAP,
            boost_window_days: MAINNET_BOOST_WINDOW_DAYS,
            boost_factor: MAINNET_BOOST_FACTOR,
            threshold_score: MAINNET_THRESHOLD_SCORE,
        }
    }

    pub fn testnet() -> Self {
        Self {
            network: NetworkKind::Testnet,
            half_life_days: TESTNET_HALF_LIFE_DAYS,
            min_threshold: TESTNET_MIN_THRESHOLD,
            growth_rate: TESTNET_GROWTH_RATE,
            volume_bonus_cap: TESTNET_VOLUME_BONUS_CAP,
            boost_window_days: TESTNET_BOOST_WINDOW_DAYS,
            boost_factor: TESTNET_BOOST_FACTOR,
            threshold_score: TESTNET_THRESHOLD_SCORE,
        }
    }

    pub fn for_network(kind: NetworkKind) -> Self {
        match kind {
            NetworkKind::Mainnet => Self::mainnet(),
            NetworkKind::Testnet => Self::testnet(),
        }
    }

    /// Copy of this profile with any overridden fields replaced.
    ///
    /// The result is not validated; call [`validate`](Self::validate).
    pub fn with_overrides(mut self, overrides: &ScoringOverrides) -> Self {
        if let Some(v) = overrides.half_life_days {
            self.half_life_days = v;
        }
        if let Some(v) = overrides.min_threshold {
            self.min_threshold = v;
        }
        if let Some(v) = overrides.growth_rate {
            self.growth_rate = v;
        }
        if let Some(v) = overrides.volume_bonus_cap {
            self.volume_bonus_cap = v;
        }
        self
    }

    /// Check every bound so the transforms never see a zero divisor or NaN.
    pub fn validate(&self) -> Result<(), ScoringError> {
        fn positive(name: &str, v: f64) -> Result<(), ScoringError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ScoringError::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        }
        fn in_range(name: &str, v: f64, lo: f64, hi: f64) -> Result<(), ScoringError> {
            if v.is_finite() && (lo..=hi).contains(&v) {
                Ok(())
            } else {
                Err(ScoringError::InvalidConfig(format!(
                    "{name} must be in [{lo}, {hi}], got {v}"
                )))
            }
        }

        positive("half_life_days", self.half_life_days)?;
        positive("min_threshold", self.min_threshold)?;
        positive("growth_rate", self.growth_rate)?;
        in_range("volume_bonus_cap", self.volume_bonus_cap, 0.0, MAX_VOLUME_BONUS_CAP)?;
        in_range("boost_window_days", self.boost_window_days, 0.0, f64::MAX)?;
        in_range("boost_factor", self.boost_factor, 0.0, 1.0)?;
        in_range("threshold_score", self.threshold_score, 0.0, 1.0)?;
        Ok(())
    }
}

/// Optional caller overrides layered on top of a network's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringOverrides {
    #[serde(default)]
    pub half_life_days: Option<f64>,
    #[serde(default)]
    pub min_threshold: Option<f64>,
    #[serde(default)]
    pub growth_rate: Option<f64>,
    #[serde(default)]
    pub volume_bonus_cap: Option<f64>,
    /// Replaces individual entries of the default category-importance map.
    #[serde(default)]
    pub category_importance: Option<BTreeMap<Category, f64>>,
}
