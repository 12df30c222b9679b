//! Recency weighting for date-range metrics.
//!
//! Exponential half-life decay multiplied by a linear recency boost for very
//! fresh data. Half-life and boost window come from the active
//! [`NetworkProfile`]; this is the only place network identity affects time
//! handling.

use std::f64::consts::LN_2;

use poq_core::network::NetworkProfile;

/// Recency weight in `(0, 1]`: `exp(-ln2 * age / half_life)`.
///
/// Ages at or below zero weigh 1.0. A non-positive half-life is rejected at
/// config validation; here it degrades to "no decay".
pub fn decay_weight(age_days: f64, half_life_days: f64) -> f64 {
    if age_days.is_nan() || age_days <= 0.0 || half_life_days.is_nan() || half_life_days <= 0.0 {
        return 1.0;
    }
    // exp underflows to 0 for astronomically old data; keep the range open at 0
    (-LN_2 * age_days / half_life_days).exp().max(f64::MIN_POSITIVE)
}

/// Extra credit for very recent data.
///
/// `factor` at age zero, falling linearly to 0 at `window_days`; 0 beyond the
/// window.
pub fn recency_boost(age_days: f64, window_days: f64, factor: f64) -> f64 {
    if age_days.is_nan() || window_days <= 0.0 || factor <= 0.0 || age_days > window_days {
        return 0.0;
    }
    let age = age_days.max(0.0);
    factor * (1.0 - age / window_days)
}

/// Decay parameters taken from one [`NetworkProfile`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDecay {
    pub half_life_days: f64,
    pub boost_window_days: f64,
    pub boost_factor: f64,
}

impl TimeDecay {
    pub fn from_profile(profile: &NetworkProfile) -> Self {
        Self {
            half_life_days: profile.half_life_days,
            boost_window_days: profile.boost_window_days,
            boost_factor: profile.boost_factor,
        }
    }

    /// Multiplier for a date-range sub-score given the latest record's age.
    ///
    /// Unknown age earns no recency credit: the multiplier is 0, below that
    /// of any known age.
    pub fn recency_multiplier(&self, latest_age_days: Option<f64>) -> f64 {
        match latest_age_days {
            Some(age) if !age.is_nan() => {
                decay_weight(age, self.half_life_days)
                    * (1.0 + recency_boost(age, self.boost_window_days, self.boost_factor))
            }
            _ => 0.0,
        }
    }
}
