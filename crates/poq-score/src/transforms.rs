//! Numeric primitives shared by every category scorer.
//!
//! All functions are total over `f64`: negative, zero, and non-finite inputs
//! map to 0 rather than erroring, and no output is ever NaN.
//!
//! The progressive scale is a fixed knot table evaluated with linear
//! interpolation, so every category lands in the same score bands:
//! small datasets in roughly `[0.4, 0.6]`, medium in `[0.6, 0.8]`, large
//! above `0.8`.

use poq_core::constants::VOLUME_SATURATION;

/// `(raw, scaled)` knots of the progressive scale, strictly increasing in both.
///
/// The first segment lifts any non-trivial dataset toward 0.4; the middle
/// segments compress the low end and spread the high end.
const SCALE_KNOTS: [(f64, f64); 5] = [
    (0.0, 0.0),
    (0.1, 0.4),
    (0.4, 0.6),
    (0.75, 0.8),
    (1.0, 1.0),
];

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Bounded logarithmic growth above a reference minimum.
///
/// `min(1, growth_rate * ln(1 + value / min_threshold))`, or 0 when
/// `value <= 0` or either parameter is not positive.
pub fn log_score(value: f64, min_threshold: f64, growth_rate: f64) -> f64 {
    if value.is_nan() || value <= 0.0 || min_threshold <= 0.0 || growth_rate <= 0.0 {
        return 0.0;
    }
    clamp_unit(growth_rate * (value / min_threshold).ln_1p())
}

/// Additive bonus for very large datasets, saturating at `cap`.
///
/// Grows with `ln(1 + value)` and reaches `cap` at [`VOLUME_SATURATION`]
/// records.
pub fn volume_bonus(value: f64, cap: f64) -> f64 {
    if value.is_nan() || value <= 0.0 || cap.is_nan() || cap <= 0.0 {
        return 0.0;
    }
    let fraction = (value.ln_1p() / VOLUME_SATURATION.ln_1p()).min(1.0);
    cap * fraction
}

/// Monotonic, continuous remap of a raw weighted score onto the score bands.
///
/// Input is clamped to `[0, 1]` first.
pub fn progressive_scale(raw: f64) -> f64 {
    let x = clamp_unit(raw);

    for pair in SCALE_KNOTS.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x < x1 {
            // min keeps rounding from overshooting the next knot
            return (y0 + (y1 - y0) * (x - x0) / (x1 - x0)).min(y1);
        }
    }
    SCALE_KNOTS[SCALE_KNOTS.len() - 1].1
}
