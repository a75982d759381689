//! # Safe Division
//!
//! Structurally absent products have zero gross output. Dividing by that
//! output would blow up the market-share and coefficient matrices, so every
//! denominator below a small floor is replaced by `1.0` before dividing.
//! The replacement is a documented floor, not an economic value: the
//! numerator of such a row or column is zero as well, so the result is zero.
//!
//! All call sites in the workspace go through [`floor_denominator`] with the
//! floor taken from [`crate::Tolerances::safe_divide_floor`].

/// Replace `value` with `1.0` when it is below `floor`.
///
/// Negative values are below every positive floor and are clamped too.
#[inline]
pub fn floor_denominator(value: f64, floor: f64) -> f64 {
    if value < floor {
        1.0
    } else {
        value
    }
}

/// Apply [`floor_denominator`] to every element.
pub fn floor_all(values: &[f64], floor: f64) -> Vec<f64> {
    values.iter().map(|&v| floor_denominator(v, floor)).collect()
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
#[inline]
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Percentage share of `part` in `whole`, or `0.0` for an empty whole.
#[inline]
pub fn share_pct(part: f64, whole: f64) -> f64 {
    100.0 * ratio_or_zero(part, whole)
}

/// Relative deviation `100 * |actual - expected| / |expected|`.
///
/// Returns `None` when `expected` is zero; there is no meaningful relative
/// error against a zero reference.
pub fn pct_deviation(actual: f64, expected: f64) -> Option<f64> {
    if expected == 0.0 {
        None
    } else {
        Some(100.0 * (actual - expected).abs() / expected.abs())
    }
}

/// Signed percentage change from `base` to `current`, `None` for a zero base.
pub fn pct_change(base: f64, current: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some(100.0 * (current - base) / base)
    }
}
