//! Percentiles and rank correlation over draw vectors.

use serde::{Deserialize, Serialize};

use crate::MonteCarloError;

/// Percentile of `values` with linear interpolation between order
/// statistics. `p` is in percent. `None` for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// The 5/25/50/75/95 percentile band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl Percentiles {
    /// Band of a non-empty sample.
    pub fn of(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            p5: percentile_sorted(&sorted, 5.0)?,
            p25: percentile_sorted(&sorted, 25.0)?,
            p50: percentile_sorted(&sorted, 50.0)?,
            p75: percentile_sorted(&sorted, 75.0)?,
            p95: percentile_sorted(&sorted, 95.0)?,
        })
    }

    /// `100 · (p95 − p5) / p50`, `None` for a zero median.
    pub fn range_pct(&self) -> Option<f64> {
        (self.p50 != 0.0).then(|| 100.0 * (self.p95 - self.p5) / self.p50)
    }
}

/// 1-based ranks, ties sharing their average rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    (var_a > 0.0 && var_b > 0.0).then(|| cov / (var_a.sqrt() * var_b.sqrt()))
}

/// Spearman rank correlation, `None` when either series is constant.
pub fn spearman(a: &[f64], b: &[f64]) -> Result<Option<f64>, MonteCarloError> {
    if a.len() != b.len() {
        return Err(MonteCarloError::UnpairedSeries {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.len() < 2 {
        return Err(MonteCarloError::TooFewDraws { got: a.len() });
    }
    Ok(pearson(&average_ranks(a), &average_ranks(b)))
}
