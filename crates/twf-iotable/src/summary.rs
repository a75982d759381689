//! Headline numbers for one year's IO table, for cross-year comparison.

use serde::{Deserialize, Serialize};
use twf_linalg::col_sums;

use crate::IoTable;

/// Per-year IO summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoSummary {
    /// Study year label.
    pub year: String,
    /// Number of products.
    pub n_products: usize,
    /// `sum(x)`.
    pub total_output: f64,
    /// `sum(Z)`.
    pub total_intermediate: f64,
    /// `sum(y)`.
    pub total_final_demand: f64,
    /// `100 · max|x − (colsum(Z) + y)| / max(x)`.
    pub balance_error_pct: f64,
    /// CPI deflator against the base year.
    pub deflator: f64,
    /// `sum(x) / deflator`.
    pub real_total_output: f64,
    /// ρ(A), if computed.
    pub spectral_radius: Option<f64>,
    /// Whether L is a pseudo-inverse.
    pub pseudo_inverse: bool,
}

impl IoSummary {
    /// Summarise a built table.
    pub fn from_table(year: impl Into<String>, table: &IoTable, deflator: f64) -> Self {
        let balance = col_sums(&table.z) + &table.y;
        let max_gap = table
            .x
            .iter()
            .zip(balance.iter())
            .fold(0.0_f64, |acc, (x, b)| acc.max((x - b).abs()));
        let max_x = table.x.iter().copied().fold(0.0_f64, f64::max);
        let balance_error_pct = if max_x > 0.0 { 100.0 * max_gap / max_x } else { 0.0 };
        let total_output = table.x.sum();

        Self {
            year: year.into(),
            n_products: table.n_products(),
            total_output,
            total_intermediate: table.z.sum(),
            total_final_demand: table.y.sum(),
            balance_error_pct,
            deflator,
            real_total_output: total_output / deflator,
            spectral_radius: table.validation.spectral.value(),
            pseudo_inverse: table.inversion.is_degraded(),
        }
    }
}
