//! One-at-a-time sensitivity of the indirect footprint to the water
//! coefficients of a source group.
//!
//! The footprint is linear in W, so scaling a group's coefficients by `f`
//! moves the total by `(f − 1)` times that group's source contribution.
//! Contributions are computed once and reused for every scenario.

use serde::{Deserialize, Serialize};
use twf_core::{SectorClassifier, SourceGroup};
use twf_linalg::{Matrix, Vector};

use crate::direct::Scenario;
use crate::propagate::{check_intensity, source_contributions};
use crate::FootprintError;

/// Groups varied by default.
pub const DEFAULT_SENSITIVITY_GROUPS: [SourceGroup; 3] =
    [SourceGroup::Agriculture, SourceGroup::Electricity, SourceGroup::Petroleum];

/// Coefficient factor applied in each scenario.
pub const SENSITIVITY_FACTORS: [(Scenario, f64); 3] =
    [(Scenario::Low, 0.8), (Scenario::Base, 1.0), (Scenario::High, 1.2)];

/// Total footprint with one group's coefficients scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    /// Group varied.
    pub group: SourceGroup,
    /// Scenario.
    pub scenario: Scenario,
    /// Factor applied to the group's coefficients.
    pub factor: f64,
    /// Resulting total footprint, m³.
    pub total: f64,
}

/// Low/base/high totals for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRange {
    /// Group varied.
    pub group: SourceGroup,
    /// Total at factor 0.8.
    pub low: f64,
    /// Unperturbed total.
    pub base: f64,
    /// Total at factor 1.2.
    pub high: f64,
    /// `100 · (high − base) / base`, zero for a zero base.
    pub half_range_pct: f64,
    /// The three scenario rows.
    pub rows: Vec<SensitivityRow>,
}

/// Vary each group in `groups` by ±20%, holding the others at base.
pub fn sensitivity(
    w: &Vector,
    l: &Matrix,
    y: &Vector,
    classifier: &SectorClassifier,
    groups: &[SourceGroup],
) -> Result<Vec<SensitivityRange>, FootprintError> {
    check_intensity(w)?;
    let contributions = source_contributions(w, l, y)?;
    let base = contributions.sum();
    let n = w.len();

    let ranges = groups
        .iter()
        .map(|&group| {
            let mask = classifier.mask(group, n);
            let group_water: f64 = contributions
                .iter()
                .zip(&mask)
                .filter(|(_, m)| **m)
                .map(|(c, _)| c)
                .sum();
            let rows: Vec<SensitivityRow> = SENSITIVITY_FACTORS
                .iter()
                .map(|&(scenario, factor)| SensitivityRow {
                    group,
                    scenario,
                    factor,
                    total: base + (factor - 1.0) * group_water,
                })
                .collect();
            let low = rows[0].total;
            let high = rows[2].total;
            let half_range_pct = twf_core::numeric::pct_change(base, high).unwrap_or(0.0);
            tracing::debug!(%group, low, base, high, half_range_pct, "coefficient sensitivity");
            SensitivityRange {
                group,
                low,
                base,
                high,
                half_range_pct,
                rows,
            }
        })
        .collect();
    Ok(ranges)
}
