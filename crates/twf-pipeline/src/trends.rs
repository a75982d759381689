//! Year-over-year footprint tables.

use serde::{Deserialize, Serialize};
use twf_core::numeric::{pct_change, share_pct};

use crate::year::YearResult;

/// Indirect and direct footprint of one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotals {
    /// Study year label.
    pub year: String,
    /// Supply-chain water, m³.
    pub indirect_m3: f64,
    /// Base-scenario direct water, m³. Zero without activity data.
    pub direct_m3: f64,
    /// `indirect_m3 + direct_m3`.
    pub total_m3: f64,
    /// Share of the total that is indirect, percent.
    pub indirect_pct: f64,
    /// Share of the total that is direct, percent.
    pub direct_pct: f64,
}

impl YearTotals {
    fn of(result: &YearResult) -> Self {
        let indirect_m3 = result.propagation.total;
        let direct_m3 = result.direct.as_ref().map_or(0.0, |d| d.scenarios.base.total);
        let total_m3 = indirect_m3 + direct_m3;
        Self {
            year: result.year.label.clone(),
            indirect_m3,
            direct_m3,
            total_m3,
            indirect_pct: share_pct(indirect_m3, total_m3),
            direct_pct: share_pct(direct_m3, total_m3),
        }
    }
}

/// One year's water for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    /// Study year label.
    pub year: String,
    /// Category water, m³.
    pub water_m3: f64,
}

/// A category's footprint across every successful year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    /// Category identifier.
    pub category_id: String,
    /// Category name.
    pub category_name: String,
    /// One entry per successful year, in year order. A year without the
    /// category contributes zero.
    pub values: Vec<YearValue>,
    /// Change from the first to the last year, percent. `None` when the
    /// first year is zero.
    pub change_pct: Option<f64>,
}

impl CategoryTrend {
    /// Water in `year`, if the year is part of the trend.
    pub fn water_in(&self, year: &str) -> Option<f64> {
        self.values.iter().find(|v| v.year == year).map(|v| v.water_m3)
    }
}

/// Totals for each year, in year order.
pub fn year_totals(years: &[YearResult]) -> Vec<YearTotals> {
    years.iter().map(YearTotals::of).collect()
}

/// Per-category trends, largest absolute change first.
///
/// Categories are matched by id. Trends without a defined change sort
/// last, by name.
pub fn category_trends(years: &[YearResult]) -> Vec<CategoryTrend> {
    let mut trends: Vec<CategoryTrend> = Vec::new();
    for result in years {
        for footprint in &result.category_footprints {
            if !trends.iter().any(|t| t.category_id == footprint.category_id) {
                trends.push(CategoryTrend {
                    category_id: footprint.category_id.clone(),
                    category_name: footprint.category_name.clone(),
                    values: Vec::with_capacity(years.len()),
                    change_pct: None,
                });
            }
        }
    }

    for trend in &mut trends {
        trend.values = years
            .iter()
            .map(|result| YearValue {
                year: result.year.label.clone(),
                water_m3: result
                    .category_footprints
                    .iter()
                    .filter(|f| f.category_id == trend.category_id)
                    .map(|f| f.total_water)
                    .sum(),
            })
            .collect();
        trend.change_pct = match (trend.values.first(), trend.values.last()) {
            (Some(first), Some(last)) if trend.values.len() >= 2 => pct_change(first.water_m3, last.water_m3),
            _ => None,
        };
    }

    trends.sort_by(|a, b| match (a.change_pct, b.change_pct) {
        (Some(x), Some(y)) => y.abs().total_cmp(&x.abs()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.category_name.cmp(&b.category_name),
    });
    trends
}
