//! # Category Water Intensity
//!
//! [`category_footprints`] sums per-product results over each category's
//! products. [`category_intensity`] turns those sums into m³ per crore of
//! tourism spending, the category's share of spending, and a weighted
//! impact score `intensity × share`. Categories without demand have no
//! intensity and are left out.

use serde::{Deserialize, Serialize};
use twf_core::numeric::share_pct;
use twf_core::sector::product_index;
use twf_core::DemandCategory;
use twf_linalg::Vector;

use crate::Propagation;

/// Footprint summed over one category's products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFootprint {
    /// Category identifier.
    pub category_id: String,
    /// Category name.
    pub category_name: String,
    /// Broad category type.
    pub category_type: String,
    /// Tourism demand on the category's products, crore.
    pub demand: f64,
    /// Total water, m³.
    pub total_water: f64,
    /// Part of `total_water` that travelled through supply chains, m³.
    pub supply_chain_water: f64,
}

/// Water intensity of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryIntensity {
    /// Category identifier.
    pub category_id: String,
    /// Category name.
    pub category_name: String,
    /// Tourism demand, crore.
    pub demand: f64,
    /// Total water, m³.
    pub total_water: f64,
    /// m³ per crore.
    pub intensity: f64,
    /// Share of demand among categories with demand, percent.
    pub demand_share_pct: f64,
    /// `intensity × demand_share_pct`.
    pub weighted_impact: f64,
}

/// Per-category sums, largest total water first.
pub fn category_footprints(
    propagation: &Propagation,
    y: &Vector,
    categories: &[DemandCategory],
) -> Vec<CategoryFootprint> {
    let n = y.len();
    let mut rows: Vec<CategoryFootprint> = categories
        .iter()
        .map(|c| {
            let idx: Vec<usize> = c.products.iter().filter_map(|&p| product_index(p, n)).collect();
            CategoryFootprint {
                category_id: c.id.clone(),
                category_name: c.name.clone(),
                category_type: c.category_type.clone(),
                demand: idx.iter().map(|&i| y[i]).sum(),
                total_water: idx.iter().map(|&i| propagation.twf[i]).sum(),
                supply_chain_water: idx.iter().map(|&i| propagation.supply_chain_water[i]).sum(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total_water.total_cmp(&a.total_water));
    rows
}

/// Intensities for categories with positive demand, most intensive first.
pub fn category_intensity(footprints: &[CategoryFootprint]) -> Vec<CategoryIntensity> {
    let with_demand: Vec<&CategoryFootprint> = footprints.iter().filter(|f| f.demand > 0.0).collect();
    let total_demand: f64 = with_demand.iter().map(|f| f.demand).sum();

    let mut rows: Vec<CategoryIntensity> = with_demand
        .into_iter()
        .map(|f| {
            let intensity = f.total_water / f.demand;
            let demand_share_pct = share_pct(f.demand, total_demand);
            CategoryIntensity {
                category_id: f.category_id.clone(),
                category_name: f.category_name.clone(),
                demand: f.demand,
                total_water: f.total_water,
                intensity,
                demand_share_pct,
                weighted_impact: intensity * demand_share_pct,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
    rows
}
