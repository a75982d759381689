//! # Per-Year Inputs
//!
//! Everything one study year needs, loaded before computation starts.
//! Matrices are row-major nested vectors so the same struct deserializes
//! from YAML or JSON files produced by any upstream tool.
//!
//! Water coefficients and tourism demand come either in product space
//! directly, or in source-sector space together with a [`Concordance`]
//! that maps them onto products. The product-space form wins when both
//! are present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use twf_core::DemandCategory;
use twf_footprint::{ActivityData, Concordance, DirectCoefficients};
use twf_iotable::SupplyUse;
use twf_linalg::{from_rows, Vector};

use crate::PipelineError;

/// Raw inputs for one study year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearInputs {
    /// Supply matrix V, products × industries.
    pub supply: Option<Vec<Vec<f64>>>,
    /// Use matrix U, products × industries.
    pub use_table: Option<Vec<Vec<f64>>>,
    /// Final demand y per product.
    pub final_demand: Option<Vec<f64>>,
    /// Water intensity per product, m³ per monetary unit.
    pub water_coefficients: Option<Vec<f64>>,
    /// Water intensity per source sector, mapped through `concordance`.
    /// Read as m³ per EUR million when the study year has an exchange rate.
    pub source_water_coefficients: Option<Vec<f64>>,
    /// Tourism demand per product.
    pub tourism_demand: Option<Vec<f64>>,
    /// Tourism demand per source sector, mapped through `concordance`.
    pub source_tourism_demand: Option<Vec<f64>>,
    /// Inbound visitors' share of tourism demand, per product.
    pub inbound_demand: Option<Vec<f64>>,
    /// Domestic visitors' share of tourism demand, per product.
    pub domestic_demand: Option<Vec<f64>>,
    /// Source-sector → category → product mapping.
    pub concordance: Option<Concordance>,
    /// Demand categories for the destination view. Falls back to the
    /// concordance categories when empty.
    pub categories: Vec<DemandCategory>,
    /// Activity volumes for direct water.
    pub activity: Option<ActivityData>,
    /// Per-activity direct-water coefficients.
    pub direct_coefficients: Option<DirectCoefficients>,
}

/// Inputs for every study year, keyed by year label.
pub type StudyInputs = BTreeMap<String, YearInputs>;

pub(crate) fn required<'a, T>(year: &str, input: &'static str, value: &'a Option<T>) -> Result<&'a T, PipelineError> {
    value.as_ref().ok_or_else(|| PipelineError::MissingInput {
        year: year.to_string(),
        input,
    })
}

impl YearInputs {
    /// Assemble the supply-use system.
    pub fn supply_use(&self, year: &str) -> Result<SupplyUse, PipelineError> {
        let matrix = |rows: &Vec<Vec<f64>>| {
            from_rows(rows).map_err(|source| PipelineError::Linalg {
                year: year.to_string(),
                source,
            })
        };
        Ok(SupplyUse {
            supply: matrix(required(year, "supply", &self.supply)?)?,
            use_table: matrix(required(year, "use_table", &self.use_table)?)?,
            final_demand: Vector::from_vec(required(year, "final_demand", &self.final_demand)?.clone()),
        })
    }

    /// Demand categories for the destination view.
    pub fn demand_categories(&self) -> Vec<DemandCategory> {
        match (&self.concordance, self.categories.is_empty()) {
            (Some(c), true) => c.categories(),
            _ => self.categories.clone(),
        }
    }
}
