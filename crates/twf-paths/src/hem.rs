//! # Tourism Dependency (Simplified Extraction)
//!
//! Each product's dependency on tourism is its share of the output that
//! tourism demand requires across the whole economy:
//!
//! ```text
//! x_tourism = L · Y
//! dependency[i] = x_tourism[i] / Σ x_tourism
//! ```
//!
//! This is a proxy for the textbook hypothetical extraction method, which
//! re-solves the model with tourism demand removed and measures the output
//! difference. The proxy reports the tourism-attributable output directly,
//! so dependencies sum to 100% over products rather than measuring each
//! product's exposure relative to its own total output.

use serde::{Deserialize, Serialize};
use twf_core::numeric::share_pct;
use twf_core::sector::product_id;
use twf_core::{DimensionError, ProductId, SectorClassifier, SourceGroup};
use twf_linalg::{mat_vec, Matrix, Vector};

use crate::PathsError;

/// Tourism dependency of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HemRow {
    /// 1-based rank by dependency.
    pub rank: usize,
    /// Product ID.
    pub product: ProductId,
    /// Source group of the product.
    pub group: SourceGroup,
    /// Output required by tourism demand, `(L · Y)[i]`.
    pub tourism_output: f64,
    /// Share of all tourism-driven output, percent.
    pub dependency_pct: f64,
    /// Water coefficient `W[i]`.
    pub water_coefficient: f64,
    /// `W[i] · tourism_output`, m³.
    pub tourism_water: f64,
}

/// Dependency of every product, most dependent first. Ties keep product order.
pub fn hem(w: &Vector, l: &Matrix, y: &Vector, classifier: &SectorClassifier) -> Result<Vec<HemRow>, PathsError> {
    if !l.is_square() {
        return Err(DimensionError::NotSquare {
            context: "hem".to_string(),
            rows: l.nrows(),
            cols: l.ncols(),
        }
        .into());
    }
    DimensionError::check_len("hem (W)", l.nrows(), w.len())?;
    DimensionError::check_len("hem (Y)", l.ncols(), y.len())?;
    let x_tourism = mat_vec(l, y).map_err(twf_footprint::FootprintError::from)?;
    let total = x_tourism.sum();

    let mut rows: Vec<HemRow> = x_tourism
        .iter()
        .zip(w.iter())
        .enumerate()
        .map(|(i, (&output, &coefficient))| {
            let product = product_id(i);
            HemRow {
                rank: 0,
                product,
                group: classifier.group_of(product),
                tourism_output: output,
                dependency_pct: if total > 0.0 { share_pct(output, total) } else { 0.0 },
                water_coefficient: coefficient,
                tourism_water: coefficient * output,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.dependency_pct.total_cmp(&a.dependency_pct));
    for (r, row) in rows.iter_mut().enumerate() {
        row.rank = r + 1;
    }

    if let Some(top) = rows.first() {
        tracing::debug!(
            products = rows.len(),
            top_product = top.product,
            top_dependency_pct = top.dependency_pct,
            "tourism dependency computed"
        );
    }
    Ok(rows)
}
