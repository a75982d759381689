//! # Propagation
//!
//! [`propagate`] computes the multiplier WL, the per-product footprint and
//! the full pull matrix once. [`total_footprint`] and
//! [`source_contributions`] are the cheap forms used inside sensitivity and
//! Monte Carlo loops, where only `W · (L · Y)` is needed.

use serde::{Deserialize, Serialize};
use twf_core::DimensionError;
use twf_linalg::{hadamard, mat_vec, row_sums, vec_mat, weighted_pull, Matrix, Vector};

use crate::FootprintError;

/// Footprint of one (W, L, Y) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propagation {
    /// Water multiplier `W · L` per destination product (m³ per unit demand).
    pub wl: Vector,
    /// Footprint `WL ⊙ Y` per destination product (m³).
    pub twf: Vector,
    /// `sum(twf)`.
    pub total: f64,
    /// `pull[i, j] = W[i] · L[i, j] · Y[j]`.
    pub pull: Matrix,
    /// Water from the destination product's own coefficient, `W ⊙ Y`.
    pub direct_coefficient_water: Vector,
    /// Supply-chain share `TWF − W ⊙ Y`.
    pub supply_chain_water: Vector,
}

impl Propagation {
    /// Water drawn at each source product, summed over all destinations.
    pub fn by_source(&self) -> Vector {
        row_sums(&self.pull)
    }

    /// Share of the total that travels through supply chains, in percent.
    pub fn supply_chain_share_pct(&self) -> f64 {
        twf_core::numeric::share_pct(self.supply_chain_water.sum(), self.total)
    }
}

pub(crate) fn check_intensity(w: &Vector) -> Result<(), FootprintError> {
    match w.iter().enumerate().find(|(_, v)| !(v.is_finite() && **v >= 0.0)) {
        Some((index, &value)) => Err(FootprintError::InvalidIntensity { index, value }),
        None => Ok(()),
    }
}

fn check_shapes(w: &Vector, l: &Matrix, y: &Vector) -> Result<(), FootprintError> {
    if !l.is_square() {
        return Err(DimensionError::NotSquare {
            context: "propagate".to_string(),
            rows: l.nrows(),
            cols: l.ncols(),
        }
        .into());
    }
    DimensionError::check_len("propagate (W)", l.nrows(), w.len())?;
    DimensionError::check_len("propagate (Y)", l.ncols(), y.len())?;
    Ok(())
}

/// WL, TWF and the pull matrix for one year.
pub fn propagate(w: &Vector, l: &Matrix, y: &Vector) -> Result<Propagation, FootprintError> {
    check_shapes(w, l, y)?;
    check_intensity(w)?;

    let wl = vec_mat(w, l)?;
    let twf = hadamard(&wl, y)?;
    let total = twf.sum();
    let pull = weighted_pull(w, l, y)?;
    let direct_coefficient_water = hadamard(w, y)?;
    let supply_chain_water = &twf - &direct_coefficient_water;

    tracing::debug!(total, products = w.len(), "footprint propagated");

    Ok(Propagation {
        wl,
        twf,
        total,
        pull,
        direct_coefficient_water,
        supply_chain_water,
    })
}

/// Water drawn at each source product: `W ⊙ (L · Y)`.
///
/// Equal to the row sums of the pull matrix without forming it.
pub fn source_contributions(w: &Vector, l: &Matrix, y: &Vector) -> Result<Vector, FootprintError> {
    check_shapes(w, l, y)?;
    let output = mat_vec(l, y)?;
    hadamard(w, &output).map_err(Into::into)
}

/// `W · L · Y`.
pub fn total_footprint(w: &Vector, l: &Matrix, y: &Vector) -> Result<f64, FootprintError> {
    Ok(source_contributions(w, l, y)?.sum())
}
