//! # Conditioned Inversion
//!
//! [`invert`] computes the reciprocal condition number of its input from the
//! singular values. When the matrix is well conditioned the LU inverse is
//! returned as [`InversionMethod::Exact`]. When it is singular or close to it
//! (rcond below the threshold, or LU fails) the Moore–Penrose pseudo-inverse
//! is returned instead, tagged [`InversionMethod::PseudoInverse`], so callers
//! can carry the degradation into their output metadata.

use serde::{Deserialize, Serialize};
use twf_core::DimensionError;

use crate::{LinalgError, Matrix};

const SVD_MAX_ITERATIONS: usize = 10_000;

/// How an inverse was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum InversionMethod {
    /// LU inverse of a well-conditioned matrix.
    Exact,
    /// Moore–Penrose pseudo-inverse of a singular or ill-conditioned matrix.
    PseudoInverse {
        /// Reciprocal condition number of the input.
        reciprocal_condition: f64,
    },
}

impl InversionMethod {
    /// Whether the result is a pseudo-inverse.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::PseudoInverse { .. })
    }
}

/// Inverse together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Inversion {
    /// The (pseudo-)inverse.
    pub inverse: Matrix,
    /// Method used.
    pub method: InversionMethod,
    /// `σ_min / σ_max` of the input; `0.0` for an all-zero matrix.
    pub reciprocal_condition: f64,
}

fn singular_values(m: &Matrix) -> Result<Vec<f64>, LinalgError> {
    let svd = m
        .clone()
        .try_svd(false, false, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or_else(|| LinalgError::Decomposition {
            operation: "svd",
            reason: "did not converge".to_string(),
        })?;
    Ok(svd.singular_values.iter().copied().collect())
}

struct Conditioning {
    sigma_max: f64,
    rcond: f64,
}

fn conditioning(m: &Matrix) -> Result<Conditioning, LinalgError> {
    let sv = singular_values(m)?;
    let sigma_max = sv.iter().copied().fold(0.0_f64, f64::max);
    let sigma_min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    let rcond = if sigma_max == 0.0 || !sigma_min.is_finite() {
        0.0
    } else {
        sigma_min / sigma_max
    };
    Ok(Conditioning { sigma_max, rcond })
}

/// `σ_min / σ_max` of a square matrix.
pub fn reciprocal_condition(m: &Matrix) -> Result<f64, LinalgError> {
    conditioning(m).map(|c| c.rcond)
}

/// Invert a square matrix, falling back to the pseudo-inverse when
/// `reciprocal_condition < rcond_threshold` or LU inversion fails.
pub fn invert(m: &Matrix, rcond_threshold: f64) -> Result<Inversion, LinalgError> {
    if !m.is_square() {
        return Err(DimensionError::NotSquare {
            context: "invert".to_string(),
            rows: m.nrows(),
            cols: m.ncols(),
        }
        .into());
    }
    if m.is_empty() {
        return Err(DimensionError::Empty("invert".to_string()).into());
    }

    let Conditioning { sigma_max, rcond } = conditioning(m)?;

    if rcond >= rcond_threshold {
        if let Some(inverse) = m.clone().try_inverse() {
            return Ok(Inversion {
                inverse,
                method: InversionMethod::Exact,
                reciprocal_condition: rcond,
            });
        }
    }

    tracing::debug!(rcond, threshold = rcond_threshold, "falling back to pseudo-inverse");
    let cutoff = (rcond_threshold * sigma_max).max(f64::EPSILON);
    let inverse = m
        .clone()
        .pseudo_inverse(cutoff)
        .map_err(|reason| LinalgError::Decomposition {
            operation: "pseudo_inverse",
            reason: reason.to_string(),
        })?;
    Ok(Inversion {
        inverse,
        method: InversionMethod::PseudoInverse {
            reciprocal_condition: rcond,
        },
        reciprocal_condition: rcond,
    })
}
