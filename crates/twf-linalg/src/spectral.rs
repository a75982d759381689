//! Spectral radius via the real Schur form, with a power-iteration fallback.

use nalgebra::Schur;
use serde::{Deserialize, Serialize};
use twf_core::DimensionError;

use crate::{LinalgError, Matrix, Vector};

const SCHUR_MAX_ITERATIONS: usize = 10_000;
const POWER_MAX_ITERATIONS: usize = 5_000;
const POWER_TOLERANCE: f64 = 1e-12;

/// How the spectral radius was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SpectralMethod {
    /// Eigenvalues of the real Schur form.
    Schur,
    /// Power iteration on `|A|`; an estimate of the dominant eigenvalue modulus.
    PowerIteration {
        /// Iterations performed.
        iterations: usize,
        /// Whether the estimate settled within tolerance.
        converged: bool,
    },
}

/// Spectral radius and the method that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralRadius {
    /// max |λ|.
    pub value: f64,
    /// Method used.
    pub method: SpectralMethod,
}

impl SpectralRadius {
    /// Whether the economy satisfies ρ(A) < 1.
    pub fn is_productive(&self) -> bool {
        self.value < 1.0
    }
}

/// Largest eigenvalue modulus of a square matrix.
pub fn spectral_radius(a: &Matrix) -> Result<SpectralRadius, LinalgError> {
    if !a.is_square() {
        return Err(DimensionError::NotSquare {
            context: "spectral_radius".to_string(),
            rows: a.nrows(),
            cols: a.ncols(),
        }
        .into());
    }
    if a.is_empty() {
        return Err(DimensionError::Empty("spectral_radius".to_string()).into());
    }

    if let Some(schur) = Schur::try_new(a.clone(), f64::EPSILON, SCHUR_MAX_ITERATIONS) {
        let value = schur
            .complex_eigenvalues()
            .iter()
            .map(|lambda| lambda.norm())
            .fold(0.0_f64, f64::max);
        return Ok(SpectralRadius {
            value,
            method: SpectralMethod::Schur,
        });
    }

    tracing::debug!(n = a.nrows(), "Schur form did not converge; using power iteration");
    Ok(power_iteration(a))
}

/// Power iteration on the elementwise absolute value of `a`.
///
/// For a non-negative coefficient matrix this converges to the Perron root,
/// which is the spectral radius.
fn power_iteration(a: &Matrix) -> SpectralRadius {
    let n = a.nrows();
    let abs = a.abs();
    let mut v = Vector::from_element(n, 1.0 / (n as f64).sqrt());
    let mut estimate = 0.0;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < POWER_MAX_ITERATIONS {
        iterations += 1;
        let next = &abs * &v;
        let norm = next.norm();
        if norm == 0.0 {
            estimate = 0.0;
            converged = true;
            break;
        }
        v = next / norm;
        if (norm - estimate).abs() <= POWER_TOLERANCE * norm.max(1.0) {
            estimate = norm;
            converged = true;
            break;
        }
        estimate = norm;
    }

    SpectralRadius {
        value: estimate,
        method: SpectralMethod::PowerIteration {
            iterations,
            converged,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_rows;
    use approx::assert_relative_eq;

    #[test]
    fn diagonal_radius_is_largest_entry() {
        let a = from_rows(&[vec![0.3, 0.0], vec![0.0, -0.7]]).unwrap();
        let rho = spectral_radius(&a).unwrap();
        assert_relative_eq!(rho.value, 0.7, epsilon = 1e-12);
        assert_eq!(rho.method, SpectralMethod::Schur);
        assert!(rho.is_productive());
    }

    #[test]
    fn columns_summing_to_one_give_unit_radius() {
        let a = from_rows(&[vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let rho = spectral_radius(&a).unwrap();
        assert_relative_eq!(rho.value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn expanding_matrix_is_not_productive() {
        let a = from_rows(&[vec![0.6, 0.6], vec![0.6, 0.6]]).unwrap();
        let rho = spectral_radius(&a).unwrap();
        assert_relative_eq!(rho.value, 1.2, epsilon = 1e-12);
        assert!(!rho.is_productive());
    }

    #[test]
    fn complex_pair_uses_modulus() {
        // Rotation scaled by 0.5: eigenvalues ±0.5i.
        let a = from_rows(&[vec![0.0, -0.5], vec![0.5, 0.0]]).unwrap();
        let rho = spectral_radius(&a).unwrap();
        assert_relative_eq!(rho.value, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn power_iteration_finds_perron_root() {
        let a = from_rows(&[vec![0.2, 0.3], vec![0.4, 0.1]]).unwrap();
        let rho = power_iteration(&a);
        // Eigenvalues 0.5 and -0.2.
        assert_relative_eq!(rho.value, 0.5, epsilon = 1e-9);
        assert!(matches!(
            rho.method,
            SpectralMethod::PowerIteration { converged: true, .. }
        ));
    }

    #[test]
    fn empty_matrix_is_rejected() {
        assert!(spectral_radius(&Matrix::zeros(0, 0)).is_err());
    }
}
