//! # Products and Reductions
//!
//! Row and column reductions are written out explicitly instead of using
//! nalgebra's `row_sum`/`column_sum`, whose names describe the shape of the
//! result rather than the axis being summed.

use twf_core::DimensionError;

use crate::{LinalgError, Matrix, Vector};

/// Build a matrix from row-major rows, rejecting ragged input.
pub fn from_rows(rows: &[Vec<f64>]) -> Result<Matrix, LinalgError> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != ncols {
            return Err(LinalgError::Ragged {
                row: i,
                expected: ncols,
                actual: row.len(),
            });
        }
    }
    Ok(Matrix::from_fn(nrows, ncols, |i, j| rows[i][j]))
}

/// Row-major copy of a matrix.
pub fn to_rows(m: &Matrix) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

/// Sum of each row.
pub fn row_sums(m: &Matrix) -> Vector {
    Vector::from_iterator(m.nrows(), m.row_iter().map(|r| r.sum()))
}

/// Sum of each column.
pub fn col_sums(m: &Matrix) -> Vector {
    Vector::from_iterator(m.ncols(), m.column_iter().map(|c| c.sum()))
}

fn ensure_square(context: &str, m: &Matrix) -> Result<(), DimensionError> {
    if m.is_square() {
        Ok(())
    } else {
        Err(DimensionError::NotSquare {
            context: context.to_string(),
            rows: m.nrows(),
            cols: m.ncols(),
        })
    }
}

/// Row vector times matrix: `vᵗ · M`, returned as a column vector.
pub fn vec_mat(v: &Vector, m: &Matrix) -> Result<Vector, LinalgError> {
    DimensionError::check_len("vec_mat", m.nrows(), v.len())?;
    Ok(m.tr_mul(v))
}

/// Matrix times column vector.
pub fn mat_vec(m: &Matrix, v: &Vector) -> Result<Vector, LinalgError> {
    DimensionError::check_len("mat_vec", m.ncols(), v.len())?;
    Ok(m * v)
}

/// Elementwise product of two vectors.
pub fn hadamard(a: &Vector, b: &Vector) -> Result<Vector, LinalgError> {
    DimensionError::check_len("hadamard", a.len(), b.len())?;
    Ok(a.component_mul(b))
}

/// `diag(s) · M`: row `i` multiplied by `s[i]`.
pub fn scale_rows(m: &Matrix, s: &Vector) -> Result<Matrix, LinalgError> {
    DimensionError::check_len("scale_rows", m.nrows(), s.len())?;
    Ok(Matrix::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)] * s[i]))
}

/// `M · diag(s)`: column `j` multiplied by `s[j]`.
pub fn scale_cols(m: &Matrix, s: &Vector) -> Result<Matrix, LinalgError> {
    DimensionError::check_len("scale_cols", m.ncols(), s.len())?;
    Ok(Matrix::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)] * s[j]))
}

/// `diag(w) · L · diag(y)`: entry `(i, j)` is `w[i] · L[i, j] · y[j]`.
///
/// Dense by construction; no cell is skipped regardless of sign or size.
pub fn weighted_pull(w: &Vector, l: &Matrix, y: &Vector) -> Result<Matrix, LinalgError> {
    ensure_square("weighted_pull", l)?;
    DimensionError::check_len("weighted_pull (w)", l.nrows(), w.len())?;
    DimensionError::check_len("weighted_pull (y)", l.ncols(), y.len())?;
    Ok(Matrix::from_fn(l.nrows(), l.ncols(), |i, j| w[i] * l[(i, j)] * y[j]))
}

/// `I - A`.
pub fn identity_minus(a: &Matrix) -> Result<Matrix, LinalgError> {
    ensure_square("identity_minus", a)?;
    let n = a.nrows();
    Ok(Matrix::identity(n, n) - a)
}

/// Largest absolute entry of `(I - A) · L - I`.
pub fn identity_residual(a: &Matrix, l: &Matrix) -> Result<f64, LinalgError> {
    let i_minus_a = identity_minus(a)?;
    if l.shape() != a.shape() {
        return Err(DimensionError::ShapeMismatch {
            context: "identity_residual".to_string(),
            left_rows: a.nrows(),
            left_cols: a.ncols(),
            right_rows: l.nrows(),
            right_cols: l.ncols(),
        }
        .into());
    }
    let n = a.nrows();
    let residual = i_minus_a * l - Matrix::identity(n, n);
    Ok(residual.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())))
}

/// Result of scanning a matrix for negative entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeScan {
    /// Entries strictly below `-noise`.
    pub count: usize,
    /// Smallest entry in the matrix (may be non-negative).
    pub min_value: f64,
}

/// Count entries below `-noise`.
pub fn count_negative(m: &Matrix, noise: f64) -> NegativeScan {
    let mut count = 0;
    let mut min_value = f64::INFINITY;
    for &v in m.iter() {
        if v < -noise {
            count += 1;
        }
        min_value = min_value.min(v);
    }
    if m.is_empty() {
        min_value = 0.0;
    }
    NegativeScan { count, min_value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leontief_3() -> Matrix {
        from_rows(&[
            vec![1.2, 0.8, 0.1],
            vec![0.3, 1.5, 0.2],
            vec![0.4, 0.6, 1.3],
        ])
        .unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            LinalgError::Ragged {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rows_round_trip_through_matrix() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let m = from_rows(&rows).unwrap();
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(to_rows(&m), rows);
    }

    #[test]
    fn sums_follow_their_axis() {
        let m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(row_sums(&m).as_slice(), &[3.0, 7.0, 11.0]);
        assert_eq!(col_sums(&m).as_slice(), &[9.0, 12.0]);
    }

    #[test]
    fn vec_mat_reproduces_worked_multiplier() {
        let w = Vector::from_vec(vec![5000.0, 0.0, 0.0]);
        let wl = vec_mat(&w, &leontief_3()).unwrap();
        assert_relative_eq!(wl[0], 6000.0, epsilon = 1e-9);
        assert_relative_eq!(wl[1], 4000.0, epsilon = 1e-9);
        assert_relative_eq!(wl[2], 500.0, epsilon = 1e-9);
    }

    #[test]
    fn vec_mat_checks_length() {
        let w = Vector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            vec_mat(&w, &leontief_3()),
            Err(LinalgError::Dimension(DimensionError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn weighted_pull_matches_scalings() {
        let w = Vector::from_vec(vec![2.0, 0.5, 1.0]);
        let y = Vector::from_vec(vec![0.0, 10.0, 3.0]);
        let l = leontief_3();
        let pull = weighted_pull(&w, &l, &y).unwrap();
        let scaled = scale_cols(&scale_rows(&l, &w).unwrap(), &y).unwrap();
        assert_eq!(pull, scaled);
        assert_relative_eq!(pull[(0, 1)], 2.0 * 0.8 * 10.0);
        assert_eq!(pull[(2, 0)], 0.0);
    }

    #[test]
    fn identity_residual_is_zero_for_exact_inverse() {
        let a = from_rows(&[vec![0.2, 0.1], vec![0.3, 0.4]]).unwrap();
        let l = identity_minus(&a).unwrap().try_inverse().unwrap();
        assert!(identity_residual(&a, &l).unwrap() < 1e-12);
    }

    #[test]
    fn negative_scan_ignores_noise() {
        let m = from_rows(&[vec![0.1, -1e-12], vec![-0.5, 0.0]]).unwrap();
        let scan = count_negative(&m, 1e-9);
        assert_eq!(scan.count, 1);
        assert_eq!(scan.min_value, -0.5);
    }

    #[test]
    fn hadamard_is_elementwise() {
        let a = Vector::from_vec(vec![6000.0, 4000.0, 500.0]);
        let b = Vector::from_vec(vec![0.0, 150.0, 300.0]);
        assert_eq!(hadamard(&a, &b).unwrap().as_slice(), &[0.0, 600_000.0, 150_000.0]);
    }
}
