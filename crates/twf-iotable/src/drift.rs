//! # Cross-Year Coefficient Drift
//!
//! Compares column sums of A between two study years. A column sum that
//! moves by more than the threshold (default 30%) usually means an upstream
//! scaling or classification change, not a real change in technology, so
//! those products are flagged for review.

use serde::{Deserialize, Serialize};
use twf_core::numeric::pct_change;
use twf_core::sector::product_id;
use twf_core::{Advisory, ProductId};
use twf_linalg::{col_sums, Matrix};

/// Column-sum comparison of two A matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientDrift {
    /// Earlier year.
    pub from_year: String,
    /// Later year.
    pub to_year: String,
    /// Per-product change in percent; `None` where the earlier sum is zero.
    pub pct_change: Vec<Option<f64>>,
    /// Products whose absolute change exceeds the threshold.
    pub flagged: Vec<ProductId>,
    /// Mean absolute change over comparable products.
    pub mean_abs_change_pct: f64,
    /// Largest absolute change.
    pub max_abs_change_pct: f64,
    /// Threshold used.
    pub threshold_pct: f64,
}

impl CoefficientDrift {
    /// Whether every comparable column stayed within the threshold.
    pub fn is_stable(&self) -> bool {
        self.flagged.is_empty()
    }
}

/// Result of a drift comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DriftOutcome {
    /// The matrices had the same shape and were compared.
    Compared(CoefficientDrift),
    /// The matrices could not be compared.
    ShapeMismatch {
        /// Earlier year.
        from_year: String,
        /// Later year.
        to_year: String,
        /// Dimension of the earlier A.
        from_dim: usize,
        /// Dimension of the later A.
        to_dim: usize,
    },
}

impl DriftOutcome {
    /// Advisory for a flagged drift or a shape mismatch.
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            Self::Compared(drift) if drift.is_stable() => None,
            Self::Compared(drift) => Some(Advisory::CoefficientDrift {
                from_year: drift.from_year.clone(),
                to_year: drift.to_year.clone(),
                products: drift.flagged.clone(),
                max_shift_pct: drift.max_abs_change_pct,
                threshold_pct: drift.threshold_pct,
            }),
            Self::ShapeMismatch {
                from_year,
                to_year,
                from_dim,
                to_dim,
            } => Some(Advisory::CoefficientShapeMismatch {
                from_year: from_year.clone(),
                to_year: to_year.clone(),
                from_dim: *from_dim,
                to_dim: *to_dim,
            }),
        }
    }
}

/// Compare A column sums of two consecutive years.
pub fn compare_coefficients(
    from_year: &str,
    a_from: &Matrix,
    to_year: &str,
    a_to: &Matrix,
    threshold_pct: f64,
) -> DriftOutcome {
    if a_from.shape() != a_to.shape() {
        let outcome = DriftOutcome::ShapeMismatch {
            from_year: from_year.to_string(),
            to_year: to_year.to_string(),
            from_dim: a_from.ncols(),
            to_dim: a_to.ncols(),
        };
        if let Some(advisory) = outcome.advisory() {
            advisory.emit(Some(to_year));
        }
        return outcome;
    }

    let before = col_sums(a_from);
    let after = col_sums(a_to);

    let pct: Vec<Option<f64>> = before
        .iter()
        .zip(after.iter())
        .map(|(&b, &a)| if b > 0.0 { pct_change(b, a) } else { None })
        .collect();

    let flagged: Vec<ProductId> = pct
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_some_and(|v| v.abs() > threshold_pct))
        .map(|(i, _)| product_id(i))
        .collect();

    let comparable: Vec<f64> = pct.iter().flatten().map(|v| v.abs()).collect();
    let mean_abs_change_pct = if comparable.is_empty() {
        0.0
    } else {
        comparable.iter().sum::<f64>() / comparable.len() as f64
    };
    let max_abs_change_pct = comparable.iter().copied().fold(0.0_f64, f64::max);

    tracing::info!(
        from_year,
        to_year,
        mean_abs_change_pct,
        max_abs_change_pct,
        flagged = flagged.len(),
        "A-matrix column-sum drift"
    );

    let outcome = DriftOutcome::Compared(CoefficientDrift {
        from_year: from_year.to_string(),
        to_year: to_year.to_string(),
        pct_change: pct,
        flagged,
        mean_abs_change_pct,
        max_abs_change_pct,
        threshold_pct,
    });
    if let Some(advisory) = outcome.advisory() {
        advisory.emit(Some(to_year));
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use twf_linalg::from_rows;

    #[test]
    fn stable_matrices_raise_nothing() {
        let a = from_rows(&[vec![0.1, 0.2], vec![0.2, 0.1]]).unwrap();
        let b = from_rows(&[vec![0.11, 0.2], vec![0.2, 0.12]]).unwrap();
        let outcome = compare_coefficients("2015", &a, "2019", &b, 30.0);
        assert!(outcome.advisory().is_none());
        match outcome {
            DriftOutcome::Compared(d) => {
                assert!(d.is_stable());
                assert!(d.max_abs_change_pct < 30.0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn large_shift_is_flagged_by_product_id() {
        let a = from_rows(&[vec![0.1, 0.2], vec![0.1, 0.2]]).unwrap();
        let b = from_rows(&[vec![0.1, 0.4], vec![0.1, 0.4]]).unwrap();
        match compare_coefficients("2015", &a, "2019", &b, 30.0) {
            DriftOutcome::Compared(d) => {
                assert_eq!(d.flagged, vec![2]);
                assert!((d.pct_change[1].unwrap() - 100.0).abs() < 1e-9);
                assert!((d.max_abs_change_pct - 100.0).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn zero_base_column_is_not_comparable() {
        let a = from_rows(&[vec![0.0, 0.2], vec![0.0, 0.2]]).unwrap();
        let b = from_rows(&[vec![0.5, 0.2], vec![0.0, 0.2]]).unwrap();
        match compare_coefficients("2015", &a, "2019", &b, 30.0) {
            DriftOutcome::Compared(d) => {
                assert_eq!(d.pct_change[0], None);
                assert!(d.is_stable());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let a = Matrix::zeros(2, 2);
        let b = Matrix::zeros(3, 3);
        let outcome = compare_coefficients("2015", &a, "2019", &b, 30.0);
        assert_eq!(
            outcome.advisory(),
            Some(Advisory::CoefficientShapeMismatch {
                from_year: "2015".into(),
                to_year: "2019".into(),
                from_dim: 2,
                to_dim: 3
            })
        );
    }
}
