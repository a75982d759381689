use serde::{Deserialize, Serialize};
use twf_core::{Advisory, DimensionError};
use twf_linalg::{mat_vec, Matrix, Vector};

use crate::SdaError;

/// One year's footprint inputs.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Study year label.
    pub year: &'a str,
    /// Water intensities.
    pub w: &'a Vector,
    /// Leontief inverse.
    pub l: &'a Matrix,
    /// Tourism demand.
    pub y: &'a Vector,
}

impl<'a> Snapshot<'a> {
    /// Bundle one year's inputs.
    pub fn new(year: &'a str, w: &'a Vector, l: &'a Matrix, y: &'a Vector) -> Self {
        Self { year, w, l, y }
    }

    fn check(&self) -> Result<(), DimensionError> {
        if !self.l.is_square() {
            return Err(DimensionError::NotSquare {
                context: format!("decompose ({})", self.year),
                rows: self.l.nrows(),
                cols: self.l.ncols(),
            });
        }
        DimensionError::check_len("decompose (W)", self.l.nrows(), self.w.len())?;
        DimensionError::check_len("decompose (Y)", self.l.ncols(), self.y.len())
    }
}

/// Decomposition of the footprint change between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Earlier year.
    pub from_year: String,
    /// Later year.
    pub to_year: String,
    /// `W₀·L₀·Y₀`.
    pub twf0: f64,
    /// `W₁·L₁·Y₁`.
    pub twf1: f64,
    /// `twf1 − twf0`.
    pub delta: f64,
    /// Technology effect.
    pub w_effect: f64,
    /// Supply-chain structure effect.
    pub l_effect: f64,
    /// Demand effect.
    pub y_effect: f64,
    /// Sum of the three effects.
    pub effect_sum: f64,
    /// `delta − effect_sum`.
    pub residual: f64,
    /// Technology effect as % of `|delta|`.
    pub w_effect_pct: Option<f64>,
    /// Structure effect as % of `|delta|`.
    pub l_effect_pct: Option<f64>,
    /// Demand effect as % of `|delta|`.
    pub y_effect_pct: Option<f64>,
    /// `|residual|` as % of `|delta|`, or of the larger footprint when
    /// nothing changed.
    pub residual_pct: f64,
    /// Allowed residual, percent.
    pub tolerance_pct: f64,
    /// Whether `residual_pct` is within tolerance.
    pub residual_ok: bool,
}

impl Decomposition {
    /// Advisory when the residual is beyond tolerance.
    pub fn advisory(&self) -> Option<Advisory> {
        (!self.residual_ok).then(|| Advisory::DecompositionResidual {
            from_year: self.from_year.clone(),
            to_year: self.to_year.clone(),
            residual: self.residual,
            residual_pct: self.residual_pct,
            tolerance_pct: self.tolerance_pct,
        })
    }
}

fn pct_of_change(effect: f64, delta: f64) -> Option<f64> {
    (delta != 0.0).then(|| 100.0 * effect / delta.abs())
}

/// Decompose the change from `s0` to `s1`.
///
/// The structure effect pairs `ΔL` with the opposite year's weights on
/// each side, `½·(W₁·ΔL·Y₀ + W₀·ΔL·Y₁)`, which is the average of the two
/// polar forms. The matched-weight form `½·(W₀·ΔL·Y₀ + W₁·ΔL·Y₁)` does not
/// telescope: it overstates the change by `½·ΔW·ΔL·ΔY` whenever all three
/// factors move.
pub fn decompose(s0: Snapshot<'_>, s1: Snapshot<'_>, tolerance_pct: f64) -> Result<Decomposition, SdaError> {
    s0.check()?;
    s1.check()?;
    if s0.l.shape() != s1.l.shape() {
        return Err(DimensionError::ShapeMismatch {
            context: format!("decompose {} -> {}", s0.year, s1.year),
            left_rows: s0.l.nrows(),
            left_cols: s0.l.ncols(),
            right_rows: s1.l.nrows(),
            right_cols: s1.l.ncols(),
        }
        .into());
    }

    let dw = s1.w - s0.w;
    let dl = s1.l - s0.l;
    let dy = s1.y - s0.y;

    // Output requirements L·Y for each combination used below.
    let l0y0 = mat_vec(s0.l, s0.y)?;
    let l1y1 = mat_vec(s1.l, s1.y)?;
    let dly0 = mat_vec(&dl, s0.y)?;
    let dly1 = mat_vec(&dl, s1.y)?;
    let l0dy = mat_vec(s0.l, &dy)?;
    let l1dy = mat_vec(s1.l, &dy)?;

    let twf0 = s0.w.dot(&l0y0);
    let twf1 = s1.w.dot(&l1y1);
    let delta = twf1 - twf0;

    let w_effect = 0.5 * (dw.dot(&l0y0) + dw.dot(&l1y1));
    let l_effect = 0.5 * (s1.w.dot(&dly0) + s0.w.dot(&dly1));
    let y_effect = 0.5 * (s1.w.dot(&l1dy) + s0.w.dot(&l0dy));
    let effect_sum = w_effect + l_effect + y_effect;
    let residual = delta - effect_sum;

    let scale = if delta != 0.0 { delta.abs() } else { twf0.abs().max(twf1.abs()) };
    let residual_pct = if scale > 0.0 { 100.0 * residual.abs() / scale } else { 0.0 };
    let residual_ok = residual_pct <= tolerance_pct;

    let d = Decomposition {
        from_year: s0.year.to_string(),
        to_year: s1.year.to_string(),
        twf0,
        twf1,
        delta,
        w_effect,
        l_effect,
        y_effect,
        effect_sum,
        residual,
        w_effect_pct: pct_of_change(w_effect, delta),
        l_effect_pct: pct_of_change(l_effect, delta),
        y_effect_pct: pct_of_change(y_effect, delta),
        residual_pct,
        tolerance_pct,
        residual_ok,
    };

    match d.advisory() {
        Some(a) => a.emit(None),
        None => tracing::info!(
            from_year = %d.from_year,
            to_year = %d.to_year,
            delta,
            w_effect,
            l_effect,
            y_effect,
            "footprint change decomposed"
        ),
    }
    Ok(d)
}

/// Decompose each adjacent pair of `snapshots`, in order.
///
/// The result has `snapshots.len() - 1` entries; a failed pair does not
/// stop the others.
pub fn decompose_consecutive(
    snapshots: &[Snapshot<'_>],
    tolerance_pct: f64,
) -> Vec<Result<Decomposition, SdaError>> {
    snapshots
        .windows(2)
        .map(|pair| decompose(pair[0], pair[1], tolerance_pct))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn l0() -> Matrix {
        twf_linalg::from_rows(&[
            vec![1.2, 0.8, 0.1],
            vec![0.3, 1.5, 0.2],
            vec![0.4, 0.6, 1.3],
        ])
        .unwrap()
    }

    #[test]
    fn pure_demand_change_is_all_demand_effect() {
        let w = Vector::from_vec(vec![5000.0, 0.0, 0.0]);
        let l = l0();
        let y0 = Vector::from_vec(vec![0.0, 150.0, 300.0]);
        let y1 = &y0 * 2.0;
        let d = decompose(Snapshot::new("2015", &w, &l, &y0), Snapshot::new("2019", &w, &l, &y1), 0.1).unwrap();
        assert_relative_eq!(d.twf0, 750_000.0, epsilon = 1e-6);
        assert_relative_eq!(d.delta, 750_000.0, epsilon = 1e-6);
        assert_relative_eq!(d.y_effect, 750_000.0, epsilon = 1e-6);
        assert_eq!(d.w_effect, 0.0);
        assert_eq!(d.l_effect, 0.0);
        assert_relative_eq!(d.y_effect_pct.unwrap(), 100.0, epsilon = 1e-9);
        assert!(d.residual_ok);
        assert!(d.advisory().is_none());
    }

    #[test]
    fn all_three_changing_still_closes() {
        let w0 = Vector::from_vec(vec![5000.0, 100.0, 0.0]);
        let w1 = Vector::from_vec(vec![4000.0, 150.0, 10.0]);
        let l1 = l0() * 1.1;
        let y0 = Vector::from_vec(vec![10.0, 150.0, 300.0]);
        let y1 = Vector::from_vec(vec![20.0, 100.0, 400.0]);
        let d = decompose(
            Snapshot::new("2015", &w0, &l0(), &y0),
            Snapshot::new("2019", &w1, &l1, &y1),
            0.1,
        )
        .unwrap();
        assert!(d.residual.abs() <= 1e-9 * d.delta.abs().max(1.0));
        assert!(d.w_effect < 0.0);
        assert!(d.l_effect > 0.0);
    }

    #[test]
    fn structure_effect_uses_opposite_year_weights() {
        let (w0, w1) = (Vector::from_vec(vec![1.0]), Vector::from_vec(vec![2.0]));
        let (l0, l1) = (Matrix::identity(1, 1), Matrix::from_element(1, 1, 3.0));
        let (y0, y1) = (Vector::from_vec(vec![1.0]), Vector::from_vec(vec![2.0]));
        let d = decompose(Snapshot::new("a", &w0, &l0, &y0), Snapshot::new("b", &w1, &l1, &y1), 0.1).unwrap();

        assert_relative_eq!(d.delta, 11.0, epsilon = 1e-12);
        assert_relative_eq!(d.w_effect, 3.5, epsilon = 1e-12);
        assert_relative_eq!(d.y_effect, 3.5, epsilon = 1e-12);
        // ½·(2·2·1 + 1·2·2); the matched-weight form would give 5 and miss by 1.
        assert_relative_eq!(d.l_effect, 4.0, epsilon = 1e-12);
        assert_relative_eq!(d.residual, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn no_change_has_zero_effects() {
        let w = Vector::from_vec(vec![1.0, 2.0]);
        let l = Matrix::identity(2, 2);
        let y = Vector::from_vec(vec![3.0, 4.0]);
        let s = Snapshot::new("a", &w, &l, &y);
        let d = decompose(s, Snapshot { year: "b", ..s }, 0.1).unwrap();
        assert_eq!(d.delta, 0.0);
        assert_eq!(d.w_effect_pct, None);
        assert_eq!(d.residual_pct, 0.0);
        assert!(d.residual_ok);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let w2 = Vector::zeros(2);
        let l2 = Matrix::identity(2, 2);
        let w3 = Vector::zeros(3);
        let l3 = Matrix::identity(3, 3);
        let r = decompose(Snapshot::new("a", &w2, &l2, &w2), Snapshot::new("b", &w3, &l3, &w3), 0.1);
        assert!(matches!(r, Err(SdaError::Dimension(DimensionError::ShapeMismatch { .. }))));
    }

    #[test]
    fn consecutive_pairs_only() {
        let w = Vector::from_vec(vec![1.0]);
        let l = Matrix::identity(1, 1);
        let ys: Vec<Vector> = [1.0, 2.0, 4.0].iter().map(|&v| Vector::from_vec(vec![v])).collect();
        let snaps: Vec<Snapshot<'_>> = ["2015", "2019", "2022"]
            .iter()
            .zip(&ys)
            .map(|(label, y)| Snapshot::new(label, &w, &l, y))
            .collect();
        let out = decompose_consecutive(&snaps, 0.1);
        assert_eq!(out.len(), 2);
        let first = out[0].as_ref().unwrap();
        let second = out[1].as_ref().unwrap();
        assert_eq!((first.from_year.as_str(), first.to_year.as_str()), ("2015", "2019"));
        assert_eq!((second.from_year.as_str(), second.to_year.as_str()), ("2019", "2022"));
        assert_eq!(second.delta, 2.0);
    }

    fn snapshot_data(n: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
        (
            proptest::collection::vec(0.0f64..1e4, n),
            proptest::collection::vec(0.0f64..2.0, n * n),
            proptest::collection::vec(0.0f64..1e3, n),
        )
    }

    proptest! {
        #[test]
        fn effects_sum_to_the_change(
            (a, b) in (1usize..7).prop_flat_map(|n| (snapshot_data(n), snapshot_data(n)))
        ) {
            let n = a.0.len();
            let (w0, l0, y0) = (Vector::from_vec(a.0), Matrix::from_row_slice(n, n, &a.1), Vector::from_vec(a.2));
            let (w1, l1, y1) = (Vector::from_vec(b.0), Matrix::from_row_slice(n, n, &b.1), Vector::from_vec(b.2));
            let d = decompose(
                Snapshot::new("t0", &w0, &l0, &y0),
                Snapshot::new("t1", &w1, &l1, &y1),
                0.1,
            ).unwrap();
            let scale = d.twf0.abs().max(d.twf1.abs()).max(1.0);
            prop_assert!(d.residual.abs() <= 1e-9 * scale);
        }
    }
}
