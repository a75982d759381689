//! Structural decomposition on tables built from supply-use inputs.

use approx::assert_relative_eq;
use proptest::prelude::*;
use twf_core::Tolerances;
use twf_footprint::total_footprint;
use twf_iotable::{build_io, IoTable, SupplyUse};
use twf_linalg::{from_rows, Matrix, Vector};
use twf_sda::{decompose, decompose_consecutive, Snapshot};

fn table(diag: [f64; 3], use_rows: [[f64; 3]; 3], y: [f64; 3]) -> IoTable {
    let inputs = SupplyUse {
        supply: Matrix::from_diagonal(&Vector::from_vec(diag.to_vec())),
        use_table: from_rows(&use_rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap(),
        final_demand: Vector::from_vec(y.to_vec()),
    };
    build_io(&inputs, &Tolerances::default()).unwrap()
}

fn year_2015() -> IoTable {
    table(
        [500.0, 300.0, 400.0],
        [[100.0, 50.0, 20.0], [30.0, 80.0, 10.0], [40.0, 60.0, 100.0]],
        [330.0, 180.0, 200.0],
    )
}

fn year_2022() -> IoTable {
    table(
        [650.0, 420.0, 520.0],
        [[120.0, 40.0, 30.0], [50.0, 90.0, 25.0], [45.0, 85.0, 140.0]],
        [435.0, 205.0, 325.0],
    )
}

#[test]
fn effects_explain_the_change_between_built_years() {
    let (t0, t1) = (year_2015(), year_2022());
    let w0 = Vector::from_vec(vec![900.0, 1400.0, 12.0]);
    let w1 = Vector::from_vec(vec![780.0, 1100.0, 10.0]);
    let y0 = Vector::from_vec(vec![40.0, 10.0, 90.0]);
    let y1 = Vector::from_vec(vec![55.0, 18.0, 140.0]);

    let d = decompose(
        Snapshot::new("2015", &w0, &t0.l, &y0),
        Snapshot::new("2022", &w1, &t1.l, &y1),
        0.1,
    )
    .unwrap();

    assert_relative_eq!(d.twf0, total_footprint(&w0, &t0.l, &y0).unwrap(), max_relative = 1e-12);
    assert_relative_eq!(d.twf1, total_footprint(&w1, &t1.l, &y1).unwrap(), max_relative = 1e-12);
    assert_relative_eq!(d.effect_sum, d.delta, max_relative = 1e-9);
    assert!(d.residual_ok);
    assert!(d.advisory().is_none());

    // Coefficients fell and demand rose.
    assert!(d.w_effect < 0.0);
    assert!(d.y_effect > 0.0);
}

#[test]
fn consecutive_pairs_follow_snapshot_order() {
    let (t0, t1) = (year_2015(), year_2022());
    let w = Vector::from_vec(vec![900.0, 1400.0, 12.0]);
    let y = Vector::from_vec(vec![40.0, 10.0, 90.0]);
    let snapshots = [
        Snapshot::new("2015", &w, &t0.l, &y),
        Snapshot::new("2019", &w, &t1.l, &y),
        Snapshot::new("2022", &w, &t0.l, &y),
    ];
    let results = decompose_consecutive(&snapshots, 0.1);
    assert_eq!(results.len(), 2);

    let first = results[0].as_ref().unwrap();
    let second = results[1].as_ref().unwrap();
    assert_eq!((first.from_year.as_str(), first.to_year.as_str()), ("2015", "2019"));
    assert_eq!((second.from_year.as_str(), second.to_year.as_str()), ("2019", "2022"));

    // Only L changes, and the second step undoes the first.
    assert_relative_eq!(first.w_effect, 0.0, epsilon = 1e-9);
    assert_relative_eq!(first.y_effect, 0.0, epsilon = 1e-9);
    assert_relative_eq!(first.l_effect, -second.l_effect, max_relative = 1e-9);
}

#[test]
fn mismatched_table_sizes_fail_only_their_pair() {
    let t0 = year_2015();
    let small = build_io(
        &SupplyUse {
            supply: Matrix::from_diagonal(&Vector::from_vec(vec![500.0, 300.0])),
            use_table: from_rows(&[vec![50.0, 40.0], vec![70.0, 30.0]]).unwrap(),
            final_demand: Vector::from_vec(vec![380.0, 230.0]),
        },
        &Tolerances::default(),
    )
    .unwrap();
    let w3 = Vector::from_element(3, 1.0);
    let y3 = Vector::from_element(3, 1.0);
    let w2 = Vector::from_element(2, 1.0);
    let y2 = Vector::from_element(2, 1.0);

    let results = decompose_consecutive(
        &[
            Snapshot::new("2015", &w3, &t0.l, &y3),
            Snapshot::new("2019", &w3, &t0.l, &y3),
            Snapshot::new("2022", &w2, &small.l, &y2),
        ],
        0.1,
    );
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

proptest! {
    #[test]
    fn decomposition_is_exact_for_any_rescaling(
        wf in proptest::collection::vec(0.2f64..3.0, 3),
        yf in proptest::collection::vec(0.2f64..3.0, 3),
        growth in 1.0f64..1.8,
    ) {
        let t0 = year_2015();
        let t1 = table(
            [500.0 * growth, 300.0, 400.0 * growth],
            [[100.0, 50.0, 20.0], [30.0, 80.0, 10.0], [40.0, 60.0, 100.0]],
            [330.0 + 500.0 * (growth - 1.0), 180.0, 200.0 + 400.0 * (growth - 1.0)],
        );
        let w0 = Vector::from_vec(vec![900.0, 1400.0, 12.0]);
        let y0 = Vector::from_vec(vec![40.0, 10.0, 90.0]);
        let w1 = w0.component_mul(&Vector::from_vec(wf));
        let y1 = y0.component_mul(&Vector::from_vec(yf));

        let d = decompose(
            Snapshot::new("a", &w0, &t0.l, &y0),
            Snapshot::new("b", &w1, &t1.l, &y1),
            0.1,
        ).unwrap();
        prop_assert!(d.residual.abs() <= 1e-6 * d.twf0.abs().max(d.twf1.abs()));
    }
}
