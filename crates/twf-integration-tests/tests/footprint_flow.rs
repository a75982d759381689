//! Supply-use tables through to footprint, views and paths.
//!
//! Exercises the IO builder, the propagator, the structural views and the
//! path analyzer on the same tables and checks that every view accounts
//! for the same total.

use approx::assert_relative_eq;
use twf_core::{DemandCategory, GroupRange, SectorClassifier, SourceGroup, Tolerances};
use twf_footprint::{propagate, source_contributions, structural_views, total_footprint};
use twf_iotable::{build_io, Check, SupplyUse};
use twf_linalg::{from_rows, identity_residual, Matrix, Vector};
use twf_paths::{hem, rank_paths};

fn three_sector() -> SupplyUse {
    SupplyUse {
        supply: Matrix::from_diagonal(&Vector::from_vec(vec![500.0, 300.0, 400.0])),
        use_table: from_rows(&[
            vec![100.0, 50.0, 20.0],
            vec![30.0, 80.0, 10.0],
            vec![40.0, 60.0, 100.0],
        ])
        .unwrap(),
        final_demand: Vector::from_vec(vec![330.0, 180.0, 200.0]),
    }
}

fn classifier() -> SectorClassifier {
    SectorClassifier {
        ranges: vec![
            GroupRange { first: 1, last: 1, group: SourceGroup::Agriculture },
            GroupRange { first: 2, last: 2, group: SourceGroup::Electricity },
        ],
        fallback: SourceGroup::Services,
    }
}

fn categories() -> Vec<DemandCategory> {
    vec![
        DemandCategory {
            id: "food".into(),
            name: "Food & beverages".into(),
            category_type: "Food".into(),
            products: vec![1, 2],
        },
        DemandCategory {
            id: "stay".into(),
            name: "Accommodation".into(),
            category_type: "Accommodation".into(),
            products: vec![3],
        },
    ]
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn worked_three_sector_example() {
    let w = Vector::from_vec(vec![5000.0, 0.0, 0.0]);
    let l = from_rows(&[
        vec![1.2, 0.8, 0.1],
        vec![0.3, 1.5, 0.2],
        vec![0.4, 0.6, 1.3],
    ])
    .unwrap();
    let y = Vector::from_vec(vec![0.0, 150.0, 300.0]);

    let p = propagate(&w, &l, &y).unwrap();
    assert_relative_eq!(p.wl, Vector::from_vec(vec![6000.0, 4000.0, 500.0]), epsilon = 1e-9);
    assert_relative_eq!(p.twf, Vector::from_vec(vec![0.0, 600_000.0, 150_000.0]), epsilon = 1e-6);
    assert_relative_eq!(p.total, 750_000.0, epsilon = 1e-6);

    let views = structural_views(&p.pull, &categories(), &classifier());
    assert_relative_eq!(views.origin_of(SourceGroup::Agriculture), 750_000.0, epsilon = 1e-6);
    assert!(views.reconcile(p.total, 1.0).is_consistent());

    let paths = rank_paths(&w, &l, &y, &classifier(), 50).unwrap();
    assert_relative_eq!(paths.ranked_water(), p.total, epsilon = 1e-6);
}

// ---------------------------------------------------------------------------
// Built tables
// ---------------------------------------------------------------------------

#[test]
fn built_table_feeds_a_consistent_footprint() {
    let table = build_io(&three_sector(), &Tolerances::default()).unwrap();
    assert!(table.validation.all_passed());
    assert!(identity_residual(&table.a, &table.l).unwrap() < 1e-9);

    let w = Vector::from_vec(vec![800.0, 1200.0, 5.0]);
    let y = Vector::from_vec(vec![20.0, 5.0, 60.0]);
    let p = propagate(&w, &table.l, &y).unwrap();

    assert_relative_eq!(p.total, total_footprint(&w, &table.l, &y).unwrap(), max_relative = 1e-12);
    assert_relative_eq!(
        p.by_source(),
        source_contributions(&w, &table.l, &y).unwrap(),
        max_relative = 1e-12
    );

    let views = structural_views(&p.pull, &categories(), &classifier());
    assert_relative_eq!(views.destination_total(), p.total, max_relative = 1e-9);
    assert_relative_eq!(views.origin_total(), p.total, max_relative = 1e-9);
    let r = views.reconcile(p.total, 1.0);
    assert!(r.is_consistent());
    assert!(r.advisory().is_none());

    // Electricity water only reaches accommodation through supply chains.
    let stay = views.destination.iter().find(|d| d.category_id == "stay").unwrap();
    assert!(stay.from_group(SourceGroup::Electricity) > 0.0);
}

#[test]
fn paths_and_dependency_agree_with_the_pull_matrix() {
    let table = build_io(&three_sector(), &Tolerances::default()).unwrap();
    let w = Vector::from_vec(vec![800.0, 1200.0, 5.0]);
    let y = Vector::from_vec(vec![20.0, 5.0, 60.0]);

    let paths = rank_paths(&w, &table.l, &y, &classifier(), 9).unwrap();
    assert_eq!(paths.positive_cells, 9);
    assert_eq!(paths.rows.len(), 9);
    assert_relative_eq!(paths.coverage_pct(), 100.0, epsilon = 1e-9);
    let group_total: f64 = paths.by_source_group().iter().map(|g| g.water).sum();
    assert_relative_eq!(group_total, paths.total_footprint, max_relative = 1e-12);

    let rows = hem(&w, &table.l, &y, &classifier()).unwrap();
    let tourism_water: f64 = rows.iter().map(|r| r.tourism_water).sum();
    assert_relative_eq!(tourism_water, paths.total_footprint, max_relative = 1e-9);
    assert!(rows.windows(2).all(|p| p[0].dependency_pct >= p[1].dependency_pct));
}

#[test]
fn singular_table_still_propagates() {
    let inputs = SupplyUse {
        supply: Matrix::identity(2, 2),
        use_table: from_rows(&[vec![2.0, 2.0], vec![2.0, 2.0]]).unwrap(),
        final_demand: Vector::zeros(2),
    };
    let table = build_io(&inputs, &Tolerances::default()).unwrap();
    assert!(table.inversion.is_degraded());
    assert!(!table.validation.hawkins_simon.passed());
    assert!(table.advisories().len() >= 2);

    let p = propagate(&Vector::from_vec(vec![1.0, 1.0]), &table.l, &Vector::from_vec(vec![1.0, 1.0])).unwrap();
    assert!(p.total.is_finite());
}
