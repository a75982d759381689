//! # Destination and Origin Views
//!
//! Both views are read from the same pull matrix:
//!
//! - **Destination**: for each [`DemandCategory`], the pull columns of its
//!   products summed, then split by the [`SourceGroup`] of each row.
//! - **Origin**: the destination rows' per-group water summed across all
//!   categories.
//!
//! [`StructuralViews::reconcile`] checks that both views account for the
//! whole footprint. They only do when the categories partition the
//! demand-carrying products; overlapping or incomplete categories show up
//! as a gap, never as a silently rescaled share.

use serde::{Deserialize, Serialize};
use twf_core::numeric::{pct_deviation, share_pct};
use twf_core::sector::product_index;
use twf_core::{Advisory, DemandCategory, SectorClassifier, SourceGroup};
use twf_linalg::Matrix;

/// Water from one source group, absolute and as a share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShare {
    /// Source group.
    pub group: SourceGroup,
    /// Water in m³.
    pub water: f64,
    /// Share of the row total, percent.
    pub pct: f64,
}

/// Water triggered by one demand category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationRow {
    /// Category identifier.
    pub category_id: String,
    /// Category name.
    pub category_name: String,
    /// Total water triggered, m³.
    pub total: f64,
    /// Split by source group, in [`SourceGroup::all`] order.
    pub by_group: Vec<GroupShare>,
}

impl DestinationRow {
    /// Water drawn from `group` for this category.
    pub fn from_group(&self, group: SourceGroup) -> f64 {
        self.by_group
            .iter()
            .find(|g| g.group == group)
            .map_or(0.0, |g| g.water)
    }
}

/// Water physically drawn from one source group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginRow {
    /// Source group.
    pub group: SourceGroup,
    /// Water in m³.
    pub water: f64,
    /// Share of the origin total, percent.
    pub pct: f64,
}

/// Whether both views account for a footprint total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Sum over destination rows.
    pub destination_total: f64,
    /// Sum over origin rows.
    pub origin_total: f64,
    /// Footprint total the views were checked against.
    pub footprint_total: f64,
    /// Deviation of the destination total from the footprint, percent.
    pub gap_pct: Option<f64>,
    /// Allowed deviation, percent.
    pub tolerance_pct: f64,
}

impl Reconciliation {
    /// Whether both view totals match the footprint within tolerance.
    pub fn is_consistent(&self) -> bool {
        let origin_matches = pct_deviation(self.origin_total, self.destination_total)
            .map_or(self.origin_total == self.destination_total, |d| d <= self.tolerance_pct);
        let total_matches = self
            .gap_pct
            .map_or(self.destination_total == 0.0, |d| d <= self.tolerance_pct);
        origin_matches && total_matches
    }

    /// Advisory when the views do not account for the footprint.
    pub fn advisory(&self) -> Option<Advisory> {
        (!self.is_consistent()).then(|| Advisory::ToleranceExceeded {
            check: "structural views vs total footprint".to_string(),
            actual: self.destination_total,
            expected: self.footprint_total,
            deviation_pct: self.gap_pct,
            tolerance_pct: self.tolerance_pct,
        })
    }
}

/// Destination and origin views of one year's pull matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralViews {
    /// Destination rows, largest total first.
    pub destination: Vec<DestinationRow>,
    /// Origin rows, in [`SourceGroup::all`] order.
    pub origin: Vec<OriginRow>,
    /// Category references outside the product range.
    pub advisories: Vec<Advisory>,
}

impl StructuralViews {
    /// Sum over destination rows.
    pub fn destination_total(&self) -> f64 {
        self.destination.iter().map(|r| r.total).sum()
    }

    /// Sum over origin rows.
    pub fn origin_total(&self) -> f64 {
        self.origin.iter().map(|r| r.water).sum()
    }

    /// Water drawn from `group`.
    pub fn origin_of(&self, group: SourceGroup) -> f64 {
        self.origin
            .iter()
            .find(|r| r.group == group)
            .map_or(0.0, |r| r.water)
    }

    /// Check both views against a footprint total.
    pub fn reconcile(&self, footprint_total: f64, tolerance_pct: f64) -> Reconciliation {
        let destination_total = self.destination_total();
        Reconciliation {
            destination_total,
            origin_total: self.origin_total(),
            footprint_total,
            gap_pct: pct_deviation(destination_total, footprint_total),
            tolerance_pct,
        }
    }
}

/// Build both views from a pull matrix.
pub fn structural_views(
    pull: &Matrix,
    categories: &[DemandCategory],
    classifier: &SectorClassifier,
) -> StructuralViews {
    let n = pull.nrows();
    let groups = classifier.groups_for(n);
    let mut advisories = Vec::new();
    let mut destination = Vec::new();

    for category in categories {
        let mut columns = Vec::with_capacity(category.products.len());
        for &pid in &category.products {
            match product_index(pid, pull.ncols()) {
                Some(j) => columns.push(j),
                None => {
                    let advisory = Advisory::OutOfRangeReference {
                        category: category.id.clone(),
                        reference: pid as usize,
                        bound: pull.ncols(),
                    };
                    advisory.emit(None);
                    advisories.push(advisory);
                }
            }
        }
        if columns.is_empty() {
            continue;
        }

        let mut group_water = [0.0_f64; SourceGroup::COUNT];
        for (i, group) in groups.iter().enumerate() {
            let row_pull: f64 = columns.iter().map(|&j| pull[(i, j)]).sum();
            group_water[group.ordinal()] += row_pull;
        }
        let total: f64 = group_water.iter().sum();
        if total == 0.0 {
            continue;
        }

        destination.push(DestinationRow {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            total,
            by_group: SourceGroup::all()
                .iter()
                .map(|&group| GroupShare {
                    group,
                    water: group_water[group.ordinal()],
                    pct: share_pct(group_water[group.ordinal()], total),
                })
                .collect(),
        });
    }

    destination.sort_by(|a, b| b.total.total_cmp(&a.total));

    let mut origin_water = [0.0_f64; SourceGroup::COUNT];
    for row in &destination {
        for share in &row.by_group {
            origin_water[share.group.ordinal()] += share.water;
        }
    }
    let origin_total: f64 = origin_water.iter().sum();
    let origin = SourceGroup::all()
        .iter()
        .map(|&group| OriginRow {
            group,
            water: origin_water[group.ordinal()],
            pct: share_pct(origin_water[group.ordinal()], origin_total),
        })
        .collect();

    StructuralViews {
        destination,
        origin,
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use twf_core::GroupRange;
    use twf_linalg::{from_rows, Vector};

    /// Product 1 = Agriculture, 2 = Manufacturing (food), 3 = Services.
    fn classifier() -> SectorClassifier {
        SectorClassifier {
            ranges: vec![
                GroupRange { first: 1, last: 1, group: SourceGroup::Agriculture },
                GroupRange { first: 2, last: 2, group: SourceGroup::Manufacturing },
            ],
            fallback: SourceGroup::Services,
        }
    }

    fn category(id: &str, products: Vec<u32>) -> DemandCategory {
        DemandCategory {
            id: id.to_string(),
            name: id.to_uppercase(),
            category_type: String::new(),
            products,
        }
    }

    fn worked_pull() -> Matrix {
        let w = Vector::from_vec(vec![5000.0, 0.0, 0.0]);
        let l = from_rows(&[
            vec![1.2, 0.8, 0.1],
            vec![0.3, 1.5, 0.2],
            vec![0.4, 0.6, 1.3],
        ])
        .unwrap();
        let y = Vector::from_vec(vec![0.0, 150.0, 300.0]);
        propagate(&w, &l, &y).unwrap().pull
    }

    #[test]
    fn food_category_shows_agricultural_origin_not_destination() {
        let categories = vec![
            category("raw", vec![1]),
            category("food", vec![2]),
            category("hotel", vec![3]),
        ];
        let views = structural_views(&worked_pull(), &categories, &classifier());

        // No tourism demand lands on raw agriculture, so it has no row.
        assert!(views.destination.iter().all(|r| r.category_id != "raw"));
        assert_eq!(views.destination[0].category_id, "food");
        assert_relative_eq!(views.destination[0].total, 600_000.0, epsilon = 1e-6);
        assert_relative_eq!(
            views.destination[0].from_group(SourceGroup::Agriculture),
            600_000.0,
            epsilon = 1e-6
        );

        assert_relative_eq!(views.origin_of(SourceGroup::Agriculture), 750_000.0, epsilon = 1e-6);
        assert_relative_eq!(views.origin[0].pct, 100.0, epsilon = 1e-9);

        let rec = views.reconcile(750_000.0, 0.01);
        assert!(rec.is_consistent());
        assert!(rec.advisory().is_none());
    }

    #[test]
    fn missing_category_is_a_reconciliation_gap() {
        let categories = vec![category("food", vec![2])];
        let views = structural_views(&worked_pull(), &categories, &classifier());
        let rec = views.reconcile(750_000.0, 0.01);
        assert!(!rec.is_consistent());
        assert!((rec.gap_pct.unwrap() - 20.0).abs() < 1e-9);
        assert!(rec.advisory().is_some());
    }

    #[test]
    fn out_of_range_product_is_reported() {
        let categories = vec![category("food", vec![2, 99])];
        let views = structural_views(&worked_pull(), &categories, &classifier());
        assert_eq!(
            views.advisories,
            vec![Advisory::OutOfRangeReference {
                category: "food".into(),
                reference: 99,
                bound: 3
            }]
        );
        assert_eq!(views.destination.len(), 1);
    }

    proptest! {
        #[test]
        fn partitioning_categories_reconcile(
            w in proptest::collection::vec(0.0f64..1e3, 6),
            l in proptest::collection::vec(0.0f64..2.0, 36),
            y in proptest::collection::vec(0.0f64..1e3, 6),
        ) {
            let w = Vector::from_vec(w);
            let l = Matrix::from_row_slice(6, 6, &l);
            let y = Vector::from_vec(y);
            let p = propagate(&w, &l, &y).unwrap();
            let categories = vec![
                category("a", vec![1, 4]),
                category("b", vec![2, 5]),
                category("c", vec![3, 6]),
            ];
            let views = structural_views(&p.pull, &categories, &SectorClassifier::default());
            let scale = p.total.max(1.0);
            prop_assert!((views.destination_total() - p.total).abs() <= 1e-9 * scale);
            prop_assert!((views.origin_total() - p.total).abs() <= 1e-9 * scale);
        }
    }
}
