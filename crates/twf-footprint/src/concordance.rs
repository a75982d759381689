//! # Category Concordance
//!
//! Source data (demand and water extraction) arrive on a different sector
//! axis than the SUT products. A [`Concordance`] row ties a set of 0-based
//! source-sector indices to a set of 1-based destination [`ProductId`]s
//! through a named category. Values are summed over the source sectors and
//! divided equally among the category's products.
//!
//! The mapping tables themselves are reference data supplied by the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use twf_core::sector::product_index;
use twf_core::{Advisory, DemandCategory, ProductId};
use twf_iotable::{Check, ConservationCheck};
use twf_linalg::Vector;

/// One concordance category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcordanceRow {
    /// Category identifier.
    pub category_id: String,
    /// Category name.
    #[serde(default)]
    pub category_name: String,
    /// Broad category type.
    #[serde(default)]
    pub category_type: String,
    /// 0-based indices on the source axis.
    pub source_sectors: Vec<usize>,
    /// 1-based destination product IDs.
    pub products: Vec<ProductId>,
}

/// A source sector listed under two categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateAssignment {
    /// Source-sector index.
    pub source_sector: usize,
    /// Every category that lists it, in row order.
    pub categories: Vec<String>,
}

/// A vector mapped onto the product axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedVector {
    /// Product-space values.
    pub values: Vector,
    /// Duplicate claims and out-of-range references met while mapping.
    pub advisories: Vec<Advisory>,
    /// Mapped total against the source total, when the mapping conserves.
    pub conservation: Option<ConservationCheck>,
}

/// Ordered list of concordance rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Concordance {
    /// Rows in mapping order.
    pub rows: Vec<ConcordanceRow>,
}

impl Concordance {
    /// Wrap a list of rows.
    pub fn new(rows: Vec<ConcordanceRow>) -> Self {
        Self { rows }
    }

    /// Source sectors claimed by more than one category.
    pub fn self_check(&self) -> Vec<DuplicateAssignment> {
        let mut seen: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for row in &self.rows {
            for &s in &row.source_sectors {
                seen.entry(s).or_default().push(row.category_id.clone());
            }
        }
        seen.into_iter()
            .filter(|(_, cats)| cats.len() > 1)
            .map(|(source_sector, categories)| DuplicateAssignment {
                source_sector,
                categories,
            })
            .collect()
    }

    /// The rows as demand categories for the destination view.
    pub fn categories(&self) -> Vec<DemandCategory> {
        self.rows
            .iter()
            .map(|r| DemandCategory {
                id: r.category_id.clone(),
                name: r.category_name.clone(),
                category_type: r.category_type.clone(),
                products: r.products.clone(),
            })
            .collect()
    }

    /// Map source-axis demand onto `n_products` products.
    ///
    /// A source sector claimed twice is counted for both categories and
    /// reported; the conservation check then shows the overcount.
    pub fn map_demand(&self, source: &[f64], n_products: usize, tolerance_pct: f64) -> MappedVector {
        let mut values = Vector::zeros(n_products);
        let mut advisories = Vec::new();
        let mut claimed: BTreeMap<usize, &str> = BTreeMap::new();

        for row in &self.rows {
            let mut demand = 0.0;
            for &s in &row.source_sectors {
                if let Some(first) = claimed.insert(s, &row.category_id) {
                    advisories.push(Advisory::DuplicateSourceAssignment {
                        source_sector: s,
                        first_category: first.to_string(),
                        second_category: row.category_id.clone(),
                    });
                }
                match source.get(s) {
                    Some(v) => demand += v,
                    None => advisories.push(Advisory::OutOfRangeReference {
                        category: row.category_id.clone(),
                        reference: s,
                        bound: source.len(),
                    }),
                }
            }
            if demand > 0.0 {
                distribute(&mut values, &mut advisories, row, demand);
            }
        }

        let conservation = ConservationCheck::new(
            "mapped demand vs source demand",
            values.sum(),
            source.iter().sum(),
            tolerance_pct,
        );
        advisories.extend(conservation.advisory());
        for advisory in &advisories {
            advisory.emit(None);
        }

        MappedVector {
            values,
            advisories,
            conservation: Some(conservation),
        }
    }

    /// Map source-axis water coefficients onto `n_products` products.
    ///
    /// Coefficients are intensities, so there is no total to conserve.
    pub fn map_coefficients(&self, source: &[f64], n_products: usize) -> MappedVector {
        let mut values = Vector::zeros(n_products);
        let mut advisories = Vec::new();

        for row in &self.rows {
            let mut coefficient = 0.0;
            for &s in &row.source_sectors {
                match source.get(s) {
                    Some(v) => coefficient += v,
                    None => advisories.push(Advisory::OutOfRangeReference {
                        category: row.category_id.clone(),
                        reference: s,
                        bound: source.len(),
                    }),
                }
            }
            distribute(&mut values, &mut advisories, row, coefficient);
        }
        for advisory in &advisories {
            advisory.emit(None);
        }

        MappedVector {
            values,
            advisories,
            conservation: None,
        }
    }
}

/// Split `amount` equally over the row's products.
fn distribute(values: &mut Vector, advisories: &mut Vec<Advisory>, row: &ConcordanceRow, amount: f64) {
    if row.products.is_empty() {
        return;
    }
    let per_product = amount / row.products.len() as f64;
    for &pid in &row.products {
        match product_index(pid, values.len()) {
            Some(i) => values[i] += per_product,
            None => advisories.push(Advisory::OutOfRangeReference {
                category: row.category_id.clone(),
                reference: pid as usize,
                bound: values.len(),
            }),
        }
    }
}

/// Convert a coefficient per EUR million to one per crore: `× 100 / eur_inr`.
///
/// The factor follows the unit convention of the extraction tables,
/// where one EUR million is counted as `eur_inr / 100` crore.
#[inline]
pub fn eur_million_to_crore(coefficient: f64, eur_inr: f64) -> f64 {
    coefficient * 100.0 / eur_inr
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(id: &str, sources: Vec<usize>, products: Vec<u32>) -> ConcordanceRow {
        ConcordanceRow {
            category_id: id.to_string(),
            category_name: format!("{id} name"),
            category_type: "Food".to_string(),
            source_sectors: sources,
            products,
        }
    }

    #[test]
    fn demand_is_split_equally_and_conserved() {
        let c = Concordance::new(vec![row("cereal", vec![0, 1], vec![1, 2]), row("hotel", vec![2], vec![4])]);
        let mapped = c.map_demand(&[30.0, 10.0, 60.0], 4, 2.0);
        assert_eq!(mapped.values.as_slice(), &[20.0, 20.0, 0.0, 60.0]);
        assert!(mapped.advisories.is_empty());
        assert!(mapped.conservation.unwrap().passed());
    }

    #[test]
    fn duplicate_claim_double_counts_and_fails_conservation() {
        let c = Concordance::new(vec![row("a", vec![0], vec![1]), row("b", vec![0], vec![2])]);
        let mapped = c.map_demand(&[100.0], 2, 2.0);
        assert_eq!(mapped.values.as_slice(), &[100.0, 100.0]);
        assert!(mapped.advisories.contains(&Advisory::DuplicateSourceAssignment {
            source_sector: 0,
            first_category: "a".into(),
            second_category: "b".into(),
        }));
        assert!(!mapped.conservation.unwrap().passed());
    }

    #[test]
    fn out_of_range_product_is_skipped_with_advisory() {
        let c = Concordance::new(vec![row("a", vec![0], vec![1, 9])]);
        let mapped = c.map_demand(&[10.0], 2, 2.0);
        assert_eq!(mapped.values.as_slice(), &[5.0, 0.0]);
        assert!(mapped.advisories.iter().any(|a| matches!(
            a,
            Advisory::OutOfRangeReference { reference: 9, bound: 2, .. }
        )));
        assert!(mapped.advisories.iter().any(|a| a.kind() == "tolerance_exceeded"));
    }

    #[test]
    fn coefficients_are_summed_then_split() {
        let c = Concordance::new(vec![row("agr", vec![0, 1], vec![1, 2, 3])]);
        let mapped = c.map_coefficients(&[600.0, 300.0], 3);
        assert_eq!(mapped.values.as_slice(), &[300.0, 300.0, 300.0]);
        assert!(mapped.conservation.is_none());
    }

    #[test]
    fn self_check_lists_every_claimant() {
        let c = Concordance::new(vec![
            row("a", vec![3, 4], vec![1]),
            row("b", vec![4], vec![2]),
            row("c", vec![4, 5], vec![3]),
        ]);
        assert_eq!(
            c.self_check(),
            vec![DuplicateAssignment {
                source_sector: 4,
                categories: vec!["a".into(), "b".into(), "c".into()],
            }]
        );
        assert_eq!(c.categories()[1].products, vec![2]);
    }

    #[test]
    fn currency_conversion() {
        assert_relative_eq!(eur_million_to_crore(800.0, 80.0), 1000.0, epsilon = 1e-9);
    }
}
