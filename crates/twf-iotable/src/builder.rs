//! # Product Technology Assumption Builder
//!
//! [`build_io`] turns one year's [`SupplyUse`] into an [`IoTable`]. The
//! build never fails on economic grounds: row-count mismatches are trimmed
//! and reported, a singular `I − A` falls back to the pseudo-inverse and is
//! tagged in [`IoTable::inversion`], and every consistency check lands in
//! [`IoTable::validation`]. Only empty or structurally incompatible input
//! is an error.

use twf_core::numeric::floor_all;
use twf_core::{Advisory, Tolerances};
use twf_linalg::{col_sums, identity_minus, invert, row_sums, InversionMethod, Matrix, Vector};

use crate::validation::{validate, Check, NegativeEntriesCheck, ValidationReport};
use crate::IoTableError;

/// Raw supply-use inputs for one year. All monetary entries share one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyUse {
    /// Supply matrix V, products × industries.
    pub supply: Matrix,
    /// Use matrix U, products × industries.
    pub use_table: Matrix,
    /// Final demand y, one entry per product.
    pub final_demand: Vector,
}

/// Product-by-product IO system for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct IoTable {
    /// Intermediate flows Z.
    pub z: Matrix,
    /// Technical coefficients A.
    pub a: Matrix,
    /// Leontief inverse L (or pseudo-inverse, see `inversion`).
    pub l: Matrix,
    /// Demand-side gross output `colsum(Z) + y`, before flooring.
    pub x: Vector,
    /// Supply-side gross output `rowsum(V)`, before flooring.
    pub q: Vector,
    /// Final demand after trimming.
    pub y: Vector,
    /// How L was obtained.
    pub inversion: InversionMethod,
    /// Reciprocal condition number of `I − A`.
    pub reciprocal_condition: f64,
    /// Consistency checks on the built system.
    pub validation: ValidationReport,
    /// Build-time advisories (trimming, negative inputs, pseudo-inverse).
    pub build_advisories: Vec<Advisory>,
}

impl IoTable {
    /// Number of products.
    pub fn n_products(&self) -> usize {
        self.a.nrows()
    }

    /// Build-time advisories followed by failed validation checks.
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut all = self.build_advisories.clone();
        all.extend(self.validation.advisories());
        all
    }

    /// Demand-side output divided by a price deflator.
    pub fn real_output(&self, deflator: f64) -> Vector {
        self.x.map(|v| v / deflator)
    }
}

fn trim_rows(m: &Matrix, n: usize) -> Matrix {
    Matrix::from_fn(n, m.ncols(), |i, j| m[(i, j)])
}

fn trim_vector(v: &Vector, n: usize) -> Vector {
    Vector::from_iterator(n, v.iter().take(n).copied())
}

/// Build Z, A, L, x and q from supply-use tables.
pub fn build_io(inputs: &SupplyUse, tolerances: &Tolerances) -> Result<IoTable, IoTableError> {
    let SupplyUse {
        supply,
        use_table,
        final_demand,
    } = inputs;

    if supply.is_empty() {
        return Err(IoTableError::Empty("supply matrix"));
    }
    if use_table.is_empty() {
        return Err(IoTableError::Empty("use matrix"));
    }
    if final_demand.is_empty() {
        return Err(IoTableError::Empty("final demand"));
    }
    if supply.ncols() != use_table.ncols() {
        return Err(IoTableError::IndustryMismatch {
            supply_industries: supply.ncols(),
            use_industries: use_table.ncols(),
        });
    }

    let mut build_advisories = Vec::new();

    let n = supply.nrows().min(use_table.nrows()).min(final_demand.len());
    let trimmed = n != supply.nrows() || n != use_table.nrows() || n != final_demand.len();
    let (v, u, y) = if trimmed {
        let advisory = Advisory::RowCountMismatch {
            supply_rows: supply.nrows(),
            use_rows: use_table.nrows(),
            demand_len: final_demand.len(),
            trimmed_to: n,
        };
        advisory.emit(None);
        build_advisories.push(advisory);
        (trim_rows(supply, n), trim_rows(use_table, n), trim_vector(final_demand, n))
    } else {
        (supply.clone(), use_table.clone(), final_demand.clone())
    };

    for (name, m) in [("V", &v), ("U", &u)] {
        if let Some(advisory) = NegativeEntriesCheck::scan(name, m, tolerances.negative_noise).advisory() {
            advisory.emit(None);
            build_advisories.push(advisory);
        }
    }

    let floor = tolerances.safe_divide_floor;

    let q = row_sums(&v);
    let q_safe = floor_all(q.as_slice(), floor);
    let d = Matrix::from_fn(v.nrows(), v.ncols(), |i, j| v[(i, j)] / q_safe[i]);

    let z = &u * d.transpose();

    let x = col_sums(&z) + &y;
    let x_safe = floor_all(x.as_slice(), floor);
    let a = Matrix::from_fn(n, n, |i, j| z[(i, j)] / x_safe[j]);

    let inversion = invert(&identity_minus(&a)?, tolerances.singular_rcond)?;
    if let InversionMethod::PseudoInverse {
        reciprocal_condition,
    } = inversion.method
    {
        let advisory = Advisory::PseudoInverseFallback {
            reciprocal_condition,
        };
        advisory.emit(None);
        build_advisories.push(advisory);
    }
    let l = inversion.inverse;

    let validation = validate(&z, &a, &l, &x, &q, &y, tolerances);
    for advisory in validation.advisories() {
        advisory.emit(None);
    }

    tracing::info!(
        products = n,
        total_output = x.sum(),
        total_intermediate = z.sum(),
        total_final_demand = y.sum(),
        spectral_radius = ?validation.spectral.value(),
        "IO table built"
    );

    Ok(IoTable {
        z,
        a,
        l,
        x,
        q,
        y,
        inversion: inversion.method,
        reciprocal_condition: inversion.reciprocal_condition,
        validation,
        build_advisories,
    })
}
