//! # Economic Consistency Checks
//!
//! Each check is a small value type carrying the numbers it was decided on.
//! [`Check::passed`] gives the verdict, [`Check::advisory`] the structured
//! warning when it failed. [`validate`] runs the full battery on a built
//! table and returns a [`ValidationReport`].

use serde::{Deserialize, Serialize};
use twf_core::numeric::pct_deviation;
use twf_core::{Advisory, Tolerances};
use twf_linalg::{
    col_sums, count_negative, identity_residual, spectral_radius, Matrix, NegativeScan, SpectralRadius,
    Vector,
};

/// Largest `|(I − A)L − I|` entry accepted as floating-point noise.
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-6;

/// A reusable validation check.
pub trait Check {
    /// Short name of the check.
    fn name(&self) -> &'static str;

    /// Whether the condition holds.
    fn passed(&self) -> bool;

    /// Structured warning describing the failure, `None` when passed.
    fn advisory(&self) -> Option<Advisory>;
}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

/// `actual` must be within `tolerance_pct` of `expected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationCheck {
    /// Which balance this is.
    pub label: String,
    /// Observed total.
    pub actual: f64,
    /// Reference total.
    pub expected: f64,
    /// Relative deviation, `None` against a zero reference.
    pub deviation_pct: Option<f64>,
    /// Allowed deviation.
    pub tolerance_pct: f64,
}

impl ConservationCheck {
    /// Compare two totals.
    pub fn new(label: impl Into<String>, actual: f64, expected: f64, tolerance_pct: f64) -> Self {
        Self {
            label: label.into(),
            actual,
            expected,
            deviation_pct: pct_deviation(actual, expected),
            tolerance_pct,
        }
    }
}

impl Check for ConservationCheck {
    fn name(&self) -> &'static str {
        "conservation"
    }

    fn passed(&self) -> bool {
        matches!(self.deviation_pct, Some(d) if d <= self.tolerance_pct)
    }

    fn advisory(&self) -> Option<Advisory> {
        (!self.passed()).then(|| Advisory::ToleranceExceeded {
            check: self.label.clone(),
            actual: self.actual,
            expected: self.expected,
            deviation_pct: self.deviation_pct,
            tolerance_pct: self.tolerance_pct,
        })
    }
}

/// No entries below the noise threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeEntriesCheck {
    /// Matrix name.
    pub matrix: String,
    /// Entries below `-noise`.
    pub count: usize,
    /// Smallest entry.
    pub min_value: f64,
}

impl NegativeEntriesCheck {
    /// Scan a matrix.
    pub fn scan(matrix: impl Into<String>, m: &Matrix, noise: f64) -> Self {
        let NegativeScan { count, min_value } = count_negative(m, noise);
        Self {
            matrix: matrix.into(),
            count,
            min_value,
        }
    }
}

impl Check for NegativeEntriesCheck {
    fn name(&self) -> &'static str {
        "negative_entries"
    }

    fn passed(&self) -> bool {
        self.count == 0
    }

    fn advisory(&self) -> Option<Advisory> {
        (!self.passed()).then(|| Advisory::NegativeEntries {
            matrix: self.matrix.clone(),
            count: self.count,
            most_negative: self.min_value,
        })
    }
}

/// ρ(A) < 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralCheck {
    /// Computed radius, `None` if the eigen-solve failed.
    pub radius: Option<SpectralRadius>,
}

impl SpectralCheck {
    /// Spectral radius value, if computed.
    pub fn value(&self) -> Option<f64> {
        self.radius.map(|r| r.value)
    }
}

impl Check for SpectralCheck {
    fn name(&self) -> &'static str {
        "spectral_radius"
    }

    fn passed(&self) -> bool {
        self.radius.is_some_and(|r| r.is_productive())
    }

    fn advisory(&self) -> Option<Advisory> {
        match self.radius {
            Some(r) if r.is_productive() => None,
            Some(r) => Some(Advisory::UnstableEconomy {
                spectral_radius: r.value,
            }),
            None => Some(Advisory::SpectralRadiusUnavailable {
                matrix: "A".to_string(),
            }),
        }
    }
}

/// Every diagonal entry of L is at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeontiefDiagonalCheck {
    /// Entries below one.
    pub count: usize,
    /// Smallest diagonal entry.
    pub min_value: f64,
}

impl Check for LeontiefDiagonalCheck {
    fn name(&self) -> &'static str {
        "leontief_diagonal"
    }

    fn passed(&self) -> bool {
        self.count == 0
    }

    fn advisory(&self) -> Option<Advisory> {
        (!self.passed()).then_some(Advisory::LeontiefDiagonalBelowOne {
            count: self.count,
            min_value: self.min_value,
        })
    }
}

/// Every column sum of A is below one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HawkinsSimonCheck {
    /// Column sums of A.
    pub column_sums: Vec<f64>,
    /// Columns at or above one.
    pub count: usize,
    /// Largest column sum.
    pub max_column_sum: f64,
}

impl Check for HawkinsSimonCheck {
    fn name(&self) -> &'static str {
        "hawkins_simon"
    }

    fn passed(&self) -> bool {
        self.count == 0
    }

    fn advisory(&self) -> Option<Advisory> {
        (!self.passed()).then_some(Advisory::HawkinsSimonViolated {
            count: self.count,
            max_column_sum: self.max_column_sum,
        })
    }
}

/// `(I − A) L ≈ I`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTripCheck {
    /// Largest absolute deviation from the identity.
    pub max_residual: f64,
    /// Accepted deviation.
    pub tolerance: f64,
}

impl Check for RoundTripCheck {
    fn name(&self) -> &'static str {
        "leontief_round_trip"
    }

    fn passed(&self) -> bool {
        self.max_residual <= self.tolerance
    }

    fn advisory(&self) -> Option<Advisory> {
        (!self.passed()).then_some(Advisory::LeontiefRoundTrip {
            max_residual: self.max_residual,
        })
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// All checks run on one IO table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `sum(x)` vs `sum(q)`.
    pub conservation: ConservationCheck,
    /// `sum(x)` vs `sum(colsum(Z) + y)`.
    pub output_balance: ConservationCheck,
    /// Negative entries in A.
    pub negative_a: NegativeEntriesCheck,
    /// Negative entries in L.
    pub negative_l: NegativeEntriesCheck,
    /// ρ(A) < 1.
    pub spectral: SpectralCheck,
    /// diag(L) ≥ 1.
    pub leontief_diagonal: LeontiefDiagonalCheck,
    /// Column sums of A < 1.
    pub hawkins_simon: HawkinsSimonCheck,
    /// `(I − A) L ≈ I`.
    pub round_trip: RoundTripCheck,
}

impl ValidationReport {
    /// Every check, in report order.
    pub fn checks(&self) -> Vec<&dyn Check> {
        vec![
            &self.conservation,
            &self.output_balance,
            &self.negative_a,
            &self.negative_l,
            &self.spectral,
            &self.leontief_diagonal,
            &self.hawkins_simon,
            &self.round_trip,
        ]
    }

    /// Whether every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks().iter().all(|c| c.passed())
    }

    /// Advisories for the failed checks.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.checks().iter().filter_map(|c| c.advisory()).collect()
    }
}

/// Run every check on a built system.
pub fn validate(
    z: &Matrix,
    a: &Matrix,
    l: &Matrix,
    x: &Vector,
    q: &Vector,
    y: &Vector,
    tolerances: &Tolerances,
) -> ValidationReport {
    let x_total = x.sum();
    let balance_total = col_sums(z).sum() + y.sum();

    let column_sums: Vec<f64> = col_sums(a).iter().copied().collect();
    let hs_count = column_sums.iter().filter(|&&s| s >= 1.0).count();
    let max_column_sum = column_sums.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let diag = l.diagonal();
    let diag_count = diag.iter().filter(|&&d| d < 1.0).count();
    let diag_min = diag.iter().copied().fold(f64::INFINITY, f64::min);

    let spectral = match spectral_radius(a) {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::warn!(error = %e, "spectral radius unavailable");
            None
        }
    };

    let max_residual = identity_residual(a, l).unwrap_or(f64::INFINITY);

    ValidationReport {
        conservation: ConservationCheck::new(
            "demand-side x vs supply-side q",
            x_total,
            q.sum(),
            tolerances.conservation_pct,
        ),
        output_balance: ConservationCheck::new(
            "output balance",
            x_total,
            balance_total,
            tolerances.output_balance_pct,
        ),
        negative_a: NegativeEntriesCheck::scan("A", a, tolerances.negative_noise),
        negative_l: NegativeEntriesCheck::scan("L", l, tolerances.negative_noise),
        spectral: SpectralCheck { radius: spectral },
        leontief_diagonal: LeontiefDiagonalCheck {
            count: diag_count,
            min_value: diag_min,
        },
        hawkins_simon: HawkinsSimonCheck {
            column_sums,
            count: hs_count,
            max_column_sum,
        },
        round_trip: RoundTripCheck {
            max_residual,
            tolerance: ROUND_TRIP_TOLERANCE,
        },
    }
}
