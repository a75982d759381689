//! # Advisories and Data-Quality Flags
//!
//! Conditions that make a result suspect without making it unusable. Each
//! variant carries the numbers a reader needs to judge it (actual vs.
//! expected, deviation, counts). Producers return advisories alongside their
//! results and also log them at `warn` level through [`Advisory::emit`].
//!
//! [`DataQualityFlag`] is deliberately a different type: it marks input
//! revisions that would otherwise read as real-world change (a multiplier
//! collapsing to exactly zero is an upstream data revision, not an
//! efficiency gain). Run summaries report the two categories separately.

use serde::{Deserialize, Serialize};

use crate::sector::ProductId;

/// An advisory condition. Never aborts a computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A balance or conservation check exceeded its tolerance.
    ToleranceExceeded {
        /// Name of the check.
        check: String,
        /// Observed value.
        actual: f64,
        /// Reference value.
        expected: f64,
        /// Relative deviation in percent; `None` when the reference is zero.
        deviation_pct: Option<f64>,
        /// Allowed deviation in percent.
        tolerance_pct: f64,
    },

    /// A matrix that should be non-negative has negative entries.
    NegativeEntries {
        /// Matrix name.
        matrix: String,
        /// Number of entries below the noise threshold.
        count: usize,
        /// The most negative entry.
        most_negative: f64,
    },

    /// Spectral radius of A is at least one.
    UnstableEconomy {
        /// Computed spectral radius.
        spectral_radius: f64,
    },

    /// The spectral radius could not be computed.
    SpectralRadiusUnavailable {
        /// Matrix name.
        matrix: String,
    },

    /// Diagonal entries of L below one.
    LeontiefDiagonalBelowOne {
        /// Number of offending entries.
        count: usize,
        /// Smallest diagonal entry.
        min_value: f64,
    },

    /// Column sums of A at or above one.
    HawkinsSimonViolated {
        /// Number of offending columns.
        count: usize,
        /// Largest column sum.
        max_column_sum: f64,
    },

    /// `(I - A) L` differs from the identity by more than floating noise.
    LeontiefRoundTrip {
        /// Largest absolute deviation from the identity.
        max_residual: f64,
    },

    /// `I - A` was singular or ill-conditioned; L is a pseudo-inverse.
    PseudoInverseFallback {
        /// Reciprocal condition number of `I - A`.
        reciprocal_condition: f64,
    },

    /// Supply, use and final-demand row counts disagreed and were trimmed.
    RowCountMismatch {
        /// Rows in the supply matrix.
        supply_rows: usize,
        /// Rows in the use matrix.
        use_rows: usize,
        /// Length of the final-demand vector.
        demand_len: usize,
        /// Common length kept.
        trimmed_to: usize,
    },

    /// Column sums of A shifted more than the threshold between two years.
    CoefficientDrift {
        /// Earlier year.
        from_year: String,
        /// Later year.
        to_year: String,
        /// Product IDs whose column sum shifted beyond the threshold.
        products: Vec<ProductId>,
        /// Largest absolute shift in percent.
        max_shift_pct: f64,
        /// Threshold in percent.
        threshold_pct: f64,
    },

    /// A matrices of two years cannot be compared.
    CoefficientShapeMismatch {
        /// Earlier year.
        from_year: String,
        /// Later year.
        to_year: String,
        /// Dimension of the earlier A.
        from_dim: usize,
        /// Dimension of the later A.
        to_dim: usize,
    },

    /// The decomposition identity residual exceeded its tolerance.
    DecompositionResidual {
        /// Earlier year.
        from_year: String,
        /// Later year.
        to_year: String,
        /// Absolute residual.
        residual: f64,
        /// Residual as percent of the absolute change.
        residual_pct: f64,
        /// Allowed residual in percent.
        tolerance_pct: f64,
    },

    /// Monte Carlo samples were clamped to physical bounds.
    SamplesClamped {
        /// Parameter name.
        parameter: String,
        /// Number of clamped draws.
        count: usize,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// A source sector is claimed by more than one concordance category.
    DuplicateSourceAssignment {
        /// Source-sector index.
        source_sector: usize,
        /// Category that claimed it first.
        first_category: String,
        /// Category that claimed it again.
        second_category: String,
    },

    /// A concordance row referenced an index outside the economy.
    OutOfRangeReference {
        /// Category making the reference.
        category: String,
        /// The referenced ID or index.
        reference: usize,
        /// Size of the referenced axis.
        bound: usize,
    },
}

impl Advisory {
    /// Short machine-friendly name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToleranceExceeded { .. } => "tolerance_exceeded",
            Self::NegativeEntries { .. } => "negative_entries",
            Self::UnstableEconomy { .. } => "unstable_economy",
            Self::SpectralRadiusUnavailable { .. } => "spectral_radius_unavailable",
            Self::LeontiefDiagonalBelowOne { .. } => "leontief_diagonal_below_one",
            Self::HawkinsSimonViolated { .. } => "hawkins_simon_violated",
            Self::LeontiefRoundTrip { .. } => "leontief_round_trip",
            Self::PseudoInverseFallback { .. } => "pseudo_inverse_fallback",
            Self::RowCountMismatch { .. } => "row_count_mismatch",
            Self::CoefficientDrift { .. } => "coefficient_drift",
            Self::CoefficientShapeMismatch { .. } => "coefficient_shape_mismatch",
            Self::DecompositionResidual { .. } => "decomposition_residual",
            Self::SamplesClamped { .. } => "samples_clamped",
            Self::DuplicateSourceAssignment { .. } => "duplicate_source_assignment",
            Self::OutOfRangeReference { .. } => "out_of_range_reference",
        }
    }

    /// Log this advisory at `warn` level.
    pub fn emit(&self, year: Option<&str>) {
        tracing::warn!(year = year.unwrap_or("-"), kind = self.kind(), "{self}");
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToleranceExceeded {
                check,
                actual,
                expected,
                deviation_pct,
                tolerance_pct,
            } => match deviation_pct {
                Some(d) => write!(
                    f,
                    "{check}: {actual:.3} vs {expected:.3} (deviation {d:.3}% > {tolerance_pct}%)"
                ),
                None => write!(f, "{check}: {actual:.3} vs zero reference"),
            },
            Self::NegativeEntries {
                matrix,
                count,
                most_negative,
            } => write!(f, "{matrix} has {count} negative entries (min {most_negative:e})"),
            Self::UnstableEconomy { spectral_radius } => write!(
                f,
                "spectral radius {spectral_radius:.6} >= 1; economy may not be productive"
            ),
            Self::SpectralRadiusUnavailable { matrix } => {
                write!(f, "spectral radius of {matrix} could not be computed")
            }
            Self::LeontiefDiagonalBelowOne { count, min_value } => {
                write!(f, "{count} diagonal entries of L below 1 (min {min_value:.6})")
            }
            Self::HawkinsSimonViolated {
                count,
                max_column_sum,
            } => write!(
                f,
                "{count} column sums of A >= 1 (max {max_column_sum:.6}); Hawkins-Simon violated"
            ),
            Self::LeontiefRoundTrip { max_residual } => {
                write!(f, "(I - A) L deviates from I by up to {max_residual:e}")
            }
            Self::PseudoInverseFallback {
                reciprocal_condition,
            } => write!(
                f,
                "I - A singular (rcond {reciprocal_condition:e}); L is a pseudo-inverse"
            ),
            Self::RowCountMismatch {
                supply_rows,
                use_rows,
                demand_len,
                trimmed_to,
            } => write!(
                f,
                "row mismatch (supply {supply_rows}, use {use_rows}, demand {demand_len}); trimmed to {trimmed_to}"
            ),
            Self::CoefficientDrift {
                from_year,
                to_year,
                products,
                max_shift_pct,
                threshold_pct,
            } => write!(
                f,
                "{} sectors shifted more than {threshold_pct}% between {from_year} and {to_year} (max {max_shift_pct:.1}%)",
                products.len()
            ),
            Self::CoefficientShapeMismatch {
                from_year,
                to_year,
                from_dim,
                to_dim,
            } => write!(
                f,
                "cannot compare A matrices of {from_year} ({from_dim}) and {to_year} ({to_dim})"
            ),
            Self::DecompositionResidual {
                from_year,
                to_year,
                residual,
                residual_pct,
                tolerance_pct,
            } => write!(
                f,
                "decomposition {from_year}->{to_year} residual {residual:e} ({residual_pct:.4}% > {tolerance_pct}%)"
            ),
            Self::SamplesClamped {
                parameter,
                count,
                lower,
                upper,
            } => write!(f, "{count} draws of {parameter} clamped to [{lower}, {upper}]"),
            Self::DuplicateSourceAssignment {
                source_sector,
                first_category,
                second_category,
            } => write!(
                f,
                "source sector {source_sector} claimed by {first_category} and {second_category}"
            ),
            Self::OutOfRangeReference {
                category,
                reference,
                bound,
            } => write!(f, "{category} references {reference}, outside an axis of length {bound}"),
        }
    }
}

/// An advisory tagged with the study year it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAdvisory {
    /// Study year label, `None` for cross-year advisories.
    pub year: Option<String>,
    /// The advisory.
    pub advisory: Advisory,
}

/// A suspected upstream data revision, reported apart from advisories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityFlag {
    /// A water multiplier that was positive became exactly zero.
    MultiplierArtifact {
        /// Affected product.
        product: ProductId,
        /// Earlier year.
        from_year: String,
        /// Later year.
        to_year: String,
        /// Multiplier in the earlier year.
        base: f64,
    },

    /// Per-tourist-day intensity moved more than the threshold between years.
    TouristIntensityShift {
        /// Earlier year.
        from_year: String,
        /// Later year.
        to_year: String,
        /// Change in litres per tourist-day, percent.
        change_pct: f64,
        /// Change in total footprint, percent.
        footprint_change_pct: f64,
        /// Change in tourist-days, percent.
        tourist_days_change_pct: f64,
    },
}

impl std::fmt::Display for DataQualityFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultiplierArtifact {
                product,
                from_year,
                to_year,
                base,
            } => write!(
                f,
                "product {product}: multiplier {base:.2} in {from_year} became zero in {to_year}; source data revision, not an efficiency gain"
            ),
            Self::TouristIntensityShift {
                from_year,
                to_year,
                change_pct,
                footprint_change_pct,
                tourist_days_change_pct,
            } => write!(
                f,
                "per-tourist intensity {from_year}->{to_year} changed {change_pct:+.1}% (footprint {footprint_change_pct:+.1}%, tourist-days {tourist_days_change_pct:+.1}%)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_serializes_with_kind_tag() {
        let a = Advisory::UnstableEconomy {
            spectral_radius: 1.02,
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["kind"], "unstable_economy");
        assert_eq!(json["spectral_radius"], 1.02);
        assert_eq!(a.kind(), "unstable_economy");
    }

    #[test]
    fn tolerance_message_handles_zero_reference() {
        let a = Advisory::ToleranceExceeded {
            check: "output balance".into(),
            actual: 3.0,
            expected: 0.0,
            deviation_pct: None,
            tolerance_pct: 1.0,
        };
        assert!(a.to_string().contains("zero reference"));
    }

    #[test]
    fn artifact_flag_names_the_revision() {
        let flag = DataQualityFlag::MultiplierArtifact {
            product: 12,
            from_year: "2015".into(),
            to_year: "2022".into(),
            base: 840.0,
        };
        let text = flag.to_string();
        assert!(text.contains("product 12"));
        assert!(text.contains("not an efficiency gain"));
    }
}
