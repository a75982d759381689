//! # Multiplier Trends
//!
//! Compares the water multiplier WL product by product between two years.
//! A multiplier that was positive and became exactly zero is almost always
//! a revision of the source extraction data. It is classified as
//! [`MultiplierTrend::Artifact`] and reported as a
//! [`DataQualityFlag::MultiplierArtifact`], never counted as an
//! improvement. The rows stay in the report.

use serde::{Deserialize, Serialize};
use twf_core::sector::product_id;
use twf_core::{DataQualityFlag, DimensionError, ProductId};
use twf_linalg::Vector;

use crate::FootprintError;

/// How one product's multiplier moved between two years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trend", rename_all = "snake_case")]
pub enum MultiplierTrend {
    /// Positive in the earlier year, exactly zero in the later one.
    Artifact,
    /// Decreased and stayed positive.
    GenuineImprovement {
        /// Signed change, percent.
        change_pct: f64,
    },
    /// Increased.
    GenuineDeterioration {
        /// Signed change, percent.
        change_pct: f64,
    },
    /// Unchanged.
    NoChange,
    /// Zero or negative in the earlier year; no relative change exists.
    NoBaseline,
}

impl MultiplierTrend {
    /// Whether this is a suspected data artifact.
    pub fn is_artifact(&self) -> bool {
        matches!(self, Self::Artifact)
    }
}

/// Classify the move from `base` to `current`.
pub fn classify_trend(base: f64, current: f64) -> MultiplierTrend {
    if base <= 0.0 {
        return MultiplierTrend::NoBaseline;
    }
    if current == 0.0 {
        return MultiplierTrend::Artifact;
    }
    let change_pct = 100.0 * (current - base) / base;
    if current < base {
        MultiplierTrend::GenuineImprovement { change_pct }
    } else if current > base {
        MultiplierTrend::GenuineDeterioration { change_pct }
    } else {
        MultiplierTrend::NoChange
    }
}

/// One product's multipliers and trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierComparison {
    /// Product.
    pub product: ProductId,
    /// Earlier multiplier, m³ per crore.
    pub base: f64,
    /// Later multiplier, m³ per crore.
    pub current: f64,
    /// Classification.
    pub trend: MultiplierTrend,
}

/// All products' trends between two years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierReport {
    /// Earlier year.
    pub from_year: String,
    /// Later year.
    pub to_year: String,
    /// One row per product, in product order.
    pub rows: Vec<MultiplierComparison>,
    /// Artifact rows as data-quality flags.
    pub flags: Vec<DataQualityFlag>,
}

impl MultiplierReport {
    /// Products that genuinely improved.
    pub fn improvements(&self) -> impl Iterator<Item = &MultiplierComparison> {
        self.rows
            .iter()
            .filter(|r| matches!(r.trend, MultiplierTrend::GenuineImprovement { .. }))
    }

    /// Products that deteriorated.
    pub fn deteriorations(&self) -> impl Iterator<Item = &MultiplierComparison> {
        self.rows
            .iter()
            .filter(|r| matches!(r.trend, MultiplierTrend::GenuineDeterioration { .. }))
    }

    /// Products flagged as artifacts.
    pub fn artifacts(&self) -> impl Iterator<Item = &MultiplierComparison> {
        self.rows.iter().filter(|r| r.trend.is_artifact())
    }
}

/// Classify every product's multiplier move from `from_year` to `to_year`.
pub fn compare_multipliers(
    from_year: &str,
    wl_from: &Vector,
    to_year: &str,
    wl_to: &Vector,
) -> Result<MultiplierReport, FootprintError> {
    DimensionError::check_len("compare_multipliers", wl_from.len(), wl_to.len())?;

    let rows: Vec<MultiplierComparison> = wl_from
        .iter()
        .zip(wl_to.iter())
        .enumerate()
        .map(|(i, (&base, &current))| MultiplierComparison {
            product: product_id(i),
            base,
            current,
            trend: classify_trend(base, current),
        })
        .collect();

    let flags: Vec<DataQualityFlag> = rows
        .iter()
        .filter(|r| r.trend.is_artifact())
        .map(|r| DataQualityFlag::MultiplierArtifact {
            product: r.product,
            from_year: from_year.to_string(),
            to_year: to_year.to_string(),
            base: r.base,
        })
        .collect();
    for flag in &flags {
        tracing::warn!(from_year, to_year, "{flag}");
    }

    Ok(MultiplierReport {
        from_year: from_year.to_string(),
        to_year: to_year.to_string(),
        rows,
        flags,
    })
}
