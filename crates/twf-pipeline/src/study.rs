//! # Multi-Year Study
//!
//! Each study year is built and analysed in isolation. A year that fails
//! is recorded as skipped with its reason and drops out of every cross-year
//! analysis; the rest continue. Cross-year analyses only ever pair years
//! that both succeeded, in configuration order.

use rayon::prelude::*;
use twf_core::numeric::pct_change;
use twf_core::{DataQualityFlag, TwfConfig, YearAdvisory};
use twf_footprint::{compare_multipliers, MultiplierReport};
use twf_iotable::{compare_coefficients, DriftOutcome};
use twf_sda::{decompose_consecutive, Decomposition, Snapshot};

use crate::summary::{CrossYearFailure, RunSummary, SkippedYear};
use crate::trends::{category_trends, year_totals, CategoryTrend, YearTotals};
use crate::year::{process_year, YearResult};
use crate::{PipelineError, StudyInputs};

/// Switches for optional work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Build years on the rayon pool.
    pub parallel_years: bool,
    /// Run the Monte Carlo engine for every year.
    pub monte_carlo: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel_years: true,
            monte_carlo: true,
        }
    }
}

/// Results of every analysis that spans two or more years.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossYear {
    /// A column-sum drift for each consecutive pair.
    pub drift: Vec<DriftOutcome>,
    /// Footprint change decomposition for each consecutive pair.
    pub decompositions: Vec<Decomposition>,
    /// Multiplier trend from the first to the last successful year.
    pub multipliers: Option<MultiplierReport>,
    /// Per-tourist-day intensity moves beyond the threshold.
    pub intensity_shifts: Vec<DataQualityFlag>,
    /// Indirect, direct and total water of every successful year.
    pub totals: Vec<YearTotals>,
    /// Category water across years, largest mover first.
    pub category_trends: Vec<CategoryTrend>,
}

/// A full multi-year run.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyResult {
    /// Successful years, in configuration order.
    pub years: Vec<YearResult>,
    /// Cross-year analyses over the successful years.
    pub cross_year: CrossYear,
    /// End-of-run summary.
    pub summary: RunSummary,
}

impl StudyResult {
    /// Result for one year, if it succeeded.
    pub fn year(&self, label: &str) -> Option<&YearResult> {
        self.years.iter().find(|y| y.year.label == label)
    }
}

fn intensity_shifts(years: &[YearResult], threshold_pct: f64) -> Vec<DataQualityFlag> {
    let with_direct: Vec<&YearResult> = years.iter().filter(|y| y.direct.is_some()).collect();
    let mut flags = Vec::new();
    for pair in with_direct.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let (Some(a), Some(b)) = (&prev.direct, &next.direct) else {
            continue;
        };
        let Some(change_pct) = pct_change(a.tourist_intensity.all, b.tourist_intensity.all) else {
            continue;
        };
        tracing::debug!(
            from_year = %prev.year.label,
            to_year = %next.year.label,
            change_pct,
            "per-tourist intensity change"
        );
        if change_pct.abs() > threshold_pct {
            let flag = DataQualityFlag::TouristIntensityShift {
                from_year: prev.year.label.clone(),
                to_year: next.year.label.clone(),
                change_pct,
                footprint_change_pct: pct_change(prev.total_water(), next.total_water()).unwrap_or(0.0),
                tourist_days_change_pct: pct_change(
                    a.tourist_intensity.days.total(),
                    b.tourist_intensity.days.total(),
                )
                .unwrap_or(0.0),
            };
            tracing::warn!(year = %next.year.label, "{flag}");
            flags.push(flag);
        }
    }
    flags
}

fn cross_year(
    config: &TwfConfig,
    years: &[YearResult],
    advisories: &mut Vec<YearAdvisory>,
    failures: &mut Vec<CrossYearFailure>,
) -> CrossYear {
    let tol = &config.tolerances;
    let _span = tracing::info_span!("cross_year", years = years.len()).entered();

    let drift: Vec<DriftOutcome> = years
        .windows(2)
        .map(|p| {
            compare_coefficients(
                &p[0].year.label,
                &p[0].table.a,
                &p[1].year.label,
                &p[1].table.a,
                tol.a_drift_threshold_pct,
            )
        })
        .collect();
    advisories.extend(drift.iter().filter_map(DriftOutcome::advisory).map(|advisory| YearAdvisory {
        year: None,
        advisory,
    }));

    let snapshots: Vec<Snapshot<'_>> = years
        .iter()
        .map(|y| Snapshot::new(&y.year.label, &y.w, &y.table.l, &y.y))
        .collect();
    let mut decompositions = Vec::new();
    for (pair, outcome) in years.windows(2).zip(decompose_consecutive(&snapshots, tol.sda_residual_pct)) {
        match outcome {
            Ok(d) => {
                if let Some(advisory) = d.advisory() {
                    advisories.push(YearAdvisory { year: None, advisory });
                }
                decompositions.push(d);
            }
            Err(e) => {
                tracing::warn!(from_year = %pair[0].year.label, to_year = %pair[1].year.label, error = %e, "decomposition skipped");
                failures.push(CrossYearFailure {
                    analysis: "decomposition".to_string(),
                    from_year: pair[0].year.label.clone(),
                    to_year: pair[1].year.label.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let multipliers = match (years.first(), years.last()) {
        (Some(first), Some(last)) if years.len() >= 2 => {
            match compare_multipliers(
                &first.year.label,
                &first.propagation.wl,
                &last.year.label,
                &last.propagation.wl,
            ) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!(error = %e, "multiplier comparison skipped");
                    failures.push(CrossYearFailure {
                        analysis: "multiplier trend".to_string(),
                        from_year: first.year.label.clone(),
                        to_year: last.year.label.clone(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        }
        _ => None,
    };

    let category_trends = category_trends(years);
    for trend in category_trends.iter().take(5) {
        if let Some(change_pct) = trend.change_pct {
            tracing::info!(category = %trend.category_name, change_pct, "category footprint trend");
        }
    }

    CrossYear {
        drift,
        decompositions,
        multipliers,
        intensity_shifts: intensity_shifts(years, tol.intensity_shift_pct),
        totals: year_totals(years),
        category_trends,
    }
}

/// Run every configured study year and the cross-year analyses.
///
/// Returns `Err` only for an invalid configuration. Per-year failures are
/// listed in [`RunSummary::skipped`].
pub fn run_study(
    config: &TwfConfig,
    inputs: &StudyInputs,
    options: &RunOptions,
) -> Result<StudyResult, PipelineError> {
    config.validate()?;
    for label in inputs.keys() {
        if config.year(label).is_err() {
            tracing::warn!(year = %label, "inputs supplied for a year that is not configured; ignored");
        }
    }

    let run_one = |study_year: &twf_core::StudyYear| {
        let _span = tracing::info_span!("year", year = %study_year.label).entered();
        let outcome = process_year(config, study_year, inputs.get(&study_year.label), options);
        if let Err(e) = &outcome {
            tracing::error!(error = %e, "study year skipped");
        }
        outcome
    };
    let outcomes: Vec<Result<YearResult, PipelineError>> = if options.parallel_years {
        config.study_years.par_iter().map(run_one).collect()
    } else {
        config.study_years.iter().map(run_one).collect()
    };

    let mut years = Vec::new();
    let mut skipped = Vec::new();
    let mut advisories = Vec::new();
    for (study_year, outcome) in config.study_years.iter().zip(outcomes) {
        match outcome {
            Ok(result) => {
                advisories.extend(result.advisories.iter().cloned().map(|advisory| YearAdvisory {
                    year: Some(study_year.label.clone()),
                    advisory,
                }));
                years.push(result);
            }
            Err(e) => skipped.push(SkippedYear {
                year: study_year.label.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let mut failures = Vec::new();
    let cross_year = cross_year(config, &years, &mut advisories, &mut failures);

    let mut data_quality_flags: Vec<DataQualityFlag> = cross_year
        .multipliers
        .as_ref()
        .map(|m| m.flags.clone())
        .unwrap_or_default();
    data_quality_flags.extend(cross_year.intensity_shifts.iter().cloned());

    let summary = RunSummary::new(
        years.iter().map(|y| y.year.label.clone()).collect(),
        skipped,
        years
            .iter()
            .filter(|y| y.table.inversion.is_degraded())
            .map(|y| y.year.label.clone())
            .collect(),
        advisories,
        data_quality_flags,
        failures,
    );
    summary.log();

    Ok(StudyResult {
        years,
        cross_year,
        summary,
    })
}
