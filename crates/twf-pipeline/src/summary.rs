//! End-of-run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use twf_core::{DataQualityFlag, TwfError, YearAdvisory};

/// A study year that could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedYear {
    /// Study year label.
    pub year: String,
    /// Why it was skipped.
    pub reason: String,
}

/// A cross-year analysis that could not be run for a pair of years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossYearFailure {
    /// Analysis name.
    pub analysis: String,
    /// Earlier year.
    pub from_year: String,
    /// Later year.
    pub to_year: String,
    /// Why it failed.
    pub reason: String,
}

/// What happened in a run: which years succeeded, which were skipped and
/// why, and every advisory and data-quality flag raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the summary was produced.
    pub generated_at: DateTime<Utc>,
    /// Years that completed, in configuration order.
    pub succeeded: Vec<String>,
    /// Years that were skipped.
    pub skipped: Vec<SkippedYear>,
    /// Years whose Leontief inverse is a pseudo-inverse.
    pub pseudo_inverse_years: Vec<String>,
    /// Every advisory, tagged by year.
    pub advisories: Vec<YearAdvisory>,
    /// Suspected source-data revisions, kept apart from advisories.
    pub data_quality_flags: Vec<DataQualityFlag>,
    /// Cross-year analyses that could not run.
    pub cross_year_failures: Vec<CrossYearFailure>,
}

impl RunSummary {
    /// Summary stamped with the current UTC time.
    pub fn new(
        succeeded: Vec<String>,
        skipped: Vec<SkippedYear>,
        pseudo_inverse_years: Vec<String>,
        advisories: Vec<YearAdvisory>,
        data_quality_flags: Vec<DataQualityFlag>,
        cross_year_failures: Vec<CrossYearFailure>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            succeeded,
            skipped,
            pseudo_inverse_years,
            advisories,
            data_quality_flags,
            cross_year_failures,
        }
    }

    /// No skipped years, advisories, flags or failed analyses.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
            && self.advisories.is_empty()
            && self.data_quality_flags.is_empty()
            && self.cross_year_failures.is_empty()
    }

    /// Advisories raised for one year.
    pub fn advisories_for<'a>(&'a self, year: &'a str) -> impl Iterator<Item = &'a YearAdvisory> + 'a {
        self.advisories.iter().filter(move |a| a.year.as_deref() == Some(year))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TwfError> {
        serde_json::to_string_pretty(self).map_err(|e| TwfError::Serialization(e.to_string()))
    }

    /// Log the summary at `info`, skipped years at `warn`.
    pub fn log(&self) {
        tracing::info!(
            succeeded = self.succeeded.len(),
            skipped = self.skipped.len(),
            advisories = self.advisories.len(),
            data_quality_flags = self.data_quality_flags.len(),
            pseudo_inverse_years = ?self.pseudo_inverse_years,
            "run complete"
        );
        for s in &self.skipped {
            tracing::warn!(year = %s.year, reason = %s.reason, "year excluded from cross-year results");
        }
    }
}
