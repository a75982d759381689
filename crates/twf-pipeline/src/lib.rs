//! # twf-pipeline — Study Orchestration
//!
//! Runs every configured study year through the IO builder, footprint
//! propagator, Monte Carlo engine and path analyzer, then the cross-year
//! analyses over the years that succeeded.
//!
//! ## Staging
//!
//! All inputs are loaded into [`YearInputs`] before [`run_study`] starts.
//! Years share no mutable state and may be built in parallel; results are
//! collected back in configuration order so parallelism never changes the
//! output.
//!
//! ## Failure Isolation
//!
//! A year with missing or malformed input is skipped and named in
//! [`RunSummary::skipped`]. Cross-year aggregates never include it. Every
//! run ends with a [`RunSummary`], including runs where every year
//! succeeded.

pub mod error;
pub mod inputs;
pub mod study;
pub mod summary;
pub mod trends;
pub mod year;

pub use error::PipelineError;
pub use inputs::{StudyInputs, YearInputs};
pub use study::{run_study, CrossYear, RunOptions, StudyResult};
pub use summary::{CrossYearFailure, RunSummary, SkippedYear};
pub use trends::{category_trends, year_totals, CategoryTrend, YearTotals, YearValue};
pub use year::{process_year, DirectResult, YearResult};
