//! # twf-core — Foundational Types for the Tourism Water Footprint Engine
//!
//! Every other crate in the workspace depends on `twf-core`; it depends on
//! nothing internal. It defines the vocabulary shared by the IO table
//! builder, the footprint propagator and the cross-year analyses.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit configuration.** [`TwfConfig`] is passed into every
//!    component call. There is no module-level state, so tests can build
//!    synthetic configs without interfering with each other.
//!
//! 2. **Advisories are values.** Stability violations, tolerance
//!    exceedances and clamping are reported as [`Advisory`] values with the
//!    numbers needed to act on them. They never abort a computation.
//!
//! 3. **Data-quality flags are a separate category.** A multiplier that
//!    drops to exactly zero between years is a [`DataQualityFlag`], not an
//!    advisory and not an efficiency gain.
//!
//! 4. **One classifier.** [`SectorClassifier`] is the only mapping from
//!    product ID to [`SourceGroup`]. Every component that attributes water
//!    to a source group receives the same instance.
//!
//! 5. **One safe-divide floor.** [`numeric::floor_denominator`] is the only
//!    place near-zero denominators are clamped.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `twf-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod advisory;
pub mod config;
pub mod error;
pub mod numeric;
pub mod sector;

pub use advisory::{Advisory, DataQualityFlag, YearAdvisory};
pub use config::{
    MonteCarloSettings, PathSettings, StudyYear, Tolerances, TwfConfig, DEFAULT_SAFE_DIVIDE_FLOOR,
};
pub use error::{ConfigError, DimensionError, TwfError};
pub use sector::{DemandCategory, GroupRange, ProductId, SectorClassifier, SourceGroup};
