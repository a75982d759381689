//! # twf-montecarlo — Uncertainty Engine
//!
//! Propagates parameter uncertainty through the footprint. Each uncertain
//! input is a multiplier on its base value with its own [`Distribution`];
//! [`run_monte_carlo`] draws `N` multiplier sets, evaluates indirect and
//! direct water for each, and summarises the total as a percentile band
//! plus a Spearman rank-correlation attribution per parameter.
//!
//! Results are reproducible: the same seed and inputs give identical
//! draws regardless of how many threads evaluate them.

pub mod distribution;
pub mod engine;
pub mod error;
pub mod parameters;
pub mod stats;

pub use distribution::{Distribution, Sampler};
pub use engine::{
    run_monte_carlo, DirectInputs, Draw, MonteCarloInputs, MonteCarloResult, ParameterSamples, VarianceShare,
};
pub use error::MonteCarloError;
pub use parameters::{default_parameters, Parameter, ParameterTarget};
pub use stats::{average_ranks, percentile, spearman, Percentiles};
