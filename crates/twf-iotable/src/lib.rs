//! # twf-iotable — IO Table Builder
//!
//! Converts one year's supply matrix V, use matrix U and final demand y into
//! the product-by-product IO system under the Product Technology Assumption:
//!
//! ```text
//! q = rowsum(V)             supply-side gross output (floored)
//! D = V / q                 market shares, row-normalised
//! Z = U · Dᵗ                intermediate flows, products × products
//! x = colsum(Z) + y         demand-side gross output (floored)
//! A = Z / x                 technical coefficients, column-normalised
//! L = (I − A)⁻¹             Leontief inverse, pseudo-inverse if singular
//! ```
//!
//! ## Validation
//!
//! Every build runs the checks in [`validation`]; each is a typed value
//! implementing [`Check`] so callers can inspect the numbers, not just a
//! pass/fail line in a log. Failing checks become [`twf_core::Advisory`]
//! values and never abort the build.
//!
//! Cross-year coefficient drift lives in [`drift`], per-year headline
//! numbers in [`summary`].

pub mod builder;
pub mod drift;
pub mod error;
pub mod summary;
pub mod validation;

pub use builder::{build_io, IoTable, SupplyUse};
pub use drift::{compare_coefficients, CoefficientDrift, DriftOutcome};
pub use error::IoTableError;
pub use summary::IoSummary;
pub use validation::{
    validate, Check, ConservationCheck, HawkinsSimonCheck, LeontiefDiagonalCheck, NegativeEntriesCheck,
    RoundTripCheck, SpectralCheck, ValidationReport,
};
