//! # twf-linalg — Matrix Algebra Kernel
//!
//! Dense linear-algebra primitives over [`nalgebra::DMatrix<f64>`]:
//!
//! - [`invert`]: inversion with an SVD conditioning check and a flagged
//!   Moore–Penrose fallback ([`InversionMethod`]).
//! - [`spectral_radius`]: max |λ| from the real Schur form, with a power
//!   iteration fallback ([`SpectralMethod`]).
//! - [`ops`]: row/column sums, diagonal scalings, the weighted pull product
//!   `diag(W) · L · diag(Y)` and the Leontief identity residual.
//!
//! Nothing here knows about water or tourism. Shapes are checked and
//! reported as [`LinalgError`]; numerical degradation is reported as a value.

pub mod error;
pub mod inverse;
pub mod ops;
pub mod spectral;

pub use error::LinalgError;
pub use inverse::{invert, reciprocal_condition, Inversion, InversionMethod};
pub use ops::{
    col_sums, count_negative, from_rows, hadamard, identity_minus, identity_residual, mat_vec,
    row_sums, scale_cols, scale_rows, to_rows, vec_mat, weighted_pull, NegativeScan,
};
pub use spectral::{spectral_radius, SpectralMethod, SpectralRadius};

/// Dense matrix type used throughout the workspace.
pub type Matrix = nalgebra::DMatrix<f64>;
/// Dense column vector type used throughout the workspace.
pub type Vector = nalgebra::DVector<f64>;
