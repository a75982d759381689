//! # twf-paths — Supply-Chain Path Analyzer
//!
//! Two product-level views of where tourism water comes from:
//!
//! - [`rank_paths`] flattens the dense pull matrix
//!   `pull[i, j] = W[i] · L[i, j] · Y[j]` into (source, destination, water)
//!   triples and keeps the largest `k`. Every strictly positive cell is a
//!   candidate. The matrix is small enough (N ≈ 140) that no sparsity
//!   shortcut is taken.
//! - [`hem`] ranks products by their share of tourism-driven output, a
//!   simplified form of the hypothetical extraction method.
//!
//! Source and destination groups come from the caller's
//! [`twf_core::SectorClassifier`], the same instance the footprint views
//! use.

pub mod error;
pub mod hem;
pub mod ranking;

pub use error::PathsError;
pub use hem::{hem, HemRow};
pub use ranking::{rank_paths, rank_pull, PathGroupSubtotal, PathRanking, PathRow};
