//! # twf-sda — Structural Decomposition
//!
//! Splits the change in total footprint between two snapshots,
//! `ΔF = W₁L₁Y₁ − W₀L₀Y₀`, into a technology (W), supply-chain structure
//! (L) and demand (Y) effect by averaging the two polar decompositions:
//!
//! ```text
//! polar 0: ΔW·L₀·Y₀ + W₁·ΔL·Y₀ + W₁·L₁·ΔY
//! polar 1: ΔW·L₁·Y₁ + W₀·ΔL·Y₁ + W₀·L₀·ΔY
//! ```
//!
//! Each polar form telescopes to ΔF, so their average does too. The
//! residual `ΔF − ΣE` is still computed and reported: anything beyond
//! floating-point noise is a defect, not an approximation.
//!
//! A decomposition describes one pair of snapshots. [`decompose_consecutive`]
//! only ever pairs adjacent entries of an ordered year list.

pub mod decomposition;
pub mod error;

pub use decomposition::{decompose, decompose_consecutive, Decomposition, Snapshot};
pub use error::SdaError;
