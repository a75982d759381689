//! # Error Types — Structured Error Hierarchy
//!
//! Only missing or malformed required input is an error in this workspace.
//! Everything that is merely suspicious (an unstable economy, a failed
//! conservation check, a clamped sample) is an [`crate::Advisory`] instead.
//!
//! ## Design
//!
//! - Dimension errors name the operation and both shapes involved.
//! - Configuration errors name the offending field.

use thiserror::Error;

/// Top-level error type for the footprint engine.
#[derive(Error, Debug)]
pub enum TwfError {
    /// Operand shapes are incompatible.
    #[error("dimension error: {0}")]
    Dimension(#[from] DimensionError),

    /// Configuration failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required input was absent.
    #[error("missing input `{input}` for year {year}")]
    MissingInput {
        /// Study year label.
        year: String,
        /// Name of the absent input.
        input: String,
    },

    /// Input was present but could not be interpreted.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Incompatible operand dimensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    /// A vector length does not match the matrix dimension it meets.
    #[error("{context}: expected length {expected}, got {actual}")]
    LengthMismatch {
        /// Operation that detected the mismatch.
        context: String,
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// A matrix that must be square is not.
    #[error("{context}: matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Operation that detected the mismatch.
        context: String,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Two matrices that must share a shape do not.
    #[error("{context}: shape {left_rows}x{left_cols} does not match {right_rows}x{right_cols}")]
    ShapeMismatch {
        /// Operation that detected the mismatch.
        context: String,
        /// Left operand rows.
        left_rows: usize,
        /// Left operand columns.
        left_cols: usize,
        /// Right operand rows.
        right_rows: usize,
        /// Right operand columns.
        right_cols: usize,
    },

    /// An operation received an empty operand.
    #[error("{0}: operand is empty")]
    Empty(String),
}

impl DimensionError {
    /// Return `Ok(())` when `actual == expected`, a [`DimensionError::LengthMismatch`] otherwise.
    pub fn check_len(context: &str, expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                context: context.to_string(),
                expected,
                actual,
            })
        }
    }
}

/// Configuration validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No study years were configured.
    #[error("at least one study year is required")]
    NoStudyYears,

    /// The same study-year label appears twice.
    #[error("duplicate study year label: {0}")]
    DuplicateYear(String),

    /// A CPI value is zero, negative or not finite.
    #[error("CPI for {year} must be positive and finite, got {value}")]
    InvalidCpi {
        /// Study year label.
        year: String,
        /// Offending CPI value.
        value: f64,
    },

    /// The configured base price year is not one of the study years.
    #[error("base price year {0} is not a configured study year")]
    UnknownBaseYear(String),

    /// A year label was looked up but is not configured.
    #[error("unknown study year: {0}")]
    UnknownYear(String),

    /// A numeric setting is outside its allowed range.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// Field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
