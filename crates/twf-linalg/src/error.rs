use thiserror::Error;
use twf_core::DimensionError;

/// Errors from the matrix kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand shapes are incompatible.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// Row-major input has rows of different lengths.
    #[error("ragged input: row {row} has {actual} columns, expected {expected}")]
    Ragged {
        /// Offending row index.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        actual: usize,
    },

    /// A decomposition failed to converge or produced no result.
    #[error("{operation} failed: {reason}")]
    Decomposition {
        /// Decomposition that failed.
        operation: &'static str,
        /// Reason reported by the solver.
        reason: String,
    },
}

impl From<LinalgError> for twf_core::TwfError {
    fn from(e: LinalgError) -> Self {
        match e {
            LinalgError::Dimension(d) => twf_core::TwfError::Dimension(d),
            other => twf_core::TwfError::MalformedInput(other.to_string()),
        }
    }
}
