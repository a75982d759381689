use thiserror::Error;
use twf_core::DimensionError;
use twf_linalg::LinalgError;

/// Errors from footprint computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FootprintError {
    /// Operand shapes are incompatible.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// The matrix kernel failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// A water intensity is negative or not finite.
    #[error("water intensity for product index {index} must be finite and non-negative, got {value}")]
    InvalidIntensity {
        /// 0-based product index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// An activity input is negative or not finite.
    #[error("activity field `{field}` must be finite and non-negative, got {value}")]
    InvalidActivity {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
}

impl From<FootprintError> for twf_core::TwfError {
    fn from(e: FootprintError) -> Self {
        match e {
            FootprintError::Dimension(d) => twf_core::TwfError::Dimension(d),
            FootprintError::Linalg(l) => l.into(),
            other => twf_core::TwfError::MalformedInput(other.to_string()),
        }
    }
}
