use thiserror::Error;
use twf_core::DimensionError;
use twf_linalg::LinalgError;

/// Errors from the IO table builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IoTableError {
    /// A required matrix or vector has no entries.
    #[error("{0} is empty")]
    Empty(&'static str),

    /// Supply and use disagree on the industry axis.
    #[error("supply has {supply_industries} industries, use has {use_industries}")]
    IndustryMismatch {
        /// Columns of V.
        supply_industries: usize,
        /// Columns of U.
        use_industries: usize,
    },

    /// Operand shapes are incompatible.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// The matrix kernel failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

impl From<IoTableError> for twf_core::TwfError {
    fn from(e: IoTableError) -> Self {
        match e {
            IoTableError::Dimension(d) => twf_core::TwfError::Dimension(d),
            IoTableError::Linalg(l) => l.into(),
            other => twf_core::TwfError::MalformedInput(other.to_string()),
        }
    }
}
