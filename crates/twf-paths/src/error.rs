use thiserror::Error;
use twf_core::DimensionError;
use twf_footprint::FootprintError;

/// Errors from path and dependency analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathsError {
    /// Operand shapes are incompatible.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// The pull matrix or output requirement could not be built.
    #[error(transparent)]
    Footprint(#[from] FootprintError),

    /// `k = 0` paths were requested.
    #[error("path ranking needs k >= 1")]
    ZeroTopK,
}

impl From<PathsError> for twf_core::TwfError {
    fn from(e: PathsError) -> Self {
        match e {
            PathsError::Dimension(d) => twf_core::TwfError::Dimension(d),
            PathsError::Footprint(f) => f.into(),
            other => twf_core::TwfError::MalformedInput(other.to_string()),
        }
    }
}
