use thiserror::Error;
use twf_core::DimensionError;
use twf_linalg::LinalgError;

/// Errors from the decomposition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdaError {
    /// The two snapshots do not have the same shape.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// A matrix product failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

impl From<SdaError> for twf_core::TwfError {
    fn from(e: SdaError) -> Self {
        match e {
            SdaError::Dimension(d) => twf_core::TwfError::Dimension(d),
            SdaError::Linalg(l) => l.into(),
        }
    }
}
