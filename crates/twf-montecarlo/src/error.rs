use thiserror::Error;
use twf_footprint::FootprintError;

/// Errors from the Monte Carlo engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonteCarloError {
    /// No draws were requested.
    #[error("monte carlo needs at least one draw")]
    ZeroDraws,

    /// A rank correlation needs two or more paired values.
    #[error("rank correlation needs at least 2 draws, got {got}")]
    TooFewDraws {
        /// Draws available.
        got: usize,
    },

    /// Paired series of different length.
    #[error("paired series differ in length: {left} vs {right}")]
    UnpairedSeries {
        /// First series length.
        left: usize,
        /// Second series length.
        right: usize,
    },

    /// A distribution's parameters are unusable.
    #[error("invalid distribution for `{parameter}`: {reason}")]
    InvalidDistribution {
        /// Parameter name.
        parameter: String,
        /// What is wrong.
        reason: String,
    },

    /// Base footprint inputs were rejected.
    #[error(transparent)]
    Footprint(#[from] FootprintError),
}

impl From<MonteCarloError> for twf_core::TwfError {
    fn from(e: MonteCarloError) -> Self {
        match e {
            MonteCarloError::Footprint(f) => f.into(),
            other => twf_core::TwfError::MalformedInput(other.to_string()),
        }
    }
}
