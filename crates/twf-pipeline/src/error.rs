use thiserror::Error;
use twf_core::{ConfigError, DimensionError};
use twf_footprint::FootprintError;
use twf_iotable::IoTableError;
use twf_linalg::LinalgError;
use twf_montecarlo::MonteCarloError;
use twf_paths::PathsError;

/// Errors from the study pipeline.
///
/// Every variant except [`PipelineError::Config`] belongs to one study year;
/// that year is skipped and the others continue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The configuration failed validation; nothing was run.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required input is absent.
    #[error("missing input `{input}` for year {year}")]
    MissingInput {
        /// Study year label.
        year: String,
        /// Name of the absent input.
        input: &'static str,
    },

    /// An input has the wrong shape.
    #[error("{year}: {source}")]
    Dimension {
        /// Study year label.
        year: String,
        /// Underlying error.
        #[source]
        source: DimensionError,
    },

    /// A matrix input could not be assembled.
    #[error("{year}: {source}")]
    Linalg {
        /// Study year label.
        year: String,
        /// Underlying error.
        #[source]
        source: LinalgError,
    },

    /// The IO table could not be built.
    #[error("{year}: IO table build failed: {source}")]
    IoTable {
        /// Study year label.
        year: String,
        /// Underlying error.
        #[source]
        source: IoTableError,
    },

    /// The footprint could not be propagated.
    #[error("{year}: footprint failed: {source}")]
    Footprint {
        /// Study year label.
        year: String,
        /// Underlying error.
        #[source]
        source: FootprintError,
    },

    /// The Monte Carlo run failed.
    #[error("{year}: monte carlo failed: {source}")]
    MonteCarlo {
        /// Study year label.
        year: String,
        /// Underlying error.
        #[source]
        source: MonteCarloError,
    },

    /// Path analysis failed.
    #[error("{year}: path analysis failed: {source}")]
    Paths {
        /// Study year label.
        year: String,
        /// Underlying error.
        #[source]
        source: PathsError,
    },
}

impl PipelineError {
    /// Study year the error belongs to, `None` for configuration errors.
    pub fn year(&self) -> Option<&str> {
        match self {
            Self::Config(_) => None,
            Self::MissingInput { year, .. }
            | Self::Dimension { year, .. }
            | Self::Linalg { year, .. }
            | Self::IoTable { year, .. }
            | Self::Footprint { year, .. }
            | Self::MonteCarlo { year, .. }
            | Self::Paths { year, .. } => Some(year),
        }
    }
}

impl From<PipelineError> for twf_core::TwfError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Config(c) => twf_core::TwfError::Config(c),
            PipelineError::MissingInput { year, input } => twf_core::TwfError::MissingInput {
                year,
                input: input.to_string(),
            },
            PipelineError::Dimension { source, .. } => twf_core::TwfError::Dimension(source),
            other => twf_core::TwfError::MalformedInput(other.to_string()),
        }
    }
}
