//! Error type shared by samplers, plugins and estimators.

use thiserror::Error;

/// Everything that can abort a sampling run or an estimate.
///
/// A single failing trial aborts the whole run; no partial results are returned.
#[derive(Error, Debug)]
pub enum AbcError {
    #[error("Simulation returned unrecoverable error: {0}")]
    Simulation(Box<dyn std::error::Error + Send + Sync>),

    #[error("Distance function returned unrecoverable error: {0}")]
    Distance(Box<dyn std::error::Error + Send + Sync>),

    #[error("Sample shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Parameter vector has {found} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("All weights are zero in parameter dimension {dim}")]
    DegenerateWeights { dim: usize },

    #[error("Cannot estimate from an empty result set")]
    EmptyResults,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AbcError>;
