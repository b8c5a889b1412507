//! Error type shared by every prediction path.

use crate::core::OptionsError;
use thiserror::Error;

/// Errors that can occur while computing predictions and intervals.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The model variant, or the algorithm it was fit with, is not supported.
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// A required argument or predictor column was not supplied.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// Matrix inversion, differentiation or a distribution quantile failed.
    #[error("numerical error: {0}")]
    NumericalError(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}
