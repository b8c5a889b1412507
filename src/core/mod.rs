//! Core types for prediction requests and results.

mod data;
mod error;
mod formula;
mod options;
mod prediction;

pub use data::DataFrame;
pub use error::PredictError;
pub use formula::{Formula, Term};
pub use options::{Adjustment, OptionsError, PredictOptions, PredictOptionsBuilder};
pub use prediction::{IntervalType, PredictionResult};
