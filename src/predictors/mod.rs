//! Family-specific predictors and the dispatcher that selects between them.

mod dispatch;
mod linear;
mod mixed;
mod nonlinear;

pub use dispatch::predict_fit;

use faer::Col;

/// What a family predictor hands back to the dispatcher.
///
/// `df` and `sigma` are `None` when the family does not support interval
/// construction.
#[derive(Debug, Clone)]
pub(crate) struct FamilyFit {
    pub fit: Col<f64>,
    pub se_fit: Option<Col<f64>>,
    pub df: Option<f64>,
    pub sigma: Option<f64>,
    /// Number of estimated coefficients, the dimension of a Scheffé confidence band.
    pub n_params: usize,
}
