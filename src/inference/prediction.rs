//! Prediction interval calculations.

use crate::core::{IntervalType, PredictError};
use faer::Col;

/// Computes lower and upper interval bounds around point predictions.
///
/// # Arguments
/// * `fit` - Point predictions
/// * `se_fit` - Standard errors of the point predictions
/// * `sigma` - Residual standard deviation of the fitted model
/// * `crit` - Critical value (see [`critical_value`](crate::inference::critical_value))
/// * `interval_type` - Confidence or Prediction interval
///
/// Confidence bounds are `fit ± crit·se`. Prediction bounds inflate the
/// standard error by the residual variance: `fit ± crit·sqrt(sigma² + se²)`.
///
/// # Returns
/// `(lower, upper)`, one entry per prediction.
pub fn compute_intervals(
    fit: &Col<f64>,
    se_fit: &Col<f64>,
    sigma: f64,
    crit: f64,
    interval_type: IntervalType,
) -> Result<(Col<f64>, Col<f64>), PredictError> {
    let n = fit.nrows();
    if se_fit.nrows() != n {
        return Err(PredictError::DimensionMismatch {
            expected: n,
            got: se_fit.nrows(),
        });
    }
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(PredictError::NumericalError(format!(
            "residual standard deviation must be finite and non-negative, got {}",
            sigma
        )));
    }

    let mut lower = Col::zeros(n);
    let mut upper = Col::zeros(n);

    for i in 0..n {
        let se = match interval_type {
            IntervalType::Confidence => se_fit[i],
            IntervalType::Prediction => (sigma * sigma + se_fit[i] * se_fit[i]).sqrt(),
        };

        let margin = crit * se;
        if !margin.is_finite() {
            return Err(PredictError::NumericalError(format!(
                "non-finite interval half-width in row {}",
                i
            )));
        }
        lower[i] = fit[i] - margin;
        upper[i] = fit[i] + margin;
    }

    Ok((lower, upper))
}
