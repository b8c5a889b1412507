//! Predictions from models that are linear in their coefficients.

use super::FamilyFit;
use crate::core::{DataFrame, PredictError};
use crate::solvers::LinearModel;

/// Point predictions and closed-form standard errors from the model's own
/// linear-prediction routine.
pub(crate) fn predict_linear(
    model: &dyn LinearModel,
    newdata: &DataFrame,
    with_se: bool,
) -> Result<FamilyFit, PredictError> {
    let pred = model.predict(newdata, with_se)?;

    if let Some(se) = &pred.se_fit {
        if se.nrows() != pred.fit.nrows() {
            return Err(PredictError::DimensionMismatch {
                expected: pred.fit.nrows(),
                got: se.nrows(),
            });
        }
    }

    Ok(FamilyFit {
        fit: pred.fit,
        se_fit: pred.se_fit,
        df: Some(pred.df),
        sigma: Some(pred.residual_scale),
        n_params: model.n_parameters(),
    })
}
