//! Population-level predictions for linear mixed-effects models.

use super::FamilyFit;
use crate::core::{DataFrame, PredictError};
use crate::solvers::MixedEffectsModel;
use crate::utils::quadratic_form_diag;
use faer::Col;

/// Fixed-effects predictions with `se = sqrt(diag(X V X'))`.
///
/// Residual degrees of freedom are not defined here, so no `df` or `sigma`
/// is forwarded and the dispatcher never builds intervals for this family.
pub(crate) fn predict_mixed(
    model: &dyn MixedEffectsModel,
    newdata: &DataFrame,
    with_se: bool,
) -> Result<FamilyFit, PredictError> {
    let fit = model.predict_population(newdata)?;
    let vcov = model.fixed_effects_vcov();

    let se_fit = if with_se {
        let x = model.design_matrix(newdata)?;
        if x.nrows() != fit.nrows() {
            return Err(PredictError::DimensionMismatch {
                expected: fit.nrows(),
                got: x.nrows(),
            });
        }
        if x.ncols() != vcov.nrows() {
            return Err(PredictError::DimensionMismatch {
                expected: vcov.nrows(),
                got: x.ncols(),
            });
        }
        let variance = quadratic_form_diag(&x, vcov)?;
        Some(Col::from_fn(variance.nrows(), |i| variance[i].sqrt()))
    } else {
        None
    };

    Ok(FamilyFit {
        fit,
        se_fit,
        df: None,
        sigma: None,
        n_params: vcov.nrows(),
    })
}
