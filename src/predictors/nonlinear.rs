//! Delta-method predictions for nonlinear least-squares models.

use super::FamilyFit;
use crate::core::{DataFrame, PredictError};
use crate::solvers::{NlsAlgorithm, NonlinearModel};
use crate::utils::{compute_matrix_inverse, crossprod, forward_jacobian, quadratic_form_diag};
use faer::{Col, Mat};
use log::debug;

/// Reject algorithm variants whose triangular factor cannot be used for
/// standard errors.
pub(crate) fn check_supported(model: &dyn NonlinearModel) -> Result<(), PredictError> {
    match model.algorithm() {
        NlsAlgorithm::GaussNewton | NlsAlgorithm::Port => Ok(()),
        NlsAlgorithm::PartiallyLinear => Err(PredictError::UnsupportedModel(format!(
            "nonlinear least-squares model fit with the {:?} (partially-linear) algorithm",
            NlsAlgorithm::PartiallyLinear
        ))),
    }
}

/// Point predictions and, if requested, delta-method standard errors.
///
/// With F0 the n × p Jacobian of the mean function at `newdata` and R the
/// model's triangular factor, `se = sigma * sqrt(diag(F0 (R'R)⁻¹ F0'))`.
pub(crate) fn predict_nonlinear(
    model: &dyn NonlinearModel,
    newdata: &DataFrame,
    with_se: bool,
) -> Result<FamilyFit, PredictError> {
    check_supported(model)?;

    let mean_fn = model.mean_function();
    let variables = mean_fn.variables();
    let missing: Vec<&str> = variables
        .iter()
        .filter(|v| !newdata.has_column(v))
        .map(|v| v.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(PredictError::MissingParameter(format!(
            "newdata is missing predictor column(s): {}",
            missing.join(", ")
        )));
    }

    let fit = model.predict(newdata)?;
    if fit.nrows() != newdata.nrows() {
        return Err(PredictError::DimensionMismatch {
            expected: newdata.nrows(),
            got: fit.nrows(),
        });
    }
    if let Some(i) = (0..fit.nrows()).find(|&i| !fit[i].is_finite()) {
        return Err(PredictError::NumericalError(format!(
            "prediction is not finite in row {}: {}",
            i, fit[i]
        )));
    }
    let n_params = model.coefficients().nrows();

    let se_fit = if with_se {
        let x = newdata.select(&variables)?;
        Some(delta_method_se(model, &x, &fit)?)
    } else {
        None
    };

    Ok(FamilyFit {
        fit,
        se_fit,
        df: Some(model.residual_df() as f64),
        sigma: Some(model.residual_sd()),
        n_params,
    })
}

fn delta_method_se(
    model: &dyn NonlinearModel,
    x: &Mat<f64>,
    fit: &Col<f64>,
) -> Result<Col<f64>, PredictError> {
    let mean_fn = model.mean_function();
    let beta = model.coefficients();
    let n = x.nrows();
    let p = beta.nrows();

    let jacobian = match mean_fn.gradient(beta, x) {
        Some(grad) => {
            debug!("using analytic gradient of {}", mean_fn.name());
            grad
        }
        None => {
            debug!("differentiating {} numerically", mean_fn.name());
            forward_jacobian(beta, n, |b| Ok(mean_fn.evaluate(b, x)))?
        }
    };
    if jacobian.nrows() != fit.nrows() {
        return Err(PredictError::DimensionMismatch {
            expected: fit.nrows(),
            got: jacobian.nrows(),
        });
    }
    if jacobian.ncols() != p {
        return Err(PredictError::DimensionMismatch {
            expected: p,
            got: jacobian.ncols(),
        });
    }
    for i in 0..jacobian.nrows() {
        for j in 0..p {
            if !jacobian[(i, j)].is_finite() {
                return Err(PredictError::NumericalError(format!(
                    "gradient is not finite at row {}, coefficient {}",
                    i, j
                )));
            }
        }
    }

    let r = model.triangular_factor();
    if r.nrows() != p || r.ncols() != p {
        return Err(PredictError::DimensionMismatch {
            expected: p,
            got: r.nrows(),
        });
    }
    let unscaled = compute_matrix_inverse(&crossprod(r))?;
    let variance = quadratic_form_diag(&jacobian, &unscaled)?;

    let sigma = model.residual_sd();
    if !sigma.is_finite() {
        return Err(PredictError::NumericalError(format!(
            "residual standard deviation is {}",
            sigma
        )));
    }

    Ok(Col::from_fn(n, |i| sigma * variance[i].sqrt()))
}
