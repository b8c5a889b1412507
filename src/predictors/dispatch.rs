//! Entry point for predictions with standard errors and intervals.

use super::{linear, mixed, nonlinear, FamilyFit};
use crate::core::{DataFrame, PredictError, PredictOptions, PredictionResult};
use crate::inference::{compute_intervals, critical_value};
use crate::solvers::FittedModel;
use log::{debug, warn};

/// Predict from a fitted model, with optional standard errors and intervals.
///
/// When `newdata` is `None` the model's training data is used, so the fit
/// reproduces the in-sample fitted values.
///
/// An unsupported nonlinear algorithm is rejected before the options are
/// looked at. Standard errors are computed whenever an interval is requested,
/// but only returned when `options.se_fit` is set. Mixed-effects models never
/// produce interval bounds.
///
/// # Errors
///
/// * [`PredictError::UnsupportedModel`] for partially-linear nonlinear fits
/// * [`PredictError::MissingParameter`] if `k` is absent under an adjustment
///   or `newdata` lacks a predictor column
/// * [`PredictError::NumericalError`] if a matrix inversion or gradient fails
/// * [`PredictError::InvalidOptions`] if `level` or `k` is out of range
pub fn predict_fit(
    model: FittedModel<'_>,
    newdata: Option<&DataFrame>,
    options: &PredictOptions,
) -> Result<PredictionResult, PredictError> {
    if let FittedModel::Nonlinear(m) = model {
        nonlinear::check_supported(m)?;
    }
    options.validate()?;

    let newdata = newdata.unwrap_or_else(|| model.training_data());
    let with_se = options.se_fit || options.interval.is_some();

    debug!(
        "predicting {} rows from {} (se={}, interval={:?})",
        newdata.nrows(),
        model.variant_name(),
        with_se,
        options.interval
    );

    let family = match model {
        FittedModel::Linear(m) => linear::predict_linear(m, newdata, with_se)?,
        FittedModel::Nonlinear(m) => nonlinear::predict_nonlinear(m, newdata, with_se)?,
        FittedModel::MixedEffects(m) => mixed::predict_mixed(m, newdata, with_se)?,
    };

    assemble(family, options)
}

fn assemble(family: FamilyFit, options: &PredictOptions) -> Result<PredictionResult, PredictError> {
    let FamilyFit {
        fit,
        se_fit,
        df,
        sigma,
        n_params,
    } = family;

    let bounds = match (options.interval, df, sigma) {
        (Some(interval), Some(df), Some(sigma)) => {
            let se = se_fit.as_ref().ok_or_else(|| {
                PredictError::NumericalError("standard errors unavailable for interval".to_string())
            })?;
            let crit = critical_value(interval, options.adjust, options.level, df, options.k, n_params)?;
            Some(compute_intervals(&fit, se, sigma, crit, interval)?)
        }
        (Some(interval), _, _) => {
            warn!(
                "{:?} interval requested but not constructed for this model family; returning fit and standard errors only",
                interval
            );
            None
        }
        (None, _, _) => None,
    };

    let mut result = PredictionResult::point_only(fit);
    if let Some((lower, upper)) = bounds {
        result = result.with_intervals(lower, upper);
    }
    if options.se_fit {
        if let Some(se) = se_fit {
            result = result.with_se(se, sigma, df);
        }
    }

    Ok(result)
}
