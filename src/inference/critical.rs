//! Critical values for pointwise and simultaneous intervals.

use crate::core::{Adjustment, IntervalType, PredictError};
use log::debug;
use statrs::distribution::{Continuous, ContinuousCDF, FisherSnedecor, StudentsT};

const QUANTILE_TOLERANCE: f64 = 1e-12;
const QUANTILE_MAX_ITER: usize = 50;

/// Computes the multiplier applied to the standard error when building intervals.
///
/// | adjust     | interval   | critical value                    |
/// |------------|------------|-----------------------------------|
/// | None       | either     | t((level + 1) / 2, df)            |
/// | Bonferroni | either     | t((level + 2k − 1) / (2k), df)    |
/// | Scheffe    | confidence | sqrt(p · F(level, p, df))         |
/// | Scheffe    | prediction | sqrt(k · F(level, k, df))         |
///
/// `n_params` is the number of estimated coefficients `p`, used only by the
/// Scheffé confidence band. Both the linear and nonlinear families use `level`
/// as the F-quantile probability here.
pub fn critical_value(
    interval: IntervalType,
    adjust: Adjustment,
    level: f64,
    df: f64,
    k: Option<usize>,
    n_params: usize,
) -> Result<f64, PredictError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(crate::core::OptionsError::InvalidLevel(level).into());
    }

    let crit = match adjust {
        Adjustment::None => t_quantile((level + 1.0) / 2.0, df)?,
        Adjustment::Bonferroni => {
            let k = require_k(k, adjust)? as f64;
            t_quantile((level + 2.0 * k - 1.0) / (2.0 * k), df)?
        }
        Adjustment::Scheffe => {
            let k = require_k(k, adjust)?;
            let dim = match interval {
                IntervalType::Confidence => n_params,
                IntervalType::Prediction => k,
            };
            if dim == 0 {
                return Err(PredictError::NumericalError(
                    "Scheffé adjustment needs at least one dimension".to_string(),
                ));
            }
            let dim = dim as f64;
            (dim * f_quantile(level, dim, df)?).sqrt()
        }
    };

    debug!(
        "critical value {:.6} for {:?} interval, adjust={:?}, level={}, df={}",
        crit, interval, adjust, level, df
    );

    if !crit.is_finite() || crit < 0.0 {
        return Err(PredictError::NumericalError(format!(
            "invalid critical value {}",
            crit
        )));
    }

    Ok(crit)
}

fn require_k(k: Option<usize>, adjust: Adjustment) -> Result<usize, PredictError> {
    match k {
        Some(0) => Err(crate::core::OptionsError::InvalidK(0).into()),
        Some(k) => Ok(k),
        None => Err(PredictError::MissingParameter(format!(
            "k is required for the {:?} adjustment",
            adjust
        ))),
    }
}

fn t_quantile(p: f64, df: f64) -> Result<f64, PredictError> {
    let t_dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        PredictError::NumericalError(format!("t distribution with df = {}: {}", df, e))
    })?;
    Ok(refine_quantile(&t_dist, p, t_dist.inverse_cdf(p), f64::NEG_INFINITY))
}

fn f_quantile(p: f64, d1: f64, d2: f64) -> Result<f64, PredictError> {
    let f_dist = FisherSnedecor::new(d1, d2).map_err(|e| {
        PredictError::NumericalError(format!("F distribution with df = ({}, {}): {}", d1, d2, e))
    })?;
    Ok(refine_quantile(&f_dist, p, f_dist.inverse_cdf(p), 0.0))
}

/// Polish a quantile with Newton steps on `cdf(x) - p`.
///
/// The starting point comes from statrs' `inverse_cdf`, which is only
/// accurate to a few digits for some distributions. Iterates never step at or
/// below `lower`; they halve the distance to it instead.
fn refine_quantile<D>(dist: &D, p: f64, start: f64, lower: f64) -> f64
where
    D: ContinuousCDF<f64, f64> + Continuous<f64, f64>,
{
    let mut x = start;
    if !x.is_finite() {
        return x;
    }

    for _ in 0..QUANTILE_MAX_ITER {
        let density = dist.pdf(x);
        if !(density.is_finite() && density > 0.0) {
            break;
        }
        let step = (dist.cdf(x) - p) / density;
        if !step.is_finite() {
            break;
        }
        let mut next = x - step;
        if next <= lower {
            next = lower + (x - lower) / 2.0;
        }
        let converged = (next - x).abs() <= QUANTILE_TOLERANCE * x.abs().max(1.0);
        x = next;
        if converged {
            break;
        }
    }

    x
}
