//! Ordinary Least Squares linear models.

use crate::core::{DataFrame, Formula, PredictError};
use crate::solvers::traits::{FittedModel, LinearModel, LinearPrediction};
use crate::utils::{compute_matrix_inverse, crossprod, quadratic_form_diag};
use faer::{Col, Mat};

/// Ordinary Least Squares regression estimator.
///
/// Solves the least-squares problem for a [`Formula`] through a QR
/// decomposition of its design matrix. Rank-deficient designs are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use predfit_rs::prelude::*;
///
/// let data = DataFrame::new(vec![("x", x), ("y", y)])?;
/// let fitted = OlsRegressor::new(Formula::parse("y ~ x")?).fit(&data)?;
///
/// let pred = predict_fit(FittedModel::Linear(&fitted), None, &PredictOptions::prediction(0.95))?;
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    formula: Formula,
    rank_tolerance: f64,
}

impl OlsRegressor {
    /// Create a new OLS regressor for `formula`. The formula must name a response.
    pub fn new(formula: Formula) -> Self {
        Self {
            formula,
            rank_tolerance: 1e-10,
        }
    }

    /// Set the relative rank tolerance for the QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.rank_tolerance = tol;
        self
    }

    /// Fit the model to `data`.
    pub fn fit(&self, data: &DataFrame) -> Result<FittedLm, PredictError> {
        let response = self.formula.response().ok_or_else(|| {
            PredictError::MissingParameter("formula has no response variable".to_string())
        })?;
        let y = data.require(response)?.clone();
        let x = self.formula.design_matrix(data)?;

        let n_samples = x.nrows();
        let n_params = x.ncols();

        // Need at least n_params observations; exact fits leave zero residual df
        if n_params == 0 || n_samples < n_params {
            return Err(PredictError::InvalidData(format!(
                "insufficient observations: need at least {}, got {}",
                n_params.max(1),
                n_samples
            )));
        }

        let (coefficients, r) = self.solve_with_qr(&x, &y)?;

        let mut fitted_values = Col::zeros(n_samples);
        let mut rss = 0.0;
        for i in 0..n_samples {
            let mut pred = 0.0;
            for j in 0..n_params {
                pred += x[(i, j)] * coefficients[j];
            }
            fitted_values[i] = pred;
            rss += (y[i] - pred).powi(2);
        }

        let df_resid = n_samples - n_params;
        let sigma = if df_resid > 0 {
            (rss / df_resid as f64).sqrt()
        } else {
            f64::NAN
        };

        // (X'X)⁻¹ = (R'R)⁻¹ for standard errors of the mean response
        let xtx_inverse = compute_matrix_inverse(&crossprod(&r))?;

        Ok(FittedLm {
            formula: self.formula.clone(),
            data: data.clone(),
            coefficients,
            fitted_values,
            xtx_inverse,
            sigma,
            df_resid,
        })
    }

    /// Solve the least squares problem using QR decomposition.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
    ) -> Result<(Col<f64>, Mat<f64>), PredictError> {
        let n_params = x.ncols();

        let qr: faer::linalg::solvers::Qr<f64> = x.qr();
        let q = qr.compute_Q();
        let r = qr.R();

        let scale = (0..n_params).map(|i| r[(i, i)].abs()).fold(0.0, f64::max);
        for i in 0..n_params {
            if scale == 0.0 || r[(i, i)].abs() <= self.rank_tolerance * scale {
                return Err(PredictError::NumericalError(
                    "design matrix is rank deficient".to_string(),
                ));
            }
        }

        // Only the first n_params components of Q'y enter the solve
        let qty = q.transpose() * y;

        // Back-substitution for upper triangular system
        let mut beta = Col::zeros(n_params);
        for i in (0..n_params).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..n_params {
                sum -= r[(i, j)] * beta[j];
            }
            beta[i] = sum / r[(i, i)];
        }

        let r_thin = Mat::from_fn(n_params, n_params, |i, j| {
            if i <= j {
                r[(i, j)]
            } else {
                0.0
            }
        });

        Ok((beta, r_thin))
    }
}

/// A fitted OLS linear model.
#[derive(Debug, Clone)]
pub struct FittedLm {
    formula: Formula,
    data: DataFrame,
    coefficients: Col<f64>,
    fitted_values: Col<f64>,
    /// (X'X)⁻¹ for standard errors of predictions
    xtx_inverse: Mat<f64>,
    sigma: f64,
    df_resid: usize,
}

impl FittedLm {
    /// Model formula.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Coefficients, ordered as `formula().column_names()`.
    pub fn coefficients(&self) -> &Col<f64> {
        &self.coefficients
    }

    /// In-sample fitted values.
    pub fn fitted_values(&self) -> &Col<f64> {
        &self.fitted_values
    }

    /// Residual standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Residual degrees of freedom.
    pub fn residual_df(&self) -> usize {
        self.df_resid
    }
}

impl LinearModel for FittedLm {
    fn predict(
        &self,
        newdata: &DataFrame,
        with_se: bool,
    ) -> Result<LinearPrediction, PredictError> {
        let x = self.formula.design_matrix(newdata)?;
        let n_params = self.coefficients.nrows();
        if x.ncols() != n_params {
            return Err(PredictError::DimensionMismatch {
                expected: n_params,
                got: x.ncols(),
            });
        }

        let fit = Col::from_fn(x.nrows(), |i| {
            (0..n_params)
                .map(|j| x[(i, j)] * self.coefficients[j])
                .sum::<f64>()
        });

        let se_fit = if with_se {
            if !self.sigma.is_finite() {
                return Err(PredictError::NumericalError(
                    "residual standard deviation is undefined with zero residual df".to_string(),
                ));
            }
            let leverage = quadratic_form_diag(&x, &self.xtx_inverse)?;
            Some(Col::from_fn(x.nrows(), |i| self.sigma * leverage[i].sqrt()))
        } else {
            None
        };

        Ok(LinearPrediction {
            fit,
            se_fit,
            df: self.df_resid as f64,
            residual_scale: self.sigma,
        })
    }

    fn n_parameters(&self) -> usize {
        self.coefficients.nrows()
    }

    fn training_data(&self) -> &DataFrame {
        &self.data
    }
}

impl<'a> From<&'a FittedLm> for FittedModel<'a> {
    fn from(model: &'a FittedLm) -> Self {
        FittedModel::Linear(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_data() -> DataFrame {
        DataFrame::new(vec![
            ("x", (0..5).map(|i| i as f64).collect()),
            ("y", (0..5).map(|i| 2.0 + 3.0 * i as f64).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_simple_fit() {
        let fitted = OlsRegressor::new(Formula::parse("y ~ x").unwrap())
            .fit(&line_data())
            .expect("model should fit");

        assert!((fitted.coefficients()[0] - 2.0).abs() < 1e-10);
        assert!((fitted.coefficients()[1] - 3.0).abs() < 1e-10);
        assert_eq!(fitted.residual_df(), 3);
    }

    #[test]
    fn test_predict() {
        let fitted = OlsRegressor::new(Formula::parse("y ~ x").unwrap())
            .fit(&line_data())
            .expect("model should fit");

        let newdata = DataFrame::new(vec![("x", vec![10.0, 11.0])]).unwrap();
        let preds = fitted.predict(&newdata, false).unwrap();

        assert!((preds.fit[0] - (2.0 + 3.0 * 10.0)).abs() < 1e-10);
        assert!((preds.fit[1] - (2.0 + 3.0 * 11.0)).abs() < 1e-10);
        assert!(preds.se_fit.is_none());
    }

    #[test]
    fn test_se_matches_closed_form() {
        // Simple regression: se(x0) = s * sqrt(1/n + (x0 - x̄)² / Sxx)
        let x: Vec<f64> = (1..=8).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 1.0 + 0.5 * xi + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();
        let data = DataFrame::new(vec![("x", x.clone()), ("y", y)]).unwrap();
        let fitted = OlsRegressor::new(Formula::parse("y ~ x").unwrap())
            .fit(&data)
            .unwrap();

        let n = x.len() as f64;
        let x_bar = x.iter().sum::<f64>() / n;
        let sxx: f64 = x.iter().map(|xi| (xi - x_bar).powi(2)).sum();

        let newdata = DataFrame::new(vec![("x", vec![0.0, 4.5, 12.0])]).unwrap();
        let pred = fitted.predict(&newdata, true).unwrap();
        let se = pred.se_fit.unwrap();

        for (i, x0) in [0.0, 4.5, 12.0].iter().enumerate() {
            let expected = fitted.sigma() * (1.0 / n + (x0 - x_bar).powi(2) / sxx).sqrt();
            assert!((se[i] - expected).abs() < 1e-10);
        }
        assert!((pred.residual_scale - fitted.sigma()).abs() < 1e-15);
        assert!((pred.df - 6.0).abs() < 1e-15);
    }

    #[test]
    fn test_rank_deficient_rejected() {
        let data = DataFrame::new(vec![
            ("x", vec![1.0, 2.0, 3.0, 4.0]),
            ("z", vec![2.0, 4.0, 6.0, 8.0]),
            ("y", vec![1.0, 3.0, 2.0, 5.0]),
        ])
        .unwrap();
        let result = OlsRegressor::new(Formula::parse("y ~ x + z").unwrap()).fit(&data);
        assert!(matches!(result, Err(PredictError::NumericalError(_))));
    }

    #[test]
    fn test_missing_response() {
        let result = OlsRegressor::new(Formula::parse("~ x").unwrap()).fit(&line_data());
        assert!(matches!(result, Err(PredictError::MissingParameter(_))));
    }

    #[test]
    fn test_rank_tolerance_controls_near_collinearity() {
        let x: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let z: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 2.0 * xi + if i % 2 == 0 { 1e-4 } else { -1e-4 })
            .collect();
        let y: Vec<f64> = x.iter().map(|&xi| 1.0 + xi + 0.1 * xi * xi).collect();
        let data = DataFrame::new(vec![("x", x), ("z", z), ("y", y)]).unwrap();
        let formula = Formula::parse("y ~ x + z").unwrap();

        assert!(OlsRegressor::new(formula.clone()).fit(&data).is_ok());
        let strict = OlsRegressor::new(formula).rank_tolerance(1e-2).fit(&data);
        assert!(matches!(strict, Err(PredictError::NumericalError(_))));
    }
}
