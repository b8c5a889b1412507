//! Nonlinear least-squares models.
//!
//! Estimation itself happens elsewhere. An [`NlsModel`] holds the converged
//! state a prediction needs: coefficients, the triangular factor of the
//! Jacobian at the solution, the residual standard deviation and the data the
//! model was fit on.

use crate::core::{DataFrame, PredictError};
use crate::solvers::traits::{FittedModel, NlsAlgorithm, NonlinearModel};
use crate::solvers::MeanFunction;
use crate::utils::{forward_jacobian, upper_triangular_factor};
use faer::{Col, Mat};
use std::sync::Arc;

/// A fitted nonlinear least-squares model.
#[derive(Clone)]
pub struct NlsModel {
    mean_fn: Arc<dyn MeanFunction>,
    data: DataFrame,
    coefficients: Col<f64>,
    r_factor: Mat<f64>,
    sigma: f64,
    df_resid: usize,
    algorithm: NlsAlgorithm,
}

impl NlsModel {
    /// Assemble a model from converged coefficient estimates.
    ///
    /// Evaluates the Jacobian at the training data (analytically if the mean
    /// function supplies a gradient, otherwise by finite differences), keeps
    /// the R factor of its QR decomposition, and computes the residual
    /// standard deviation on `n - p` degrees of freedom.
    pub fn from_estimates<M>(
        mean_fn: M,
        data: DataFrame,
        response: &str,
        coefficients: Col<f64>,
        algorithm: NlsAlgorithm,
    ) -> Result<Self, PredictError>
    where
        M: MeanFunction + 'static,
    {
        let n_params = mean_fn.parameter_names().len();
        if coefficients.nrows() != n_params {
            return Err(PredictError::DimensionMismatch {
                expected: n_params,
                got: coefficients.nrows(),
            });
        }

        let x = data.select(&mean_fn.variables())?;
        let y = data.require(response)?;
        let n_samples = x.nrows();
        if n_samples <= n_params {
            return Err(PredictError::InvalidData(format!(
                "insufficient observations: need more than {}, got {}",
                n_params, n_samples
            )));
        }

        let fitted = mean_fn.evaluate(&coefficients, &x);
        let rss: f64 = (0..n_samples).map(|i| (y[i] - fitted[i]).powi(2)).sum();
        let df_resid = n_samples - n_params;
        let sigma = (rss / df_resid as f64).sqrt();
        if !sigma.is_finite() {
            return Err(PredictError::NumericalError(
                "residual sum of squares is not finite".to_string(),
            ));
        }

        let jacobian = match mean_fn.gradient(&coefficients, &x) {
            Some(grad) => grad,
            None => forward_jacobian(&coefficients, n_samples, |b| Ok(mean_fn.evaluate(b, &x)))?,
        };
        let r_factor = upper_triangular_factor(&jacobian)?;

        Ok(Self {
            mean_fn: Arc::new(mean_fn),
            data,
            coefficients,
            r_factor,
            sigma,
            df_resid,
            algorithm,
        })
    }

    /// Assemble a model from quantities already produced by a fitting routine.
    pub fn from_parts<M>(
        mean_fn: M,
        data: DataFrame,
        coefficients: Col<f64>,
        r_factor: Mat<f64>,
        sigma: f64,
        df_resid: usize,
        algorithm: NlsAlgorithm,
    ) -> Result<Self, PredictError>
    where
        M: MeanFunction + 'static,
    {
        let n_params = mean_fn.parameter_names().len();
        if coefficients.nrows() != n_params {
            return Err(PredictError::DimensionMismatch {
                expected: n_params,
                got: coefficients.nrows(),
            });
        }
        if r_factor.nrows() != n_params || r_factor.ncols() != n_params {
            return Err(PredictError::DimensionMismatch {
                expected: n_params,
                got: r_factor.nrows(),
            });
        }

        Ok(Self {
            mean_fn: Arc::new(mean_fn),
            data,
            coefficients,
            r_factor,
            sigma,
            df_resid,
            algorithm,
        })
    }

    /// Coefficient names.
    pub fn parameter_names(&self) -> Vec<String> {
        self.mean_fn.parameter_names()
    }
}

impl std::fmt::Debug for NlsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlsModel")
            .field("mean_fn", &self.mean_fn.name())
            .field("coefficients", &self.coefficients)
            .field("sigma", &self.sigma)
            .field("df_resid", &self.df_resid)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl NonlinearModel for NlsModel {
    fn predict(&self, newdata: &DataFrame) -> Result<Col<f64>, PredictError> {
        let x = newdata.select(&self.mean_fn.variables())?;
        Ok(self.mean_fn.evaluate(&self.coefficients, &x))
    }

    fn mean_function(&self) -> &dyn MeanFunction {
        self.mean_fn.as_ref()
    }

    fn coefficients(&self) -> &Col<f64> {
        &self.coefficients
    }

    fn triangular_factor(&self) -> &Mat<f64> {
        &self.r_factor
    }

    fn residual_sd(&self) -> f64 {
        self.sigma
    }

    fn residual_df(&self) -> usize {
        self.df_resid
    }

    fn algorithm(&self) -> NlsAlgorithm {
        self.algorithm
    }

    fn training_data(&self) -> &DataFrame {
        &self.data
    }
}

impl<'a> From<&'a NlsModel> for FittedModel<'a> {
    fn from(model: &'a NlsModel) -> Self {
        FittedModel::Nonlinear(model)
    }
}
