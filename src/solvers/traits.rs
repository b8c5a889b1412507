//! Capability contracts the prediction layer requires from fitted models.
//!
//! The prediction layer never fits or mutates a model. Each family exposes the
//! already-estimated quantities it needs through one of the traits below, and
//! [`FittedModel`] closes over exactly those three families.

use crate::core::{DataFrame, PredictError, PredictOptions, PredictionResult};
use crate::solvers::MeanFunction;
use faer::{Col, Mat};

/// Output of a linear model's own closed-form prediction routine.
#[derive(Debug, Clone)]
pub struct LinearPrediction {
    /// Point predictions.
    pub fit: Col<f64>,
    /// Standard errors of the mean response, if requested.
    pub se_fit: Option<Col<f64>>,
    /// Residual degrees of freedom.
    pub df: f64,
    /// Residual standard deviation.
    pub residual_scale: f64,
}

/// A fitted model whose predictions are linear in the coefficients.
pub trait LinearModel: Send + Sync {
    /// Predict at `newdata`, optionally with standard errors of the mean response.
    fn predict(&self, newdata: &DataFrame, with_se: bool)
        -> Result<LinearPrediction, PredictError>;

    /// Number of columns of the model matrix.
    fn n_parameters(&self) -> usize;

    /// Data the model was fit on.
    fn training_data(&self) -> &DataFrame;
}

/// Algorithm a nonlinear least-squares model was fit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NlsAlgorithm {
    /// Gauss–Newton (default).
    #[default]
    GaussNewton,
    /// Bound-constrained PORT routines.
    Port,
    /// Golub–Pereyra partially-linear least squares. Its triangular factor
    /// only covers the nonlinear coefficients, so it cannot be used for
    /// delta-method standard errors.
    PartiallyLinear,
}

/// A fitted nonlinear least-squares model.
pub trait NonlinearModel: Send + Sync {
    /// The model's own point predictions at `newdata`.
    fn predict(&self, newdata: &DataFrame) -> Result<Col<f64>, PredictError>;

    /// Mean-response expression, with an analytic gradient when self-starting.
    fn mean_function(&self) -> &dyn MeanFunction;

    /// Estimated coefficients, ordered as `mean_function().parameter_names()`.
    fn coefficients(&self) -> &Col<f64>;

    /// Upper-triangular p × p factor R from the final least-squares solve.
    fn triangular_factor(&self) -> &Mat<f64>;

    /// Residual standard deviation.
    fn residual_sd(&self) -> f64;

    /// Residual degrees of freedom.
    fn residual_df(&self) -> usize;

    /// Fitting algorithm.
    fn algorithm(&self) -> NlsAlgorithm;

    /// Data the model was fit on.
    fn training_data(&self) -> &DataFrame;
}

/// A fitted linear mixed-effects model.
pub trait MixedEffectsModel: Send + Sync {
    /// Fixed-effects design matrix for `newdata`.
    fn design_matrix(&self, newdata: &DataFrame) -> Result<Mat<f64>, PredictError>;

    /// Variance-covariance matrix of the fixed-effect coefficients.
    fn fixed_effects_vcov(&self) -> &Mat<f64>;

    /// Population-level predictions (random effects set to zero).
    fn predict_population(&self, newdata: &DataFrame) -> Result<Col<f64>, PredictError>;

    /// Data the model was fit on.
    fn training_data(&self) -> &DataFrame;
}

/// A fitted model from one of the supported families.
#[derive(Clone, Copy)]
pub enum FittedModel<'a> {
    Linear(&'a dyn LinearModel),
    Nonlinear(&'a dyn NonlinearModel),
    MixedEffects(&'a dyn MixedEffectsModel),
}

impl<'a> FittedModel<'a> {
    /// Name of the model family.
    pub fn variant_name(&self) -> &'static str {
        match self {
            FittedModel::Linear(_) => "linear model",
            FittedModel::Nonlinear(_) => "nonlinear least-squares model",
            FittedModel::MixedEffects(_) => "linear mixed-effects model",
        }
    }

    /// Data the model was fit on, used when no new data is supplied.
    pub fn training_data(&self) -> &'a DataFrame {
        match *self {
            FittedModel::Linear(m) => m.training_data(),
            FittedModel::Nonlinear(m) => m.training_data(),
            FittedModel::MixedEffects(m) => m.training_data(),
        }
    }

    /// Predict with standard errors and intervals. See [`predict_fit`](crate::predict_fit).
    pub fn predict(
        self,
        newdata: Option<&DataFrame>,
        options: &PredictOptions,
    ) -> Result<PredictionResult, PredictError> {
        crate::predictors::predict_fit(self, newdata, options)
    }
}

impl std::fmt::Debug for FittedModel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FittedModel").field(&self.variant_name()).finish()
    }
}
