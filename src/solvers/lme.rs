//! Linear mixed-effects models at the population level.

use crate::core::{DataFrame, Formula, PredictError};
use crate::solvers::traits::{FittedModel, MixedEffectsModel};
use faer::{Col, Mat};

/// A fitted linear mixed-effects model.
///
/// Only the fixed-effects part is held: population predictions set every
/// random effect to zero, so the fixed-effects formula, coefficients and their
/// variance-covariance matrix are all a prediction needs.
#[derive(Debug, Clone)]
pub struct LmeModel {
    fixed: Formula,
    data: DataFrame,
    beta: Col<f64>,
    vcov: Mat<f64>,
    sigma: f64,
}

impl LmeModel {
    /// Assemble a model from estimated fixed effects.
    ///
    /// `beta` is ordered as `fixed.column_names()` and `vcov` is its p × p
    /// variance-covariance matrix.
    pub fn from_estimates(
        fixed: Formula,
        data: DataFrame,
        beta: Col<f64>,
        vcov: Mat<f64>,
        sigma: f64,
    ) -> Result<Self, PredictError> {
        let p = fixed.n_columns();
        if beta.nrows() != p {
            return Err(PredictError::DimensionMismatch {
                expected: p,
                got: beta.nrows(),
            });
        }
        if vcov.nrows() != p || vcov.ncols() != p {
            return Err(PredictError::DimensionMismatch {
                expected: p,
                got: if vcov.nrows() != p { vcov.nrows() } else { vcov.ncols() },
            });
        }
        for j in 0..p {
            if vcov[(j, j)].is_nan() || vcov[(j, j)] < 0.0 {
                return Err(PredictError::NumericalError(format!(
                    "fixed-effects variance for '{}' is {}",
                    fixed.column_names()[j],
                    vcov[(j, j)]
                )));
            }
        }

        Ok(Self {
            fixed,
            data,
            beta,
            vcov,
            sigma,
        })
    }

    /// Fixed-effects formula.
    pub fn fixed_formula(&self) -> &Formula {
        &self.fixed
    }

    /// Fixed-effect coefficients.
    pub fn fixed_effects(&self) -> &Col<f64> {
        &self.beta
    }

    /// Within-group residual standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl MixedEffectsModel for LmeModel {
    fn design_matrix(&self, newdata: &DataFrame) -> Result<Mat<f64>, PredictError> {
        self.fixed.design_matrix(newdata)
    }

    fn fixed_effects_vcov(&self) -> &Mat<f64> {
        &self.vcov
    }

    fn predict_population(&self, newdata: &DataFrame) -> Result<Col<f64>, PredictError> {
        let x = self.design_matrix(newdata)?;
        let p = self.beta.nrows();
        Ok(Col::from_fn(x.nrows(), |i| {
            (0..p).map(|j| x[(i, j)] * self.beta[j]).sum::<f64>()
        }))
    }

    fn training_data(&self) -> &DataFrame {
        &self.data
    }
}

impl<'a> From<&'a LmeModel> for FittedModel<'a> {
    fn from(model: &'a LmeModel) -> Self {
        FittedModel::MixedEffects(model)
    }
}
