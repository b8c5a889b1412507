//! Predictions with standard errors and confidence/prediction intervals for
//! fitted linear, nonlinear least-squares and linear mixed-effects models.
//!
//! Models are read-only inputs. A [`FittedModel`] wraps a reference to one of
//! the three model families, and [`predict_fit`] turns it into a
//! [`PredictionResult`] carrying point predictions, optional standard errors
//! and, where supported, interval bounds with optional Bonferroni or Scheffé
//! adjustment for simultaneous inference.
//!
//! # Example
//!
//! ```rust,ignore
//! use predfit_rs::prelude::*;
//!
//! let data = DataFrame::new(vec![("x", x), ("y", y)])?;
//! let fitted = OlsRegressor::new(Formula::parse("y ~ x")?).fit(&data)?;
//!
//! let newdata = DataFrame::new(vec![("x", vec![6.0, 7.0])])?;
//! let options = PredictOptions::builder()
//!     .interval(Some(IntervalType::Prediction))
//!     .level(0.95)
//!     .adjust(Adjustment::Bonferroni)
//!     .k(2)
//!     .build()?;
//!
//! let pred = predict_fit((&fitted).into(), Some(&newdata), &options)?;
//! println!("{:?} {:?}", pred.fit, pred.interval(0));
//! ```

pub mod core;
pub mod inference;
pub mod predictors;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Adjustment, DataFrame, Formula, IntervalType, OptionsError, PredictError, PredictOptions,
        PredictOptionsBuilder, PredictionResult, Term,
    };
    pub use crate::predictors::predict_fit;
    pub use crate::solvers::{
        Expression, FittedLm, FittedModel, LinearModel, LinearPrediction, LmeModel, MeanFunction,
        MixedEffectsModel, NlsAlgorithm, NlsModel, NonlinearModel, OlsRegressor, SsAsymptotic,
        SsLogistic, SsMicmen,
    };
}

pub use crate::core::{
    Adjustment, DataFrame, Formula, IntervalType, PredictError, PredictOptions, PredictionResult,
};
pub use crate::predictors::predict_fit;
pub use crate::solvers::{FittedModel, LinearModel, MixedEffectsModel, NonlinearModel};
