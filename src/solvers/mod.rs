//! Fitted-model contracts and the collaborators that implement them.

mod lme;
mod mean_function;
mod nls;
mod ols;
mod traits;

pub use lme::LmeModel;
pub use mean_function::{Expression, MeanFunction, SsAsymptotic, SsLogistic, SsMicmen};
pub use nls::NlsModel;
pub use ols::{FittedLm, OlsRegressor};
pub use traits::{
    FittedModel, LinearModel, LinearPrediction, MixedEffectsModel, NlsAlgorithm, NonlinearModel,
};
