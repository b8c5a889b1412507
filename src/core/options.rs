//! Prediction options and configuration.

use crate::core::{IntervalType, PredictError};
use thiserror::Error;

/// Simultaneous-inference adjustment applied to the critical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Adjustment {
    /// Pointwise intervals, no adjustment (default).
    #[default]
    None,
    /// Bonferroni correction over `k` simultaneous intervals.
    Bonferroni,
    /// Scheffé adjustment. For confidence intervals this gives the
    /// Working–Hotelling band over all `p` coefficients; for prediction
    /// intervals it covers `k` simultaneous new observations.
    Scheffe,
}

/// Configuration options for a single prediction request.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Whether to return standard errors of the fit (default: true).
    pub se_fit: bool,
    /// Interval to construct, or `None` for point predictions only (default: None).
    pub interval: Option<IntervalType>,
    /// Confidence level for intervals (default: 0.95).
    pub level: f64,
    /// Simultaneous-inference adjustment (default: None).
    pub adjust: Adjustment,
    /// Number of simultaneous intervals. Required whenever `adjust` is not `None`.
    pub k: Option<usize>,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            se_fit: true,
            interval: None,
            level: 0.95,
            adjust: Adjustment::None,
            k: None,
        }
    }
}

/// Errors that can occur when validating prediction options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("level must be in (0, 1), got {0}")]
    InvalidLevel(f64),
    #[error("k must be at least 1, got {0}")]
    InvalidK(usize),
}

impl PredictOptions {
    /// Create a new builder for prediction options.
    pub fn builder() -> PredictOptionsBuilder {
        PredictOptionsBuilder::default()
    }

    /// Options for pointwise confidence intervals on the mean response.
    pub fn confidence(level: f64) -> Self {
        Self {
            interval: Some(IntervalType::Confidence),
            level,
            ..Default::default()
        }
    }

    /// Options for pointwise prediction intervals on new observations.
    pub fn prediction(level: f64) -> Self {
        Self {
            interval: Some(IntervalType::Prediction),
            level,
            ..Default::default()
        }
    }

    /// Validate the options.
    ///
    /// A missing `k` under an adjustment is reported as
    /// [`PredictError::MissingParameter`]; range violations as
    /// [`PredictError::InvalidOptions`].
    pub fn validate(&self) -> Result<(), PredictError> {
        if !(self.level > 0.0 && self.level < 1.0) {
            return Err(OptionsError::InvalidLevel(self.level).into());
        }
        if self.adjust != Adjustment::None && self.k.is_none() {
            return Err(PredictError::MissingParameter(format!(
                "k is required for the {:?} adjustment",
                self.adjust
            )));
        }
        if self.k == Some(0) {
            return Err(OptionsError::InvalidK(0).into());
        }
        Ok(())
    }
}

/// Builder for `PredictOptions`.
#[derive(Debug, Clone, Default)]
pub struct PredictOptionsBuilder {
    options: PredictOptions,
}

impl PredictOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to return standard errors.
    pub fn se_fit(mut self, se_fit: bool) -> Self {
        self.options.se_fit = se_fit;
        self
    }

    /// Set the interval type (`None` for point predictions only).
    pub fn interval(mut self, interval: Option<IntervalType>) -> Self {
        self.options.interval = interval;
        self
    }

    /// Set the confidence level.
    pub fn level(mut self, level: f64) -> Self {
        self.options.level = level;
        self
    }

    /// Set the simultaneous-inference adjustment.
    pub fn adjust(mut self, adjust: Adjustment) -> Self {
        self.options.adjust = adjust;
        self
    }

    /// Set the number of simultaneous intervals.
    pub fn k(mut self, k: usize) -> Self {
        self.options.k = Some(k);
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<PredictOptions, PredictError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> PredictOptions {
        self.options
    }
}
