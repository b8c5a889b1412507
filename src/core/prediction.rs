//! Prediction types for interval estimation.

use faer::Col;

/// Type of interval to compute for predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalType {
    /// Confidence interval for the mean response E[Y|X=x₀].
    /// Narrower - only accounts for uncertainty in coefficient estimates.
    Confidence,

    /// Prediction interval for a new observation Y|X=x₀.
    /// Wider - also accounts for residual variance (irreducible error).
    Prediction,
}

/// Result of prediction with optional standard errors and intervals.
///
/// Every populated column has one entry per row of the new data. Whenever
/// bounds are present, `lower[i] <= fit[i] <= upper[i]`.
#[derive(Debug, Clone)]
pub struct PredictionResult {
    /// Point predictions.
    pub fit: Col<f64>,
    /// Standard errors of the fit, present iff requested.
    pub se_fit: Option<Col<f64>>,
    /// Lower bounds, present iff an interval was constructed.
    pub lower: Option<Col<f64>>,
    /// Upper bounds, present iff an interval was constructed.
    pub upper: Option<Col<f64>>,
    /// Residual degrees of freedom, reported alongside `se_fit`.
    pub df: Option<f64>,
    /// Residual standard deviation (Sigma), reported alongside `se_fit`.
    pub residual_scale: Option<f64>,
}

impl PredictionResult {
    /// Create a new prediction result with only point predictions.
    pub fn point_only(fit: Col<f64>) -> Self {
        Self {
            fit,
            se_fit: None,
            lower: None,
            upper: None,
            df: None,
            residual_scale: None,
        }
    }

    /// Attach interval bounds.
    pub fn with_intervals(mut self, lower: Col<f64>, upper: Col<f64>) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }

    /// Attach standard errors together with the residual scale and df they were computed from.
    pub fn with_se(
        mut self,
        se_fit: Col<f64>,
        residual_scale: Option<f64>,
        df: Option<f64>,
    ) -> Self {
        self.se_fit = Some(se_fit);
        self.residual_scale = residual_scale;
        self.df = df;
        self
    }

    /// Number of predictions.
    pub fn len(&self) -> usize {
        self.fit.nrows()
    }

    /// Returns true if there are no predictions.
    pub fn is_empty(&self) -> bool {
        self.fit.nrows() == 0
    }

    /// Returns true if interval bounds were constructed.
    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    /// Interval bounds `(lower, upper)` for row `i`, if present.
    pub fn interval(&self, i: usize) -> Option<(f64, f64)> {
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) if i < lower.nrows() => Some((lower[i], upper[i])),
            _ => None,
        }
    }
}
