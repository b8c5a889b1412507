//! Mean-response functions for nonlinear models.
//!
//! A [`MeanFunction`] maps an explicit coefficient vector and an n × q matrix
//! of predictor values to n mean responses. Self-starting models
//! ([`SsLogistic`], [`SsMicmen`], [`SsAsymptotic`]) also supply an analytic
//! gradient; an [`Expression`] does not, so its Jacobian is obtained by
//! finite differences.

use faer::{Col, Mat};
use std::fmt;
use std::sync::Arc;

/// A nonlinear mean-response function f(x; β).
pub trait MeanFunction: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    /// Coefficient names, in the order `evaluate` expects them.
    fn parameter_names(&self) -> Vec<String>;

    /// Predictor variables, in the column order of `x`.
    fn variables(&self) -> Vec<String>;

    /// Mean response for each row of `x`.
    fn evaluate(&self, beta: &Col<f64>, x: &Mat<f64>) -> Col<f64>;

    /// Analytic n × p gradient with respect to `beta`, if the model supplies one.
    fn gradient(&self, _beta: &Col<f64>, _x: &Mat<f64>) -> Option<Mat<f64>> {
        None
    }
}

/// Three-parameter logistic: `Asym / (1 + exp((xmid - x) / scal))`.
#[derive(Debug, Clone)]
pub struct SsLogistic {
    input: String,
}

impl SsLogistic {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl MeanFunction for SsLogistic {
    fn name(&self) -> &str {
        "SSlogis"
    }

    fn parameter_names(&self) -> Vec<String> {
        vec!["Asym".into(), "xmid".into(), "scal".into()]
    }

    fn variables(&self) -> Vec<String> {
        vec![self.input.clone()]
    }

    fn evaluate(&self, beta: &Col<f64>, x: &Mat<f64>) -> Col<f64> {
        let (asym, xmid, scal) = (beta[0], beta[1], beta[2]);
        Col::from_fn(x.nrows(), |i| asym / (1.0 + ((xmid - x[(i, 0)]) / scal).exp()))
    }

    fn gradient(&self, beta: &Col<f64>, x: &Mat<f64>) -> Option<Mat<f64>> {
        let (asym, xmid, scal) = (beta[0], beta[1], beta[2]);
        let mut grad = Mat::zeros(x.nrows(), 3);

        for i in 0..x.nrows() {
            let z = (xmid - x[(i, 0)]) / scal;
            let e = z.exp();
            let d = 1.0 + e;
            grad[(i, 0)] = 1.0 / d;
            grad[(i, 1)] = -asym * e / (scal * d * d);
            grad[(i, 2)] = asym * e * z / (scal * d * d);
        }

        Some(grad)
    }
}

/// Michaelis–Menten: `Vm * x / (K + x)`.
#[derive(Debug, Clone)]
pub struct SsMicmen {
    input: String,
}

impl SsMicmen {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl MeanFunction for SsMicmen {
    fn name(&self) -> &str {
        "SSmicmen"
    }

    fn parameter_names(&self) -> Vec<String> {
        vec!["Vm".into(), "K".into()]
    }

    fn variables(&self) -> Vec<String> {
        vec![self.input.clone()]
    }

    fn evaluate(&self, beta: &Col<f64>, x: &Mat<f64>) -> Col<f64> {
        let (vm, k) = (beta[0], beta[1]);
        Col::from_fn(x.nrows(), |i| vm * x[(i, 0)] / (k + x[(i, 0)]))
    }

    fn gradient(&self, beta: &Col<f64>, x: &Mat<f64>) -> Option<Mat<f64>> {
        let (vm, k) = (beta[0], beta[1]);
        let mut grad = Mat::zeros(x.nrows(), 2);

        for i in 0..x.nrows() {
            let xi = x[(i, 0)];
            let d = k + xi;
            grad[(i, 0)] = xi / d;
            grad[(i, 1)] = -vm * xi / (d * d);
        }

        Some(grad)
    }
}

/// Asymptotic regression: `Asym + (R0 - Asym) * exp(-exp(lrc) * x)`.
#[derive(Debug, Clone)]
pub struct SsAsymptotic {
    input: String,
}

impl SsAsymptotic {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl MeanFunction for SsAsymptotic {
    fn name(&self) -> &str {
        "SSasymp"
    }

    fn parameter_names(&self) -> Vec<String> {
        vec!["Asym".into(), "R0".into(), "lrc".into()]
    }

    fn variables(&self) -> Vec<String> {
        vec![self.input.clone()]
    }

    fn evaluate(&self, beta: &Col<f64>, x: &Mat<f64>) -> Col<f64> {
        let (asym, r0, lrc) = (beta[0], beta[1], beta[2]);
        let rate = lrc.exp();
        Col::from_fn(x.nrows(), |i| asym + (r0 - asym) * (-rate * x[(i, 0)]).exp())
    }

    fn gradient(&self, beta: &Col<f64>, x: &Mat<f64>) -> Option<Mat<f64>> {
        let (asym, r0, lrc) = (beta[0], beta[1], beta[2]);
        let rate = lrc.exp();
        let mut grad = Mat::zeros(x.nrows(), 3);

        for i in 0..x.nrows() {
            let xi = x[(i, 0)];
            let e = (-rate * xi).exp();
            grad[(i, 0)] = 1.0 - e;
            grad[(i, 1)] = e;
            grad[(i, 2)] = -(r0 - asym) * e * rate * xi;
        }

        Some(grad)
    }
}

type ExpressionFn = dyn Fn(&Col<f64>, &Mat<f64>) -> Col<f64> + Send + Sync;

/// A user-supplied mean function without an analytic gradient.
#[derive(Clone)]
pub struct Expression {
    name: String,
    parameters: Vec<String>,
    variables: Vec<String>,
    func: Arc<ExpressionFn>,
}

impl Expression {
    /// Wrap `func`, which receives the coefficients (ordered as `parameters`)
    /// and the predictor matrix (columns ordered as `variables`).
    pub fn new<F>(name: &str, parameters: &[&str], variables: &[&str], func: F) -> Self
    where
        F: Fn(&Col<f64>, &Mat<f64>) -> Col<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            parameters: parameters.iter().map(|s| s.to_string()).collect(),
            variables: variables.iter().map(|s| s.to_string()).collect(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("variables", &self.variables)
            .finish()
    }
}

impl MeanFunction for Expression {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_names(&self) -> Vec<String> {
        self.parameters.clone()
    }

    fn variables(&self) -> Vec<String> {
        self.variables.clone()
    }

    fn evaluate(&self, beta: &Col<f64>, x: &Mat<f64>) -> Col<f64> {
        (self.func)(beta, x)
    }
}
