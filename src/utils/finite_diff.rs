//! Finite-difference Jacobians of vector-valued mean functions.
//!
//! Derivatives are taken with respect to a relative perturbation of each
//! coefficient, so the effective step is proportional to the coefficient's
//! magnitude (coefficients equal to zero use an absolute step). Errors raised
//! by the function while it is being differenced are captured and returned
//! instead of being folded into NaN entries.

use crate::core::PredictError;
use faer::{Col, Mat};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference Jacobian of `func` at `beta`.
///
/// `func` maps a coefficient vector to `n` mean responses. The result is the
/// n × p matrix of partial derivatives. Fails with `NumericalError` if `func`
/// errors during differencing or any derivative is not finite.
pub fn forward_jacobian<F>(beta: &Col<f64>, n: usize, func: F) -> Result<Mat<f64>, PredictError>
where
    F: Fn(&Col<f64>) -> Result<Col<f64>, PredictError>,
{
    let p = beta.nrows();
    let scale: Vec<f64> = (0..p)
        .map(|j| if beta[j] != 0.0 { beta[j].abs() } else { 1.0 })
        .collect();

    let closure_err: RefCell<Option<PredictError>> = RefCell::new(None);
    let scaled = |u: &Vec<f64>| -> Vec<f64> {
        let b = Col::from_fn(p, |j| beta[j] + scale[j] * u[j]);
        match func(&b) {
            Ok(values) if values.nrows() == n => (0..n).map(|i| values[i]).collect(),
            Ok(values) => {
                closure_err.replace(Some(PredictError::DimensionMismatch {
                    expected: n,
                    got: values.nrows(),
                }));
                vec![f64::NAN; n]
            }
            Err(err) => {
                closure_err.replace(Some(err));
                vec![f64::NAN; n]
            }
        }
    };

    let origin = vec![0.0; p];
    let jac = origin.forward_jacobian(&scaled);

    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    if jac.len() != p || jac.iter().any(|column| column.len() != n) {
        return Err(PredictError::NumericalError(
            "finite-difference Jacobian has unexpected shape".to_string(),
        ));
    }

    let mut out = Mat::zeros(n, p);
    for j in 0..p {
        for i in 0..n {
            let d = jac[j][i] / scale[j];
            if !d.is_finite() {
                return Err(PredictError::NumericalError(format!(
                    "non-finite derivative for coefficient {} at row {}",
                    j, i
                )));
            }
            out[(i, j)] = d;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_function_jacobian() {
        // f_i(b) = b0 + b1 * x_i, so ∂f/∂b0 = 1 and ∂f/∂b1 = x_i
        let x = [1.0, 2.0, 3.0];
        let beta = Col::from_fn(2, |j| (j + 1) as f64 * 10.0);

        let jac = forward_jacobian(&beta, 3, |b| Ok(Col::from_fn(3, |i| b[0] + b[1] * x[i])))
            .unwrap();

        for i in 0..3 {
            assert!((jac[(i, 0)] - 1.0).abs() < 1e-5);
            assert!((jac[(i, 1)] - x[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_coefficient_uses_absolute_step() {
        // f(b) = exp(b0 * x) at b0 = 0 has derivative x
        let beta = Col::zeros(1);
        let jac = forward_jacobian(&beta, 2, |b| {
            Ok(Col::from_fn(2, |i| (b[0] * (i + 1) as f64).exp()))
        })
        .unwrap();

        assert!((jac[(0, 0)] - 1.0).abs() < 1e-6);
        assert!((jac[(1, 0)] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_error_inside_function_is_propagated() {
        let beta = Col::from_fn(1, |_| 1.0);
        let result = forward_jacobian(&beta, 2, |_| {
            Err(PredictError::NumericalError("boom".to_string()))
        });
        assert!(matches!(result, Err(PredictError::NumericalError(msg)) if msg == "boom"));
    }

    #[test]
    fn test_non_finite_derivative_is_rejected() {
        // sqrt(b - 1) is NaN around b = 0
        let beta = Col::zeros(1);
        let result = forward_jacobian(&beta, 1, |b| Ok(Col::from_fn(1, |_| (b[0] - 1.0).sqrt())));
        assert!(matches!(result, Err(PredictError::NumericalError(_))));
    }
}
