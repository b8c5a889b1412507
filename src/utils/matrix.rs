//! Matrix utility functions.

use crate::core::PredictError;
use faer::{Col, Mat};

/// Relative tolerance on the diagonal of a triangular factor below which the
/// factor is treated as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Compute A'A.
pub fn crossprod(a: &Mat<f64>) -> Mat<f64> {
    a.transpose() * a
}

/// Upper-triangular p × p factor R of the thin QR decomposition of an n × p matrix.
pub fn upper_triangular_factor(a: &Mat<f64>) -> Result<Mat<f64>, PredictError> {
    let n = a.nrows();
    let p = a.ncols();
    if n < p {
        return Err(PredictError::NumericalError(format!(
            "cannot factor a {}x{} matrix with fewer rows than columns",
            n, p
        )));
    }

    let qr: faer::linalg::solvers::Qr<f64> = a.qr();
    let r = qr.R();

    Ok(Mat::from_fn(p, p, |i, j| if i <= j { r[(i, j)] } else { 0.0 }))
}

/// General matrix inverse using QR decomposition.
pub fn compute_matrix_inverse(matrix: &Mat<f64>) -> Result<Mat<f64>, PredictError> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(PredictError::DimensionMismatch {
            expected: n,
            got: matrix.ncols(),
        });
    }
    if (0..n).any(|i| (0..n).any(|j| !matrix[(i, j)].is_finite())) {
        return Err(PredictError::NumericalError(
            "matrix contains non-finite entries".to_string(),
        ));
    }

    let qr: faer::linalg::solvers::Qr<f64> = matrix.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    // Check if R is singular relative to its largest pivot
    let scale = (0..n).map(|i| r[(i, i)].abs()).fold(0.0, f64::max);
    for i in 0..n {
        if scale == 0.0 || r[(i, i)].abs() <= SINGULAR_TOLERANCE * scale {
            return Err(PredictError::NumericalError(
                "matrix is singular or nearly singular".to_string(),
            ));
        }
    }

    // Solve R * X = Q' for each column of identity to get inverse
    let mut inv = Mat::zeros(n, n);
    let qt = q.transpose();

    for col in 0..n {
        for i in (0..n).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..n {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Ok(inv)
}

/// Compute x_i' V x_i for row `i` of `x`.
fn quadratic_form_row(x: &Mat<f64>, i: usize, v: &Mat<f64>) -> f64 {
    let p = x.ncols();

    let mut total = 0.0;
    for j in 0..p {
        let mut vx = 0.0;
        for k in 0..p {
            vx += v[(j, k)] * x[(i, k)];
        }
        total += x[(i, j)] * vx;
    }

    total
}

/// Diagonal of X V X', one entry per row of `x`.
///
/// Round-off can leave an exactly-zero variance slightly negative; such values
/// are clamped to zero. Anything more negative, or non-finite, is an error.
pub fn quadratic_form_diag(x: &Mat<f64>, v: &Mat<f64>) -> Result<Col<f64>, PredictError> {
    let p = x.ncols();
    if v.nrows() != p || v.ncols() != p {
        return Err(PredictError::DimensionMismatch {
            expected: v.nrows(),
            got: p,
        });
    }

    let v_scale = (0..p).map(|j| v[(j, j)].abs()).fold(0.0, f64::max);
    let mut diag = Col::zeros(x.nrows());

    for i in 0..x.nrows() {
        let q = quadratic_form_row(x, i, v);
        let x_norm2: f64 = (0..p).map(|j| x[(i, j)] * x[(i, j)]).sum();
        let slack = 1e-12 * v_scale * x_norm2.max(1.0);

        diag[i] = if q >= 0.0 {
            q
        } else if q >= -slack {
            0.0
        } else {
            return Err(PredictError::NumericalError(format!(
                "negative variance {} in row {}; covariance matrix is not positive semi-definite",
                q, i
            )));
        };
        if !diag[i].is_finite() {
            return Err(PredictError::NumericalError(format!(
                "non-finite variance in row {}",
                i
            )));
        }
    }

    Ok(diag)
}
