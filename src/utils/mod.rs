//! Numerical helpers shared by the predictors.

pub mod finite_diff;
pub mod matrix;

pub use finite_diff::forward_jacobian;
pub use matrix::{
    compute_matrix_inverse, crossprod, quadratic_form_diag, upper_triangular_factor,
};
