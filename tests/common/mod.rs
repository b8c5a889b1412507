//! Common test utilities and data generators.
#![allow(dead_code)]

use faer::{Col, Mat};
use predfit_rs::prelude::*;

/// Helper to assert approximate equality with a tolerance.
pub fn assert_approx(actual: f64, expected: f64, tol: f64, name: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{}: expected {}, got {}, diff = {}",
        name,
        expected,
        actual,
        (actual - expected).abs()
    );
}

/// x = 1..=n, y = 1 + 0.5x with residuals alternating +0.3 / -0.3.
pub fn alternating_line(n: usize) -> DataFrame {
    let x: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &xi)| 1.0 + 0.5 * xi + if i % 2 == 0 { 0.3 } else { -0.3 })
        .collect();
    DataFrame::new(vec![("x", x), ("y", y)]).unwrap()
}

/// x = 1..=5, y = 2x exactly.
pub fn perfect_line() -> DataFrame {
    DataFrame::new(vec![
        ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ("y", vec![2.0, 4.0, 6.0, 8.0, 10.0]),
    ])
    .unwrap()
}

/// Noisy two-predictor data with a deterministic pseudo-random generator.
pub fn generate_two_predictor_data(n_samples: usize, noise_std: f64, seed: u64) -> DataFrame {
    let mut rng_state = seed;
    let next_rand = |state: &mut u64| -> f64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut x1 = Vec::with_capacity(n_samples);
    let mut x2 = Vec::with_capacity(n_samples);
    let mut y = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let a = 5.0 * next_rand(&mut rng_state);
        let b = 2.0 * next_rand(&mut rng_state);
        x1.push(a);
        x2.push(b);
        y.push(1.0 + 2.0 * a - 0.5 * b + noise_std * next_rand(&mut rng_state));
    }

    DataFrame::new(vec![("x1", x1), ("x2", x2), ("y", y)]).unwrap()
}

/// Treated arm of the Puromycin enzyme-kinetics data.
pub fn puromycin() -> DataFrame {
    DataFrame::new(vec![
        (
            "conc",
            vec![0.02, 0.02, 0.06, 0.06, 0.11, 0.11, 0.22, 0.22, 0.56, 0.56, 1.10, 1.10],
        ),
        (
            "rate",
            vec![76.0, 47.0, 97.0, 107.0, 123.0, 139.0, 159.0, 152.0, 191.0, 201.0, 207.0, 200.0],
        ),
    ])
    .unwrap()
}

/// Michaelis-Menten fit to [`puromycin`] at its least-squares estimates.
pub fn puromycin_model(algorithm: NlsAlgorithm) -> NlsModel {
    NlsModel::from_estimates(
        SsMicmen::new("conc"),
        puromycin(),
        "rate",
        Col::from_fn(2, |j| [212.68, 0.06412][j]),
        algorithm,
    )
    .unwrap()
}

/// Population-level growth model `distance ~ age`.
pub fn growth_model() -> LmeModel {
    let data = DataFrame::new(vec![
        ("age", vec![8.0, 10.0, 12.0, 14.0, 8.0, 10.0, 12.0, 14.0]),
        (
            "distance",
            vec![21.0, 20.0, 21.5, 23.0, 21.0, 21.5, 24.0, 25.5],
        ),
    ])
    .unwrap();
    let vcov = Mat::from_fn(2, 2, |i, j| [[0.6142, -0.0508], [-0.0508, 0.0044]][i][j]);
    LmeModel::from_estimates(
        Formula::parse("distance ~ age").unwrap(),
        data,
        Col::from_fn(2, |j| [16.7611, 0.6602][j]),
        vcov,
        1.4322,
    )
    .unwrap()
}
