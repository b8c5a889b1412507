//! Tests for linear-model predictions validated against R's predict.lm().

mod common;

use approx::assert_relative_eq;
use common::{alternating_line, assert_approx, generate_two_predictor_data, perfect_line};
use predfit_rs::prelude::*;

fn fit_line() -> FittedLm {
    OlsRegressor::new(Formula::parse("y ~ x").unwrap())
        .fit(&alternating_line(8))
        .expect("model should fit")
}

fn newdata() -> DataFrame {
    DataFrame::new(vec![("x", vec![4.5, 10.0])]).unwrap()
}

/// R code:
/// ```r
/// x <- 1:8
/// y <- 1 + 0.5 * x + rep(c(0.3, -0.3), 4)
/// model <- lm(y ~ x)
/// predict(model, data.frame(x = c(4.5, 10)), se.fit = TRUE, interval = "confidence")
/// ```
#[test]
fn test_confidence_interval_vs_r() {
    let fitted = fit_line();
    let pred = predict_fit(
        (&fitted).into(),
        Some(&newdata()),
        &PredictOptions::confidence(0.95),
    )
    .unwrap();

    let se = pred.se_fit.as_ref().unwrap();
    let lower = pred.lower.as_ref().unwrap();
    let upper = pred.upper.as_ref().unwrap();

    assert_approx(pred.fit[0], 3.25, 1e-10, "fit[0]");
    assert_approx(pred.fit[1], 5.842857142857143, 1e-10, "fit[1]");
    assert_approx(se[0], 0.11952286093343936, 1e-10, "se[0]");
    assert_approx(se[1], 0.31080321661106134, 1e-10, "se[1]");
    assert_approx(lower[0], 2.957538095099215, 1e-6, "lwr[0]");
    assert_approx(upper[0], 3.542461904900785, 1e-6, "upr[0]");
    assert_approx(lower[1], 5.082349068757560, 1e-6, "lwr[1]");
    assert_approx(upper[1], 6.603365216956726, 1e-6, "upr[1]");

    assert_eq!(pred.df, Some(6.0));
    assert_approx(pred.residual_scale.unwrap(), 0.3380617018914066, 1e-10, "sigma");
}

/// `predict(model, data.frame(x = c(4.5, 10)), interval = "prediction")`
#[test]
fn test_prediction_interval_vs_r() {
    let fitted = fit_line();
    let pred = predict_fit(
        (&fitted).into(),
        Some(&newdata()),
        &PredictOptions::prediction(0.95),
    )
    .unwrap();

    let (lwr0, upr0) = pred.interval(0).unwrap();
    let (lwr1, upr1) = pred.interval(1).unwrap();
    assert_approx(lwr0, 2.372614285297645, 1e-6, "lwr[0]");
    assert_approx(upr0, 4.127385714702355, 1e-6, "upr[0]");
    assert_approx(lwr1, 4.719182698315387, 1e-6, "lwr[1]");
    assert_approx(upr1, 6.966531587398899, 1e-6, "upr[1]");
}

#[test]
fn test_bonferroni_prediction_interval() {
    let fitted = fit_line();
    let options = PredictOptions::builder()
        .interval(Some(IntervalType::Prediction))
        .adjust(Adjustment::Bonferroni)
        .k(2)
        .build()
        .unwrap();
    let pred = predict_fit((&fitted).into(), Some(&newdata()), &options).unwrap();

    let (lwr0, upr0) = pred.interval(0).unwrap();
    let (lwr1, upr1) = pred.interval(1).unwrap();
    assert_approx(lwr0, 2.185522222884917, 1e-6, "lwr[0]");
    assert_approx(upr0, 4.314477777115083, 1e-6, "upr[0]");
    assert_approx(lwr1, 4.479572495200658, 1e-6, "lwr[1]");
    assert_approx(upr1, 7.206141790513628, 1e-6, "upr[1]");
}

/// Working-Hotelling band: sqrt(2 * qf(0.95, 2, 6)).
#[test]
fn test_scheffe_confidence_band() {
    let fitted = fit_line();
    let options = PredictOptions::builder()
        .interval(Some(IntervalType::Confidence))
        .adjust(Adjustment::Scheffe)
        .k(2)
        .build()
        .unwrap();
    let pred = predict_fit((&fitted).into(), Some(&newdata()), &options).unwrap();

    let (lwr0, upr0) = pred.interval(0).unwrap();
    let (lwr1, upr1) = pred.interval(1).unwrap();
    assert_approx(lwr0, 2.866659314157210, 1e-6, "lwr[0]");
    assert_approx(upr0, 3.633340685842790, 1e-6, "upr[0]");
    assert_approx(lwr1, 4.846030951722220, 1e-6, "lwr[1]");
    assert_approx(upr1, 6.839683333992066, 1e-6, "upr[1]");
}

#[test]
fn test_perfect_fit_has_zero_width_intervals() {
    let data = perfect_line();
    let fitted = OlsRegressor::new(Formula::parse("y ~ x").unwrap())
        .fit(&data)
        .unwrap();
    let expected = [2.0, 4.0, 6.0, 8.0, 10.0];

    let requests = [
        PredictOptions::confidence(0.95),
        PredictOptions::prediction(0.99),
        PredictOptions::builder()
            .interval(Some(IntervalType::Prediction))
            .adjust(Adjustment::Bonferroni)
            .k(5)
            .build()
            .unwrap(),
        PredictOptions::builder()
            .interval(Some(IntervalType::Confidence))
            .adjust(Adjustment::Scheffe)
            .k(5)
            .level(0.9)
            .build()
            .unwrap(),
    ];

    for options in &requests {
        let pred = predict_fit((&fitted).into(), None, options).unwrap();
        let se = pred.se_fit.as_ref().unwrap();
        for (i, &y) in expected.iter().enumerate() {
            assert_relative_eq!(pred.fit[i], y, epsilon = 1e-10);
            assert_relative_eq!(se[i], 0.0, epsilon = 1e-10);
            let (lwr, upr) = pred.interval(i).unwrap();
            assert_relative_eq!(lwr, y, epsilon = 1e-8);
            assert_relative_eq!(upr, y, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_default_newdata_reproduces_fitted_values() {
    let data = generate_two_predictor_data(30, 0.5, 42);
    let fitted = OlsRegressor::new(Formula::parse("y ~ x1 + x2").unwrap())
        .fit(&data)
        .unwrap();

    let pred = predict_fit((&fitted).into(), None, &PredictOptions::default()).unwrap();
    assert_eq!(pred.len(), 30);
    for i in 0..30 {
        assert_relative_eq!(pred.fit[i], fitted.fitted_values()[i], epsilon = 1e-12);
    }
}

#[test]
fn test_no_interval_returns_fit_and_se_only() {
    let fitted = fit_line();
    let pred = predict_fit((&fitted).into(), Some(&newdata()), &PredictOptions::default()).unwrap();

    assert!(pred.se_fit.is_some());
    assert!(pred.lower.is_none());
    assert!(pred.upper.is_none());

    let options = PredictOptions::builder().se_fit(false).build().unwrap();
    let pred = predict_fit((&fitted).into(), Some(&newdata()), &options).unwrap();
    assert!(pred.se_fit.is_none());
    assert!(!pred.has_intervals());
    assert!(pred.df.is_none());
}

#[test]
fn test_transformed_terms_in_newdata() {
    let x: Vec<f64> = (1..=10).map(|i| i as f64 / 2.0).collect();
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &xi)| 2.0 - xi + 0.3 * xi * xi + if i % 2 == 0 { 0.05 } else { -0.05 })
        .collect();
    let data = DataFrame::new(vec![("x", x), ("y", y)]).unwrap();
    let fitted = OlsRegressor::new(Formula::parse("y ~ x + I(x^2)").unwrap())
        .fit(&data)
        .unwrap();

    let newdata = DataFrame::new(vec![("x", vec![2.2])]).unwrap();
    let pred = predict_fit(
        (&fitted).into(),
        Some(&newdata),
        &PredictOptions::confidence(0.95),
    )
    .unwrap();

    assert_approx(pred.fit[0], 2.0 - 2.2 + 0.3 * 2.2 * 2.2, 0.1, "quadratic fit");
    let (lwr, upr) = pred.interval(0).unwrap();
    assert!(lwr < pred.fit[0] && pred.fit[0] < upr);
}

#[test]
fn test_missing_predictor_column() {
    let fitted = fit_line();
    let newdata = DataFrame::new(vec![("z", vec![1.0])]).unwrap();
    let result = predict_fit((&fitted).into(), Some(&newdata), &PredictOptions::default());
    assert!(matches!(result, Err(PredictError::MissingParameter(_))));
}
