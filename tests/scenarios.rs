//! End-to-end detection scenarios.
//!
//! Each test builds a series with a known shape and checks the selected
//! model, its parameters and the reported anomalies.

use anofox_anomaly::prelude::*;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::{ContinuousCDF, Normal};

fn dense_time(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}

/// Evenly spaced normal quantiles.
fn normal_quantiles(n: usize, mean: f64, std: f64) -> Vec<f64> {
    let dist = Normal::new(mean, std).unwrap();
    (0..n)
        .map(|i| dist.inverse_cdf((i as f64 + 0.5) / n as f64))
        .collect()
}

fn run(time: Option<Vec<f64>>, values: Vec<f64>, params: Params) -> FittingResult {
    AnomalyDetector::from_arrays(time, values, params)
        .unwrap()
        .check()
        .unwrap()
}

// =============================================================================
// Model selection scenarios
// =============================================================================

#[test]
fn pure_linear_trend_selects_linear() {
    let time = dense_time(100);
    let values: Vec<f64> = time.iter().map(|t| 6.0 * t + 10.0).collect();

    let result = run(Some(time), values, Params::default());

    assert_eq!(result.model, ModelKind::LinearRegression);
    assert_relative_eq!(result.popt[0], 10.0, epsilon = 1.0);
    assert_relative_eq!(result.popt[1], 6.0, max_relative = 0.1);
    assert!(result.outliers.is_empty());
    assert!(!result.check_failed);
    assert!(result.has_diagnostic(DiagnosticCode::CheckPassed));
}

#[test]
fn single_upward_step_flags_midpoint() {
    let time = dense_time(100);
    let values: Vec<f64> = time
        .iter()
        .map(|&t| {
            let sign = if t > 20.0 {
                1.0
            } else if t < 20.0 {
                -1.0
            } else {
                0.0
            };
            20.0 * (sign + 2.0)
        })
        .collect();

    let result = run(Some(time), values, Params::default());

    assert_eq!(result.model, ModelKind::IncreaseStepFunc);
    assert_relative_eq!(result.popt[0], 20.0, max_relative = 0.1);
    assert_relative_eq!(result.popt[1], 60.0, max_relative = 0.1);
    assert_relative_eq!(result.popt[2], 20.0, max_relative = 0.1);
    assert_eq!(result.outliers, vec![(20.0, 40.0)]);
    assert_eq!(result.residual.len(), 1);
    assert!(result.check_failed);
    assert!(!result.has_diagnostic(DiagnosticCode::CheckPassed));
}

#[test]
fn pure_exponential_decay_selects_exp_decay() {
    let time = dense_time(100);
    let values: Vec<f64> = time.iter().map(|t| 10.0 * (-3.0 * t).exp()).collect();

    let result = run(Some(time), values, Params::default());

    assert_eq!(result.model, ModelKind::ExpDecay);
    assert_relative_eq!(result.popt[0], 10.0, max_relative = 0.1);
    assert_relative_eq!(result.popt[1], 3.0, max_relative = 0.1);
    assert!(result.perr.iter().all(|e| e.abs() < 1e-3));
    assert!(result.outliers.is_empty());
}

#[test]
fn gaussian_noise_selects_gaussian() {
    let values = normal_quantiles(100, 100.0, 10.0);

    let result = run(None, values, Params::default());

    assert_eq!(result.model, ModelKind::Gaussian);
    assert_relative_eq!(result.popt[1], 100.0, max_relative = 0.1);
    assert_relative_eq!(result.popt[2], 10.0, max_relative = 0.1);
    assert!(result.scores.is_empty(), "competition must not run");
    assert_eq!(result.outliers.len(), result.residual.len());
    assert!(result.residual.iter().all(|&r| r > 1.5));
}

#[test]
fn random_gaussian_draws_fit_their_moments() {
    use rand::distributions::Distribution;

    let mut rng = StdRng::seed_from_u64(2024);
    let dist = Normal::new(100.0, 10.0).unwrap();
    let values: Vec<f64> = (0..100).map(|_| dist.sample(&mut rng)).collect();
    let n = values.len() as f64;
    let sample_mean = values.iter().sum::<f64>() / n;
    let sample_std = (values.iter().map(|v| (v - sample_mean).powi(2)).sum::<f64>() / n).sqrt();

    let result = run(None, values, Params::default());

    assert_eq!(result.model, ModelKind::Gaussian);
    assert!((result.popt[1] - sample_mean).abs() < 0.1 * sample_std);
    assert_relative_eq!(result.popt[2], sample_std, max_relative = 0.08);
}

#[test]
fn normal_values_beyond_parameter_box_compete() {
    let values = normal_quantiles(100, 2e6, 1e4);

    let result = run(None, values, Params::default());

    assert_ne!(result.model, ModelKind::Gaussian);
    assert!(!result.scores.is_empty(), "competition must run");
}

#[test]
fn offset_ramp_is_not_mistaken_for_noise() {
    let values: Vec<f64> = (1..=30).map(|t| 1e9 + t as f64).collect();

    let result = run(None, values, Params::default());

    assert_ne!(result.model, ModelKind::Gaussian);
    assert!(result.outliers.is_empty(), "{:?}", result.outliers);
    assert!(result.has_diagnostic(DiagnosticCode::CheckPassed));
}

#[test]
fn short_series_fails_validation() {
    let result = AnomalyDetector::from_arrays(None, vec![1.0, 2.0, 3.0, 4.0, 5.0], Params::default());
    match result {
        Err(err) => {
            assert_eq!(err, AnomalyError::InsufficientData { needed: 10, got: 5 });
            assert!(err.is_validation());
        }
        Ok(_) => panic!("expected a validation error"),
    }
}

#[test]
fn flat_series_does_not_divide_by_zero() {
    let result = run(None, vec![50.0; 30], Params::default());

    assert!(result.outliers.is_empty());
    assert!(result.popt.iter().all(|p| p.is_finite()));
    assert!(result.has_diagnostic(DiagnosticCode::CheckPassed));
}

// =============================================================================
// Policies and reporting
// =============================================================================

#[test]
fn spike_is_reported_in_caller_units() {
    // Caller time stamps are reported even though fitting uses 1..=N
    let time: Vec<f64> = (0..100).map(|i| 1000.0 + 10.0 * i as f64).collect();
    let mut values: Vec<f64> = (1..=100).map(|t| 6.0 * t as f64 + 10.0).collect();
    values[49] += 300.0;

    let result = run(Some(time), values, Params::default());

    assert_eq!(result.model, ModelKind::LinearRegression);
    assert_eq!(result.outliers, vec![(1490.0, 610.0)]);
    assert!(result.residual[0] > Params::default().linear_res);
}

#[test]
fn bic_selects_the_same_trend() {
    let time = dense_time(100);
    let values: Vec<f64> = time.iter().map(|t| 6.0 * t + 10.0).collect();
    let params = Params::default().with_info_criterion(InfoCriterion::BIC);

    let result = run(Some(time), values, params);

    assert_eq!(result.model, ModelKind::LinearRegression);
    assert_eq!(result.criterion, InfoCriterion::BIC);
    assert_eq!(result.scores.len(), 3);
}

#[test]
fn negative_time_disqualifies_exp_decay() {
    let time: Vec<f64> = (-50..50).map(f64::from).collect();
    let values: Vec<f64> = time.iter().map(|t| 2.0 * t + 500.0).collect();
    let params = Params::default().with_scaleless_t(false);

    let result = run(Some(time), values, params);

    assert_eq!(result.model, ModelKind::LinearRegression);
    assert!(result.scores[&Ansatz::ExpDecay].is_infinite());
}

#[test]
fn disabled_competitors_are_not_scored() {
    let values: Vec<f64> = (1..=100).map(|t| 3.0 * t as f64).collect();
    let toggles = ModelToggles {
        step_func: false,
        ..ModelToggles::default()
    };

    let result = run(None, values, Params::default().with_models(toggles));

    assert!(!result.scores.contains_key(&Ansatz::StepFunc));
    assert_eq!(result.scores.len(), 2);
}

#[test]
fn boxcox_policy_fits_log_values() {
    let values = normal_quantiles(100, 100.0, 10.0);

    let result = run(None, values, Params::default().with_boxcox(true));

    assert_eq!(result.model, ModelKind::Gaussian);
    assert_relative_eq!(result.popt[1], 100.0_f64.ln(), epsilon = 0.05);
    assert!(result.has_diagnostic(DiagnosticCode::BoxCox));
}

#[test]
fn info_codes_follow_policies() {
    let values: Vec<f64> = (1..=100).map(|t| 2.0 * t as f64).collect();

    let with = run(None, values.clone(), Params::default());
    assert!(with.has_diagnostic(DiagnosticCode::ZNormalization));
    assert!(!with.has_diagnostic(DiagnosticCode::BoxCox));

    let without = run(None, values, Params::default().with_z_normalization(false));
    assert!(!without.has_diagnostic(DiagnosticCode::ZNormalization));
}

#[test]
fn result_serializes_to_json() {
    let time = dense_time(100);
    let mut values: Vec<f64> = time.iter().map(|t| 6.0 * t + 10.0).collect();
    values[49] += 300.0;

    let result = run(Some(time), values, Params::default());
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    assert_eq!(json["model"], "linear_regression");
    assert_eq!(json["outliers"], serde_json::json!([[50.0, 610.0]]));
    assert_eq!(json["popt"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(json["criterion"], "AIC");
}

#[test]
fn json_config_drives_a_run() {
    let params = Params::from_json(r#"{"info_criterion": "bic", "min_sample_size": 20}"#).unwrap();
    let short = AnomalyDetector::from_arrays(None, vec![1.0; 15], params.clone());
    assert!(matches!(short, Err(AnomalyError::InsufficientData { needed: 20, got: 15 })));

    let err = Params::from_json(r#"{"info_criterion": "AICc"}"#).unwrap_err();
    assert!(matches!(err, AnomalyError::UnsupportedCriterion(_)));
}

#[test]
fn invalid_inputs_fail_before_fitting() {
    let mismatch = AnomalyDetector::from_arrays(Some(dense_time(9)), vec![1.0; 10], Params::default());
    assert!(matches!(mismatch, Err(AnomalyError::DimensionMismatch { .. })));

    let mut values = vec![1.0; 12];
    values[3] = f64::NAN;
    let nan = AnomalyDetector::from_arrays(None, values, Params::default());
    assert!(matches!(nan, Err(AnomalyError::NonFiniteValues)));
}

// =============================================================================
// Noisy series
// =============================================================================

#[test]
fn noisy_trend_is_deterministic() {
    use rand::distributions::Distribution;

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 2.0).unwrap();
    let values: Vec<f64> = (1..=80)
        .map(|t| 5.0 * t as f64 + 20.0 + noise.sample(&mut rng))
        .collect();

    let detector = AnomalyDetector::from_arrays(None, values, Params::default()).unwrap();
    let first = detector.check().unwrap();
    let second = detector.check().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.model, ModelKind::LinearRegression);
    assert_relative_eq!(first.popt[1], 5.0, max_relative = 0.05);
}
