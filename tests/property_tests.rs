//! Property-based tests for the detection engine.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use anofox_anomaly::prelude::*;
use proptest::prelude::*;

/// Strategy for generating positive series with non-zero variance.
fn valid_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(1.0..1000.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.001;
            }
            v
        })
    })
}

/// Strategy for generating a trend with a few large spikes.
fn spiky_trend_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        (
            0.0..100.0_f64,
            0.1..5.0_f64,
            prop::collection::vec((0..len, 50.0..500.0_f64), 0..4),
        )
            .prop_map(move |(base, slope, spikes)| {
                let mut v: Vec<f64> = (0..len).map(|i| base + slope * i as f64).collect();
                for (idx, height) in spikes {
                    v[idx] += height;
                }
                v
            })
    })
}

fn check(values: &[f64], params: Params) -> Result<FittingResult> {
    AnomalyDetector::from_arrays(None, values.to_vec(), params)?.check()
}

fn scaled_thresholds(factor: f64) -> Params {
    let base = Params::default();
    Params::default()
        .with_std_width(base.std_width * factor)
        .with_linear_res(base.linear_res * factor)
        .with_sgn_res(base.sgn_res * factor)
        .with_exp_decay_res(base.exp_decay_res * factor)
}

// =============================================================================
// Property: Passed code is present exactly when nothing was flagged
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn passed_code_iff_no_outliers(values in valid_values_strategy(20, 80)) {
        let result = check(&values, Params::default()).unwrap();
        prop_assert_eq!(
            result.has_diagnostic(DiagnosticCode::CheckPassed),
            result.outliers.is_empty()
        );
        prop_assert_eq!(result.check_failed, !result.outliers.is_empty());
    }

    #[test]
    fn outliers_are_sorted_and_aligned(values in spiky_trend_strategy(20, 80)) {
        let result = check(&values, Params::default()).unwrap();
        prop_assert_eq!(result.outliers.len(), result.residual.len());
        prop_assert!(result.outliers.windows(2).all(|w| w[0].0 <= w[1].0));
        for &(t, x) in &result.outliers {
            let idx = t as usize - 1;
            prop_assert_eq!(values[idx], x);
        }
    }
}

// =============================================================================
// Property: Repeated checks are bit-identical
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn check_is_idempotent(values in spiky_trend_strategy(20, 60)) {
        let detector = AnomalyDetector::from_arrays(None, values, Params::default()).unwrap();
        let first = detector.check().unwrap();
        let second = detector.check().unwrap();
        prop_assert_eq!(format!("{:?}", first), format!("{:?}", second));
    }
}

// =============================================================================
// Property: Raising the residual threshold never adds outliers
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn higher_threshold_never_adds_outliers(
        values in spiky_trend_strategy(20, 60),
        factor in 1.0..4.0_f64
    ) {
        let base = check(&values, Params::default()).unwrap();
        let strict = check(&values, scaled_thresholds(factor)).unwrap();
        prop_assert_eq!(base.model, strict.model);
        prop_assert!(strict.outliers.len() <= base.outliers.len());
    }
}
