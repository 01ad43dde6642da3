//! Normality tests.
//!
//! D'Agostino-Pearson omnibus test: the skewness and kurtosis of the sample
//! are each mapped to an approximately standard normal statistic, and their
//! squared sum is compared against a chi-squared distribution with two
//! degrees of freedom.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::utils::stats::{kurtosis, skewness};

/// Result of a normality test.
#[derive(Debug, Clone)]
pub struct NormalityResult {
    /// Omnibus statistic `K² = Z_skew² + Z_kurt²`.
    pub statistic: f64,
    /// P-value under the null hypothesis of normality (NaN if undefined).
    pub p_value: f64,
    /// Standardized skewness statistic.
    pub skew_z: f64,
    /// Standardized kurtosis statistic.
    pub kurtosis_z: f64,
}

impl NormalityResult {
    /// Check if the sample is compatible with normality at level `alpha`.
    ///
    /// A non-finite p-value is never compatible.
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value.is_finite() && self.p_value >= alpha
    }

    fn undefined() -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            skew_z: f64::NAN,
            kurtosis_z: f64::NAN,
        }
    }
}

/// Minimum sample size for the skewness transform.
pub const MIN_NORMALITY_SAMPLES: usize = 8;

/// Z statistic for sample skewness.
///
/// Returns NaN for fewer than [`MIN_NORMALITY_SAMPLES`] values.
pub fn skew_test(series: &[f64]) -> f64 {
    let n = series.len() as f64;
    if series.len() < MIN_NORMALITY_SAMPLES {
        return f64::NAN;
    }
    let b2 = skewness(series);
    if !b2.is_finite() {
        return f64::NAN;
    }

    let mut y = b2 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = (3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0))
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    if y == 0.0 {
        y = 1.0;
    }
    let ya = y / alpha;
    delta * (ya + (ya * ya + 1.0).sqrt()).ln()
}

/// Z statistic for sample kurtosis (Anscombe-Glynn transform).
///
/// Returns NaN for fewer than five values.
pub fn kurtosis_test(series: &[f64]) -> f64 {
    let n = series.len() as f64;
    if series.len() < 5 {
        return f64::NAN;
    }
    let b2 = kurtosis(series);
    if !b2.is_finite() {
        return f64::NAN;
    }

    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / var_b2.sqrt();

    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());

    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();

    (term1 - term2) / (2.0 / (9.0 * a)).sqrt()
}

/// D'Agostino-Pearson omnibus normality test.
///
/// # Returns
/// `NormalityResult`; every field is NaN when the sample is too small or
/// has zero variance, which callers treat as "not normal".
pub fn normal_test(series: &[f64]) -> NormalityResult {
    if series.len() < MIN_NORMALITY_SAMPLES || series.iter().any(|v| !v.is_finite()) {
        return NormalityResult::undefined();
    }

    let skew_z = skew_test(series);
    let kurtosis_z = kurtosis_test(series);
    let statistic = skew_z * skew_z + kurtosis_z * kurtosis_z;
    if !statistic.is_finite() {
        return NormalityResult::undefined();
    }

    let p_value = ChiSquared::new(2.0)
        .map(|chi2| chi2.sf(statistic))
        .unwrap_or(f64::NAN);

    NormalityResult {
        statistic,
        p_value,
        skew_z,
        kurtosis_z,
    }
}
