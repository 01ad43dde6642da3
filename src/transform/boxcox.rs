//! Box-Cox power transformation.
//!
//! An optional input-conditioning step: the detector can fit its normal
//! ansatz on `ln(x)` (λ = 0), and callers can pre-transform a series
//! themselves and map reported values back with [`inv_boxcox`].

use crate::error::{AnomalyError, Result};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Threshold below which λ is treated as exactly zero.
const LAMBDA_EPS: f64 = 1e-10;

/// Transformed series together with the λ that produced it.
#[derive(Debug, Clone)]
pub struct BoxCoxResult {
    /// Transformed data
    pub data: Vec<f64>,
    /// Lambda parameter used
    pub lambda: f64,
}

impl BoxCoxResult {
    /// Inverse transform to recover original scale.
    pub fn inverse(&self) -> Vec<f64> {
        inv_boxcox(&self.data, self.lambda)
    }
}

/// Apply the Box-Cox transformation with a given λ.
///
/// `y = (x^λ - 1) / λ`, or `y = ln(x)` for λ = 0.
///
/// # Errors
/// `Domain` if any value is not strictly positive.
pub fn boxcox(series: &[f64], lambda: f64) -> Result<Vec<f64>> {
    if let Some(bad) = series.iter().find(|&&x| !(x > 0.0)) {
        return Err(AnomalyError::Domain(format!(
            "Box-Cox requires strictly positive values, found {}",
            bad
        )));
    }
    Ok(series.iter().map(|&x| transform_one(x, lambda)).collect())
}

fn transform_one(x: f64, lambda: f64) -> f64 {
    if lambda.abs() < LAMBDA_EPS {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

/// Inverse Box-Cox transformation.
///
/// `x = (λy + 1)^(1/λ)`, or `x = exp(y)` for λ = 0. Values outside the
/// image of the forward transform map to NaN.
pub fn inv_boxcox(transformed: &[f64], lambda: f64) -> Vec<f64> {
    transformed
        .iter()
        .map(|&y| {
            if lambda.abs() < LAMBDA_EPS {
                y.exp()
            } else {
                let base = lambda * y + 1.0;
                if base <= 0.0 {
                    f64::NAN
                } else {
                    base.powf(1.0 / lambda)
                }
            }
        })
        .collect()
}

/// Profile log-likelihood of λ under a normal model of the transformed data.
///
/// `llf(λ) = -n/2 ln(σ²(λ)) + (λ - 1) Σ ln(x)`, constants dropped.
fn boxcox_llf(series: &[f64], log_sum: f64, lambda: f64) -> f64 {
    let n = series.len() as f64;
    let transformed: Vec<f64> = series.iter().map(|&x| transform_one(x, lambda)).collect();
    let mean = transformed.iter().sum::<f64>() / n;
    let variance = transformed.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / n;
    if !(variance > 0.0) || !variance.is_finite() {
        return f64::NEG_INFINITY;
    }
    -0.5 * n * variance.ln() + (lambda - 1.0) * log_sum
}

/// Maximum-likelihood λ on `[-2, 2]`.
///
/// # Errors
/// `Domain` for non-positive values, `InsufficientData` for fewer than two.
pub fn boxcox_lambda(series: &[f64]) -> Result<f64> {
    if series.len() < 2 {
        return Err(AnomalyError::InsufficientData {
            needed: 2,
            got: series.len(),
        });
    }
    boxcox(series, 1.0)?;
    let log_sum: f64 = series.iter().map(|x| x.ln()).sum();

    // Coarse grid for a start point, then a bounded simplex refinement
    let start = (-20..=20)
        .map(|i| i as f64 / 10.0)
        .max_by(|a, b| {
            boxcox_llf(series, log_sum, *a).total_cmp(&boxcox_llf(series, log_sum, *b))
        })
        .unwrap_or(1.0);

    let refined = nelder_mead(
        |p| -boxcox_llf(series, log_sum, p[0]),
        &[start],
        Some(&[(-2.0, 2.0)]),
        &NelderMeadConfig::default(),
    );
    Ok(refined.optimal_point.first().copied().unwrap_or(start))
}

/// Transform with the maximum-likelihood λ.
pub fn boxcox_auto(series: &[f64]) -> Result<BoxCoxResult> {
    let lambda = boxcox_lambda(series)?;
    let data = boxcox(series, lambda)?;
    Ok(BoxCoxResult { data, lambda })
}
