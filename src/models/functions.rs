//! The four model functions.
//!
//! All share the signature `(x, params) -> Result<Vec<f64>>` so they can be
//! handed to the generic fitting and residual kernels.

use crate::error::{AnomalyError, Result};

fn check_arity(params: &[f64], expected: usize, name: &str) -> Result<()> {
    if params.len() != expected {
        return Err(AnomalyError::InvalidParameter(format!(
            "{} takes {} parameters, got {}",
            name,
            expected,
            params.len()
        )));
    }
    Ok(())
}

/// Sign with `sign(0) = 0`.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Unnormalized normal density `a * exp(-(x - x0)² / (2σ²))`.
///
/// `params = [a, x0, sigma]`.
pub fn normal_density(x: &[f64], params: &[f64]) -> Result<Vec<f64>> {
    check_arity(params, 3, "normal_density")?;
    let (a, x0, sigma) = (params[0], params[1], params[2]);
    let two_var = 2.0 * sigma * sigma;
    Ok(x.iter()
        .map(|&v| a * (-(v - x0).powi(2) / two_var).exp())
        .collect())
}

/// Straight line `intercept + slope * x`.
///
/// `params = [intercept, slope]`.
pub fn linear(x: &[f64], params: &[f64]) -> Result<Vec<f64>> {
    check_arity(params, 2, "linear")?;
    let (intercept, slope) = (params[0], params[1]);
    Ok(x.iter().map(|&v| intercept + slope * v).collect())
}

/// Generalized sign function: `a` before `x0`, `b` after, `(a + b) / 2` at `x0`.
///
/// `params = [a, b, x0]`.
pub fn general_sgn(x: &[f64], params: &[f64]) -> Result<Vec<f64>> {
    check_arity(params, 3, "general_sgn")?;
    let (a, b, x0) = (params[0], params[1], params[2]);
    let half_height = (b - a) / 2.0;
    let middle = (a + b) / 2.0;
    Ok(x.iter()
        .map(|&v| half_height * sign(v - x0) + middle)
        .collect())
}

/// Exponential decay `a * exp(-alpha * x)`, defined for `x >= 0`.
///
/// `params = [a, alpha]`.
///
/// # Errors
/// `Domain` if any abscissa is negative.
pub fn exp_decay(x: &[f64], params: &[f64]) -> Result<Vec<f64>> {
    check_arity(params, 2, "exp_decay")?;
    if let Some(bad) = x.iter().find(|&&v| v < 0.0) {
        return Err(AnomalyError::Domain(format!(
            "exp_decay is defined for x >= 0, got {}",
            bad
        )));
    }
    let (a, alpha) = (params[0], params[1]);
    Ok(x.iter().map(|&v| a * (-alpha * v).exp()).collect())
}
