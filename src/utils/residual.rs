//! Fitting residuals.

use crate::error::{AnomalyError, Result};
use crate::utils::stats::std_dev;

/// Compute the residual `y - f(x, popt)`.
///
/// # Arguments
/// * `x` - Abscissa the model is evaluated on
/// * `y` - Observed values
/// * `f` - Model function `(x, params) -> predictions`
/// * `popt` - Fitted parameters
/// * `mask_min` - If set, residuals with magnitude below it become exactly zero
/// * `standardized` - Divide by the standard deviation of the raw residual
///
/// Masking happens before standardization, and the scale is taken from the
/// unmasked residual, so masking small noise does not inflate the remaining
/// z-scores. A zero (or non-finite) scale skips standardization.
pub fn fitting_residual<F>(
    x: &[f64],
    y: &[f64],
    f: F,
    popt: &[f64],
    mask_min: Option<f64>,
    standardized: bool,
) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
{
    let predicted = f(x, popt)?;
    if predicted.len() != y.len() {
        return Err(AnomalyError::DimensionMismatch {
            expected: y.len(),
            got: predicted.len(),
        });
    }

    let mut res: Vec<f64> = y.iter().zip(predicted.iter()).map(|(a, p)| a - p).collect();
    let norm = std_dev(&res);

    if let Some(min) = mask_min {
        res.iter_mut()
            .filter(|r| r.abs() < min)
            .for_each(|r| *r = 0.0);
    }
    if standardized && norm.is_finite() && norm != 0.0 {
        res.iter_mut().for_each(|r| *r /= norm);
    }
    Ok(res)
}
