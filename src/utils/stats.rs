//! Statistical utility functions.
//!
//! Moments here use the population (biased) normalization, so a series and
//! its standardized residual share one convention throughout the engine.

use std::cmp::Ordering;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the population variance of a slice (denominator `n`).
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Calculate the population standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in `[0, 100]`.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pos = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

/// Median absolute deviation: `median(|x - median(x)|)`.
pub fn median_absolute_deviation(values: &[f64]) -> f64 {
    let m = median(values);
    let deviations: Vec<f64> = values.iter().map(|x| (x - m).abs()).collect();
    median(&deviations)
}

/// Z-score normalization `(x - mean) / std`.
///
/// A zero-variance input maps to all zeros.
pub fn z_score(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let s = std_dev(values);
    if s.is_nan() || s <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|x| (x - m) / s).collect()
}

/// Modified z-score `0.6745 * (x - median) / MAD`.
///
/// 0.6745 is the 0.75 quantile of the standard normal, to which the MAD
/// of normal data converges. A zero MAD maps to all zeros.
pub fn modified_z_score(values: &[f64]) -> Vec<f64> {
    let med = median(values);
    let mad = median_absolute_deviation(values);
    if mad.is_nan() || mad <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|x| 0.6745 * (x - med) / mad).collect()
}

/// Central moment of the given order.
fn central_moment(values: &[f64], order: i32) -> f64 {
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(order)).sum::<f64>() / values.len() as f64
}

/// Sample skewness `m3 / m2^1.5` (biased estimator).
///
/// Returns NaN for fewer than three values or zero variance.
pub fn skewness(values: &[f64]) -> f64 {
    if values.len() < 3 {
        return f64::NAN;
    }
    let m2 = central_moment(values, 2);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    central_moment(values, 3) / m2.powf(1.5)
}

/// Pearson kurtosis `m4 / m2^2` (normal distribution = 3).
pub fn kurtosis(values: &[f64]) -> f64 {
    if values.len() < 4 {
        return f64::NAN;
    }
    let m2 = central_moment(values, 2);
    if m2 <= 0.0 {
        return f64::NAN;
    }
    central_moment(values, 4) / (m2 * m2)
}

/// First difference `x[i+1] - x[i]`.
pub fn diff(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Index of the first maximum, ignoring NaN.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
