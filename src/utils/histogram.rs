//! Histogram construction for distribution fitting.
//!
//! Bin edges are a pure function of the input, so two calls on the same data
//! always produce the same histogram and therefore the same fit seed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::stats::percentile;

/// Binning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    /// Equal-width bins; width is the smaller of the Sturges and
    /// Freedman-Diaconis estimates.
    #[default]
    Auto,
    /// One bin per distinct value (data treated as already discrete).
    Exact,
}

/// Binned distribution of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin centers (or distinct values for exact counting), ascending.
    pub centers: Vec<f64>,
    /// Number of samples per bin.
    pub counts: Vec<f64>,
}

impl Histogram {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Whether the histogram has no bins.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Largest bin count.
    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }
}

/// Bin a series into `(center, count)` pairs.
///
/// Non-finite values are ignored.
pub fn histogram(values: &[f64], binning: Binning) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Histogram {
            centers: Vec::new(),
            counts: Vec::new(),
        };
    }
    match binning {
        Binning::Auto => auto_histogram(&finite),
        Binning::Exact => exact_histogram(&finite),
    }
}

fn exact_histogram(values: &[f64]) -> Histogram {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut centers: Vec<f64> = Vec::new();
    let mut counts: Vec<f64> = Vec::new();
    for v in sorted {
        match centers.last() {
            Some(&last) if last == v => {
                if let Some(c) = counts.last_mut() {
                    *c += 1.0;
                }
            }
            _ => {
                centers.push(v);
                counts.push(1.0);
            }
        }
    }
    Histogram { centers, counts }
}

/// Number of equal-width bins for the `auto` rule, at most one per sample.
fn auto_bin_count(values: &[f64], ptp: f64) -> usize {
    let n = values.len() as f64;
    if ptp <= 0.0 {
        return 1;
    }
    let sturges = ptp / (n.log2() + 1.0);
    let iqr = percentile(values, 75.0) - percentile(values, 25.0);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let bins = (ptp / width).ceil();
    if bins.is_finite() {
        (bins as usize).clamp(1, values.len())
    } else {
        values.len()
    }
}

fn auto_histogram(values: &[f64]) -> Histogram {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ptp = max - min;
    let n_bins = auto_bin_count(values, ptp);

    let (first, last) = if ptp > 0.0 {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (last - first) / n_bins as f64;

    let mut counts = vec![0.0; n_bins];
    for &v in values {
        let idx = (((v - first) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1.0;
    }
    let centers = (0..n_bins)
        .map(|i| first + width * (i as f64 + 0.5))
        .collect();

    Histogram { centers, counts }
}
