//! Normal-distribution ansatz.
//!
//! The series is treated as draws from `N(x0, sigma)`: its histogram is fit
//! with an unnormalized normal density by Poisson maximum likelihood. Only
//! eligible when the series passes the D'Agostino-Pearson normality test.

use crate::core::{Ansatz, Params};
use crate::error::{AnomalyError, Result};
use crate::models::functions::normal_density;
use crate::models::traits::{Candidate, ConvergenceFailure, FitOutcome, FitResult, FittedModel};
use crate::transform::boxcox;
use crate::utils::histogram::{histogram, Histogram};
use crate::utils::metrics::rss;
use crate::utils::optimization::{count_fit, parameter_errors};
use crate::utils::stats::{mean, std_dev};
use crate::validation::normality::{normal_test, NormalityResult};

/// Box bounds shared by all three density parameters.
const PARAM_BOUNDS: (f64, f64) = (0.0, 1e6);

/// Empty bins added past each end of the histogram reach this many sample
/// standard deviations, so the fit sees where the data is absent.
const TAIL_SIGMAS: f64 = 4.0;

const MAX_TAIL_BINS: usize = 50;

/// Histogram extended by empty bins on both sides at the mean bin spacing.
fn with_empty_tails(hist: &Histogram, sigma: f64) -> (Vec<f64>, Vec<f64>) {
    let n = hist.len();
    if n < 2 {
        return (hist.centers.clone(), hist.counts.clone());
    }
    let spacing = (hist.centers[n - 1] - hist.centers[0]) / (n - 1) as f64;
    if spacing.is_nan() || spacing <= 0.0 || !sigma.is_finite() {
        return (hist.centers.clone(), hist.counts.clone());
    }
    let pad = ((TAIL_SIGMAS * sigma / spacing).ceil() as usize).min(MAX_TAIL_BINS);

    let first = hist.centers[0];
    let last = hist.centers[n - 1];
    let mut centers: Vec<f64> = (1..=pad).rev().map(|k| first - spacing * k as f64).collect();
    centers.extend_from_slice(&hist.centers);
    centers.extend((1..=pad).map(|k| last + spacing * k as f64));

    let mut counts = vec![0.0; pad];
    counts.extend_from_slice(&hist.counts);
    counts.extend(std::iter::repeat(0.0).take(pad));
    (centers, counts)
}

/// Normal ansatz over the value distribution.
#[derive(Debug, Clone)]
pub struct Gaussian {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl Gaussian {
    /// Create an unfitted model.
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    /// Replace the values by their logarithm (Box-Cox with λ = 0).
    ///
    /// # Errors
    /// `Domain` if any value is not strictly positive.
    pub fn log_transformed(self) -> Result<Self> {
        let values = boxcox(&self.values, 0.0)?;
        Ok(Self {
            time: self.time,
            values,
        })
    }

    /// Normality test of the model's values.
    pub fn normality(&self) -> NormalityResult {
        normal_test(&self.values)
    }
}

impl Candidate for Gaussian {
    fn ansatz(&self) -> Ansatz {
        Ansatz::Gaussian
    }

    fn is_applicable(&self, params: &Params) -> bool {
        self.normality().is_normal(params.p_normality)
    }

    fn fit(self, params: &Params) -> FitResult {
        let hist = histogram(&self.values, params.binning);
        if hist.len() < Ansatz::Gaussian.n_params() {
            return Err(ConvergenceFailure::new(
                Ansatz::Gaussian,
                format!("histogram too flat to fit ({} bins)", hist.len()),
            ));
        }

        let sigma = std_dev(&self.values);
        let p0 = [0.9 * hist.max_count(), mean(&self.values), sigma];
        let fail = |e: AnomalyError| ConvergenceFailure::new(Ansatz::Gaussian, e.to_string());

        let (grid, grid_counts) = with_empty_tails(&hist, sigma);
        let fit = count_fit(
            normal_density,
            &grid,
            &grid_counts,
            &p0,
            Some(PARAM_BOUNDS),
            params.max_fev,
        )
        .map_err(fail)?;

        let predicted = normal_density(&hist.centers, &fit.popt).map_err(fail)?;
        let residual_ss = rss(&hist.counts, &predicted);
        let null_ss: f64 = hist.counts.iter().map(|c| c * c).sum();
        if residual_ss.is_nan() || residual_ss >= null_ss {
            return Err(ConvergenceFailure::new(
                Ansatz::Gaussian,
                "fitted density explains none of the histogram",
            ));
        }
        let perr = parameter_errors(&normal_density, &hist.centers, &hist.counts, &fit.popt);

        FittedModel::new(
            Ansatz::Gaussian,
            self.time,
            self.values,
            FitOutcome {
                popt: fit.popt,
                perr,
                observed: hist.counts,
                predicted,
            },
        )
    }
}
