//! Step ("sgn") ansatz: a single jump between two levels.
//!
//! The least-squares objective is piecewise constant in the jump location,
//! so the simplex search only brackets it. The fit is then polished: the
//! location is moved to the middle of a sample gap next to it and the two
//! levels are set to the segment means.
//!
//! The jump is never placed on a sample. A reading taken mid-transition then
//! keeps its full distance to both levels and is reported as an outlier.

use std::cmp::Ordering;

use crate::core::{Ansatz, Params};
use crate::models::functions::general_sgn;
use crate::models::traits::{Candidate, ConvergenceFailure, FitOutcome, FitResult, FittedModel};
use crate::utils::metrics::rss;
use crate::utils::optimization::{curve_fit, parameter_errors};
use crate::utils::stats::{argmax, diff, mean};

/// Box bounds shared by both levels and the jump location.
const PARAM_BOUNDS: (f64, f64) = (0.0, 1e6);

/// `a` before `t0`, `b` after, `(a + b) / 2` at `t0`.
#[derive(Debug, Clone)]
pub struct StepFunction {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl StepFunction {
    /// Create an unfitted model.
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    /// Seed `[x[0], x[-1], t at the steepest jump]`.
    ///
    /// Steepness is the magnitude of the first difference, so a drop seeds
    /// at the drop rather than at the largest rise. Both directions compete
    /// as one ansatz and the fitted levels decide which is reported.
    fn initial_guess(&self) -> Option<[f64; 3]> {
        let steepness: Vec<f64> = diff(&self.values).iter().map(|d| d.abs()).collect();
        let jump = argmax(&steepness)?;
        Some([
            *self.values.first()?,
            *self.values.last()?,
            self.time[jump],
        ])
    }

    /// Candidate jump locations around `t0`: the midpoint of the sample gap
    /// containing it, or both neighbouring midpoints when it sits on a sample.
    fn split_candidates(&self, t0: f64) -> Vec<f64> {
        let mut grid = self.time.clone();
        grid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        grid.dedup();

        let mut candidates = Vec::new();
        for w in grid.windows(2) {
            let (lo, hi) = (w[0], w[1]);
            if (lo < t0 && t0 < hi) || t0 == lo || t0 == hi {
                candidates.push((lo + hi) / 2.0);
            }
        }
        candidates
    }

    /// Best split next to the searched location, with segment-mean levels.
    ///
    /// Ties go to the earlier split. Falls back to `popt` when the location
    /// lies outside the sampled range.
    fn polish(&self, popt: &[f64]) -> Vec<f64> {
        let sse = |p: &[f64]| match general_sgn(&self.time, p) {
            Ok(pred) => rss(&self.values, &pred),
            Err(_) => f64::INFINITY,
        };

        let mut best: Option<(Vec<f64>, f64)> = None;
        for split in self.split_candidates(popt[2]) {
            let (mut before, mut after) = (Vec::new(), Vec::new());
            for (&t, &x) in self.time.iter().zip(self.values.iter()) {
                if t < split {
                    before.push(x);
                } else {
                    after.push(x);
                }
            }
            let a = if before.is_empty() { popt[0] } else { mean(&before) };
            let b = if after.is_empty() { popt[1] } else { mean(&after) };
            let candidate = vec![
                a.clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1),
                b.clamp(PARAM_BOUNDS.0, PARAM_BOUNDS.1),
                split,
            ];
            let candidate_sse = sse(&candidate);
            match &best {
                Some((_, best_sse)) if *best_sse <= candidate_sse => {}
                _ => best = Some((candidate, candidate_sse)),
            }
        }
        best.map(|(p, _)| p).unwrap_or_else(|| popt.to_vec())
    }
}

impl Candidate for StepFunction {
    fn ansatz(&self) -> Ansatz {
        Ansatz::StepFunc
    }

    fn fit(self, params: &Params) -> FitResult {
        let p0 = self.initial_guess().ok_or_else(|| {
            ConvergenceFailure::new(Ansatz::StepFunc, "series too short to locate a jump")
        })?;

        let fit = curve_fit(
            general_sgn,
            &self.time,
            &self.values,
            &p0,
            Some(PARAM_BOUNDS),
            params.max_fev,
        )
        .map_err(|e| ConvergenceFailure::new(Ansatz::StepFunc, e.to_string()))?;

        let popt = self.polish(&fit.popt);
        let perr = parameter_errors(&general_sgn, &self.time, &self.values, &popt);
        let predicted = general_sgn(&self.time, &popt)
            .map_err(|e| ConvergenceFailure::new(Ansatz::StepFunc, e.to_string()))?;

        FittedModel::new(
            Ansatz::StepFunc,
            self.time,
            self.values.clone(),
            FitOutcome {
                popt,
                perr,
                observed: self.values,
                predicted,
            },
        )
    }
}
