//! Exponential-decay ansatz `a * exp(-alpha * t)` on `t >= 0`.
//!
//! Strictly positive series are fit in closed form by regressing `ln(x)` on
//! `t`; anything else falls back to an unbounded least-squares search.

use crate::core::{Ansatz, Params};
use crate::error::AnomalyError;
use crate::models::functions::exp_decay;
use crate::models::traits::{Candidate, ConvergenceFailure, FitOutcome, FitResult, FittedModel};
use crate::utils::ols::linear_regression;
use crate::utils::optimization::curve_fit;

/// Exponential decay in time.
#[derive(Debug, Clone)]
pub struct ExponentialDecay {
    time: Vec<f64>,
    values: Vec<f64>,
}

fn fail(e: AnomalyError) -> ConvergenceFailure {
    ConvergenceFailure::new(Ansatz::ExpDecay, e.to_string())
}

impl ExponentialDecay {
    /// Create an unfitted model.
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    /// Log-linear regression: `ln x = ln a - alpha t`.
    ///
    /// Errors are propagated to first order: `σ_a = a σ_intercept`.
    fn fit_log_linear(&self) -> Result<(Vec<f64>, Vec<f64>), ConvergenceFailure> {
        let logs: Vec<f64> = self.values.iter().map(|x| x.ln()).collect();
        let reg = linear_regression(&self.time, &logs).map_err(fail)?;
        let a = reg.intercept.exp();
        Ok((
            vec![a, -reg.slope],
            vec![a * reg.intercept_stderr, reg.slope_stderr],
        ))
    }

    /// Least squares seeded with one decay over the observed time span.
    fn fit_least_squares(&self, max_fev: usize) -> Result<(Vec<f64>, Vec<f64>), ConvergenceFailure> {
        let t_min = self.time.iter().copied().fold(f64::INFINITY, f64::min);
        let t_max = self.time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let alpha0 = 1.0 / (t_max - t_min).max(1.0);
        let a0 = self.values[0] * (alpha0 * self.time[0]).exp();

        let fit = curve_fit(exp_decay, &self.time, &self.values, &[a0, alpha0], None, max_fev)
            .map_err(fail)?;
        Ok((fit.popt, fit.perr))
    }
}

impl Candidate for ExponentialDecay {
    fn ansatz(&self) -> Ansatz {
        Ansatz::ExpDecay
    }

    fn is_applicable(&self, _params: &Params) -> bool {
        self.time.iter().all(|&t| t >= 0.0)
    }

    fn fit(self, params: &Params) -> FitResult {
        // Surface the domain error before any fitting
        exp_decay(&self.time, &[1.0, 0.0]).map_err(fail)?;
        if self.values.is_empty() {
            return Err(ConvergenceFailure::new(Ansatz::ExpDecay, "empty series"));
        }

        let (popt, perr) = if self.values.iter().all(|&x| x > 0.0) {
            self.fit_log_linear()?
        } else {
            self.fit_least_squares(params.max_fev)?
        };
        let predicted = exp_decay(&self.time, &popt).map_err(fail)?;

        FittedModel::new(
            Ansatz::ExpDecay,
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
