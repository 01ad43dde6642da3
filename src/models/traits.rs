//! Common interface of the candidate models.

use thiserror::Error;

use crate::core::{Ansatz, ModelKind, Params};
use crate::error::Result;
use crate::models::functions::{exp_decay, general_sgn, linear};
use crate::utils::metrics::{information_criterion, InfoCriterion};
use crate::utils::residual::fitting_residual;
use crate::utils::stats::mean;

/// A model that has not been fit yet.
///
/// Fitting consumes the model: a fitted model is a separate value that can
/// only be queried, so every instance is fit exactly once.
pub trait Candidate {
    /// Functional family of the model.
    fn ansatz(&self) -> Ansatz;

    /// Whether the model may be fit to its data at all.
    fn is_applicable(&self, params: &Params) -> bool {
        let _ = params;
        true
    }

    /// Fit the model.
    ///
    /// Failures never abort a run; they come back as a
    /// [`ConvergenceFailure`] whose score loses every comparison.
    fn fit(self, params: &Params) -> FitResult;
}

/// Outcome of a fit attempt.
pub type FitResult = std::result::Result<FittedModel, ConvergenceFailure>;

/// A fit attempt that did not produce usable parameters.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{ansatz} fit failed: {reason}")]
pub struct ConvergenceFailure {
    /// Family whose fit failed.
    pub ansatz: Ansatz,
    /// Human-readable cause.
    pub reason: String,
}

impl ConvergenceFailure {
    /// Create a failure record.
    pub fn new(ansatz: Ansatz, reason: impl Into<String>) -> Self {
        Self {
            ansatz,
            reason: reason.into(),
        }
    }

    /// Information-criterion score of a failed fit: always `+inf`.
    pub fn score(&self) -> f64 {
        f64::INFINITY
    }

    /// Parameters reported for a failed fit: all `+inf`.
    pub fn popt(&self) -> Vec<f64> {
        vec![f64::INFINITY; self.ansatz.n_params()]
    }
}

/// Fitted parameters together with the data they were scored against.
///
/// For the normal ansatz `observed` holds histogram counts; for the other
/// families it is the series itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    /// Fitted parameters.
    pub popt: Vec<f64>,
    /// Standard errors of `popt`.
    pub perr: Vec<f64>,
    /// Data the parameters were fit against.
    pub observed: Vec<f64>,
    /// Model prediction for `observed`.
    pub predicted: Vec<f64>,
}

/// A successfully fit model. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    ansatz: Ansatz,
    time: Vec<f64>,
    values: Vec<f64>,
    outcome: FitOutcome,
}

impl FittedModel {
    /// Wrap a fit outcome, rejecting non-finite parameters or predictions.
    pub(crate) fn new(
        ansatz: Ansatz,
        time: Vec<f64>,
        values: Vec<f64>,
        outcome: FitOutcome,
    ) -> FitResult {
        if outcome.popt.iter().any(|p| !p.is_finite()) {
            return Err(ConvergenceFailure::new(ansatz, "non-finite parameters"));
        }
        if outcome.predicted.iter().any(|p| !p.is_finite()) {
            return Err(ConvergenceFailure::new(ansatz, "non-finite prediction"));
        }
        Ok(Self {
            ansatz,
            time,
            values,
            outcome,
        })
    }

    /// Functional family.
    pub fn ansatz(&self) -> Ansatz {
        self.ansatz
    }

    /// Reported identity; the step family splits by jump direction.
    pub fn kind(&self) -> ModelKind {
        match self.ansatz {
            Ansatz::Gaussian => ModelKind::Gaussian,
            Ansatz::LinearRegression => ModelKind::LinearRegression,
            Ansatz::ExpDecay => ModelKind::ExpDecay,
            Ansatz::StepFunc => {
                if self.outcome.popt[1] - self.outcome.popt[0] > 0.0 {
                    ModelKind::IncreaseStepFunc
                } else {
                    ModelKind::DecreaseStepFunc
                }
            }
        }
    }

    /// Fitted parameters.
    pub fn popt(&self) -> &[f64] {
        &self.outcome.popt
    }

    /// Standard errors of the fitted parameters.
    pub fn perr(&self) -> &[f64] {
        &self.outcome.perr
    }

    /// Abscissa the model was fit on.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Values the model describes.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Fit data and prediction.
    pub fn outcome(&self) -> &FitOutcome {
        &self.outcome
    }

    /// Information-criterion score; lower is better.
    pub fn score(&self, criterion: InfoCriterion) -> f64 {
        information_criterion(
            criterion,
            &self.outcome.observed,
            &self.outcome.predicted,
            self.outcome.popt.len(),
        )
    }

    /// `Σ perr²` over the shape parameters (the normal amplitude excluded).
    pub fn shape_error_energy(&self) -> f64 {
        let skip = usize::from(self.ansatz == Ansatz::Gaussian);
        self.outcome.perr.iter().skip(skip).map(|e| e * e).sum()
    }

    /// Quantity compared against the family's convergence tolerance.
    pub fn convergence_error(&self) -> f64 {
        match self.ansatz {
            Ansatz::Gaussian => self.outcome.perr[2],
            Ansatz::LinearRegression => self.outcome.perr[1],
            Ansatz::StepFunc | Ansatz::ExpDecay => self.shape_error_energy(),
        }
    }

    /// Whether the convergence error is above tolerance (or undefined).
    pub fn exceeds_tolerance(&self, params: &Params) -> bool {
        let tolerance = match self.ansatz {
            Ansatz::Gaussian => params.gaussian_err,
            Ansatz::LinearRegression => params.linear_err,
            Ansatz::StepFunc => params.sgn_err,
            Ansatz::ExpDecay => params.exp_decay_err,
        };
        let error = self.convergence_error();
        error.is_nan() || error > tolerance
    }

    /// Signed per-point residual of the series against the model.
    ///
    /// The normal ansatz describes the value distribution, not the time
    /// course, so its residual is the mean-centered series.
    pub fn residual(&self, mask_min: Option<f64>, standardized: bool) -> Result<Vec<f64>> {
        let popt = &self.outcome.popt;
        match self.ansatz {
            Ansatz::Gaussian => {
                let center = mean(&self.values);
                fitting_residual(
                    &self.time,
                    &self.values,
                    |t: &[f64], _: &[f64]| Ok(vec![center; t.len()]),
                    popt,
                    mask_min,
                    standardized,
                )
            }
            Ansatz::LinearRegression => {
                fitting_residual(&self.time, &self.values, linear, popt, mask_min, standardized)
            }
            Ansatz::StepFunc => fitting_residual(
                &self.time,
                &self.values,
                general_sgn,
                popt,
                mask_min,
                standardized,
            ),
            Ansatz::ExpDecay => fitting_residual(
                &self.time,
                &self.values,
                exp_decay,
                popt,
                mask_min,
                standardized,
            ),
        }
    }
}
