//! Model selection and the `check()` entry point.
//!
//! A run moves through a fixed sequence of stages:
//!
//! 1. Normality gate: if the series passes the D'Agostino-Pearson test the
//!    normal ansatz is fit to its histogram. A fit whose mean/std error
//!    energy stays within tolerance is accepted and ends the search.
//! 2. Competition: the linear, step and exponential ansatzes are fit
//!    independently (in parallel) and scored with AIC or BIC. The lowest
//!    score wins unless it is within tolerance of the linear score, in
//!    which case the straight line is preferred.
//! 3. Outlier extraction for the winner, then diagnostics.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::{Ansatz, FittingResult, Params, Series};
use crate::detection::diagnostics::DiagnosticsCollector;
use crate::detection::outlier::extract_outliers;
use crate::error::{AnomalyError, Result};
use crate::models::{Candidate, FitResult, FittedModel, Gaussian, Model};

/// Winner of the model search.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected fitted model.
    pub model: FittedModel,
    /// Score of every competitor that ran; empty on the normal short-circuit.
    pub scores: BTreeMap<Ansatz, f64>,
}

/// Anomaly detector over one series.
///
/// # Example
///
/// ```
/// use anofox_anomaly::prelude::*;
///
/// let values: Vec<f64> = (1..=100).map(|t| 6.0 * t as f64 + 10.0).collect();
/// let detector = AnomalyDetector::new(Series::from_values(values).unwrap(), Params::default()).unwrap();
///
/// let result = detector.check().unwrap();
/// assert_eq!(result.model, ModelKind::LinearRegression);
/// assert!(result.outliers.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    series: Series,
    params: Params,
}

impl AnomalyDetector {
    /// Validate the configuration and the series.
    ///
    /// # Errors
    /// `InvalidParameter` for an unusable configuration, `InsufficientData`
    /// when the series is shorter than `min_sample_size`.
    pub fn new(series: Series, params: Params) -> Result<Self> {
        params.validate()?;
        if series.len() < params.min_sample_size {
            return Err(AnomalyError::InsufficientData {
                needed: params.min_sample_size,
                got: series.len(),
            });
        }
        Ok(Self { series, params })
    }

    /// Build a detector from raw arrays; `time = None` uses `1..=N`.
    pub fn from_arrays(time: Option<Vec<f64>>, values: Vec<f64>, params: Params) -> Result<Self> {
        let series = match time {
            Some(time) => Series::new(time, values)?,
            None => Series::from_values(values)?,
        };
        Self::new(series, params)
    }

    /// Series under inspection.
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Configuration of the run.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Run the detection.
    ///
    /// # Errors
    /// `NoModelSelectable` when every enabled ansatz failed to fit.
    pub fn check(&self) -> Result<FittingResult> {
        let selection = self.select()?;
        let model = &selection.model;

        let outliers = extract_outliers(model, &self.params)?;
        for code in &outliers.warnings {
            warn!(model = %model.kind(), code = code.code(), "{}", code.message());
        }

        let diagnostics =
            DiagnosticsCollector::new(&self.params).collect(self.series.values(), model, &outliers);

        let time = self.series.time();
        let values = self.series.values();
        let mut flagged: Vec<(f64, f64, f64)> = outliers
            .outlier_indices
            .iter()
            .zip(outliers.residual.iter())
            .map(|(&i, &r)| (time[i], values[i], r))
            .collect();
        flagged.sort_by(|a, b| a.0.total_cmp(&b.0));

        info!(
            model = %model.kind(),
            outliers = flagged.len(),
            "anomaly check finished"
        );

        Ok(FittingResult {
            model: model.kind(),
            popt: model.popt().to_vec(),
            perr: model.perr().to_vec(),
            outliers: flagged.iter().map(|&(t, x, _)| (t, x)).collect(),
            residual: flagged.iter().map(|&(_, _, r)| r).collect(),
            check_failed: !flagged.is_empty(),
            diagnostics,
            criterion: self.params.info_criterion,
            scores: selection.scores,
        })
    }

    /// Run the model search without extracting outliers.
    pub fn select(&self) -> Result<Selection> {
        let time = self.series.fitting_time(self.params.scaleless_t);

        if self.params.models.gaussian {
            if let Some(model) = self.gaussian_stage(&time) {
                return Ok(Selection {
                    model,
                    scores: BTreeMap::new(),
                });
            }
        }
        self.compete(&time)
    }

    /// Normality gate and normal fit; `Some` only when the fit is accepted.
    fn gaussian_stage(&self, time: &[f64]) -> Option<FittedModel> {
        let params = &self.params;
        let candidate = Gaussian::new(time.to_vec(), self.series.values().to_vec());

        let normality = candidate.normality();
        debug!(p_value = normality.p_value, "normality gate");
        if !candidate.is_applicable(params) {
            return None;
        }

        let candidate = if params.boxcox {
            match candidate.log_transformed() {
                Ok(logged) => logged,
                Err(e) => {
                    debug!(error = %e, "log transform rejected, skipping normal stage");
                    return None;
                }
            }
        } else {
            candidate
        };

        match candidate.fit(params) {
            Ok(fitted) => {
                let energy = fitted.shape_error_energy();
                debug!(energy, tolerance = params.gaussian_energy_err, "normal fit");
                if energy <= params.gaussian_energy_err {
                    info!(popt = ?fitted.popt(), "normal ansatz accepted");
                    Some(fitted)
                } else {
                    debug!("normal fit discarded, error energy above tolerance");
                    None
                }
            }
            Err(failure) => {
                debug!(reason = %failure.reason, "normal fit failed");
                None
            }
        }
    }

    /// Fit the enabled competitors and pick the winner.
    fn compete(&self, time: &[f64]) -> Result<Selection> {
        let params = &self.params;
        let toggles = params.models;
        let enabled = [
            (Ansatz::LinearRegression, toggles.linear_regression),
            (Ansatz::StepFunc, toggles.step_func),
            (Ansatz::ExpDecay, toggles.exp_decay),
        ];
        let candidates: Vec<Model> = enabled
            .iter()
            .filter(|(_, on)| *on)
            .map(|&(ansatz, _)| Model::new(ansatz, time.to_vec(), self.series.values().to_vec()))
            .collect();

        let fits: Vec<FitResult> = candidates
            .into_par_iter()
            .map(|model| model.fit(params))
            .collect();

        let mut scored: Vec<(Ansatz, f64, FitResult)> = Vec::with_capacity(fits.len());
        for fit in fits {
            let (ansatz, score) = match &fit {
                Ok(model) => (model.ansatz(), model.score(params.info_criterion)),
                Err(failure) => {
                    debug!(ansatz = %failure.ansatz, reason = %failure.reason, "fit failed");
                    (failure.ansatz, failure.score())
                }
            };
            debug!(%ansatz, score, criterion = %params.info_criterion, "candidate scored");
            scored.push((ansatz, score, fit));
        }

        let scores: BTreeMap<Ansatz, f64> = scored.iter().map(|(a, s, _)| (*a, *s)).collect();
        let winner = pick_winner(&scored, params).ok_or_else(|| {
            warn!("no model could be selected, every candidate fit failed");
            AnomalyError::NoModelSelectable
        })?;

        match scored.swap_remove(winner).2 {
            Ok(model) => {
                info!(model = %model.kind(), score = ?scores.get(&model.ansatz()), "model selected");
                Ok(Selection { model, scores })
            }
            Err(_) => Err(AnomalyError::NoModelSelectable),
        }
    }
}

/// Index of the selected candidate.
///
/// Lowest finite score, first in order on ties, overridden by the linear
/// candidate when its score is close:
/// `|best - linear| <= atol + rtol * |linear|`.
fn pick_winner(scored: &[(Ansatz, f64, FitResult)], params: &Params) -> Option<usize> {
    let best = scored
        .iter()
        .enumerate()
        .filter(|(_, (_, score, fit))| score.is_finite() && fit.is_ok())
        .min_by(|(_, a), (_, b)| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)?;

    let best_score = scored[best].1;
    let linear = scored.iter().enumerate().find(|(_, (ansatz, score, fit))| {
        *ansatz == Ansatz::LinearRegression && score.is_finite() && fit.is_ok()
    });
    if let Some((idx, (_, linear_score, _))) = linear {
        let tolerance = params.tie_break_atol + params.tie_break_rtol * linear_score.abs();
        if (best_score - linear_score).abs() <= tolerance {
            return Some(idx);
        }
    }
    Some(best)
}
