//! Outlier extraction for the selected model.
//!
//! Each family thresholds its own residual. The decreasing step is the
//! exception: a sustained drop invalidates every reading after it, so all
//! points past the jump are flagged when the drop is large enough.

use crate::core::{Ansatz, DiagnosticCode, ModelKind, Params};
use crate::error::Result;
use crate::models::FittedModel;

/// How the outliers were selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierRule {
    /// Residual magnitude above the family's threshold.
    ResidualThreshold,
    /// Every point after a well-fit downward step.
    AfterStep,
}

/// Result of outlier extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierResult {
    /// Indices of the flagged points, ascending.
    pub outlier_indices: Vec<usize>,
    /// Residual magnitude of each flagged point.
    pub residual: Vec<f64>,
    /// Threshold the residual was compared against.
    pub threshold: f64,
    /// Rule that selected the points.
    pub rule: OutlierRule,
    /// Convergence warnings raised while extracting.
    pub warnings: Vec<DiagnosticCode>,
}

impl OutlierResult {
    /// Get the number of outliers detected.
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }

    /// Check if a specific index is an outlier.
    pub fn is_outlier(&self, index: usize) -> bool {
        self.outlier_indices.binary_search(&index).is_ok()
    }
}

/// Residual threshold of a reported model.
pub fn residual_threshold(kind: ModelKind, params: &Params) -> f64 {
    match kind {
        ModelKind::Gaussian => params.std_width,
        ModelKind::LinearRegression => params.linear_res,
        ModelKind::IncreaseStepFunc | ModelKind::DecreaseStepFunc => params.sgn_res,
        ModelKind::ExpDecay => params.exp_decay_res,
    }
}

/// Convergence warning code of a family.
pub fn convergence_code(ansatz: Ansatz) -> DiagnosticCode {
    match ansatz {
        Ansatz::Gaussian => DiagnosticCode::GaussianConvergence,
        Ansatz::LinearRegression => DiagnosticCode::LinearConvergence,
        Ansatz::StepFunc => DiagnosticCode::StepConvergence,
        Ansatz::ExpDecay => DiagnosticCode::ExpDecayConvergence,
    }
}

/// Flag the points of the series that deviate from the selected model.
///
/// Residuals below `min_res` are zeroed first. The normal ansatz always
/// works on z-scores; the others standardize only under `z_normalization`.
pub fn extract_outliers(model: &FittedModel, params: &Params) -> Result<OutlierResult> {
    let kind = model.kind();
    let threshold = residual_threshold(kind, params);
    let converged = !model.exceeds_tolerance(params);
    let warnings = if converged {
        Vec::new()
    } else {
        vec![convergence_code(model.ansatz())]
    };

    if kind == ModelKind::DecreaseStepFunc && converged {
        let (outlier_indices, residual) = after_step(model, params.min_res);
        return Ok(OutlierResult {
            outlier_indices,
            residual,
            threshold,
            rule: OutlierRule::AfterStep,
            warnings,
        });
    }

    let standardized = kind == ModelKind::Gaussian || params.z_normalization;
    let res = model.residual(Some(params.min_res), standardized)?;
    let (outlier_indices, residual) = above_threshold(&res, threshold);

    Ok(OutlierResult {
        outlier_indices,
        residual,
        threshold,
        rule: OutlierRule::ResidualThreshold,
        warnings,
    })
}

/// Indices and magnitudes of residuals strictly above `threshold`.
fn above_threshold(res: &[f64], threshold: f64) -> (Vec<usize>, Vec<f64>) {
    res.iter()
        .enumerate()
        .filter(|(_, r)| r.abs() > threshold)
        .map(|(i, r)| (i, r.abs()))
        .unzip()
}

/// Every point after the jump, each carrying the drop height.
///
/// Nothing is flagged unless the drop exceeds `min_res`.
fn after_step(model: &FittedModel, min_res: f64) -> (Vec<usize>, Vec<f64>) {
    let popt = model.popt();
    let (before, after, t0) = (popt[0], popt[1], popt[2]);
    let drop = before - after;
    if drop <= min_res {
        return (Vec::new(), Vec::new());
    }
    let indices: Vec<usize> = model
        .time()
        .iter()
        .enumerate()
        .filter(|(_, &t)| t > t0)
        .map(|(i, _)| i)
        .collect();
    let residual = vec![drop; indices.len()];
    (indices, residual)
}
