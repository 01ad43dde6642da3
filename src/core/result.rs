//! Detection result record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AnomalyError, Result};
use crate::utils::metrics::InfoCriterion;

/// Functional family of a candidate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ansatz {
    /// Normal distribution of the values.
    Gaussian,
    /// `intercept + slope * t`.
    LinearRegression,
    /// Single step between two levels.
    StepFunc,
    /// `a * exp(-alpha * t)`.
    ExpDecay,
}

impl Ansatz {
    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ansatz::Gaussian => "gaussian",
            Ansatz::LinearRegression => "linear_regression",
            Ansatz::StepFunc => "step_func",
            Ansatz::ExpDecay => "exp_decay",
        }
    }

    /// Number of fitted parameters.
    pub fn n_params(&self) -> usize {
        match self {
            Ansatz::Gaussian | Ansatz::StepFunc => 3,
            Ansatz::LinearRegression | Ansatz::ExpDecay => 2,
        }
    }
}

impl fmt::Display for Ansatz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model reported for a finished run.
///
/// The step ansatz is reported under two identities depending on the
/// direction of the fitted jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Gaussian,
    LinearRegression,
    IncreaseStepFunc,
    DecreaseStepFunc,
    ExpDecay,
}

impl ModelKind {
    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Gaussian => "gaussian",
            ModelKind::LinearRegression => "linear_regression",
            ModelKind::IncreaseStepFunc => "increase_step_func",
            ModelKind::DecreaseStepFunc => "decrease_step_func",
            ModelKind::ExpDecay => "exp_decay",
        }
    }

    /// Family the reported model belongs to.
    pub fn ansatz(&self) -> Ansatz {
        match self {
            ModelKind::Gaussian => Ansatz::Gaussian,
            ModelKind::LinearRegression => Ansatz::LinearRegression,
            ModelKind::IncreaseStepFunc | ModelKind::DecreaseStepFunc => Ansatz::StepFunc,
            ModelKind::ExpDecay => Ansatz::ExpDecay,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory codes attached to a result.
///
/// Codes order by their numeric value descending (`0`, `-1`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    CheckPassed,
    GaussianConvergence,
    Skewed,
    StepConvergence,
    ExpDecayConvergence,
    LinearConvergence,
    Oscillating,
    BoxCox,
    ZNormalization,
    Discontinuities,
    TooManyDiscontinuities,
}

impl DiagnosticCode {
    /// Numeric code.
    pub fn code(&self) -> i32 {
        match self {
            DiagnosticCode::CheckPassed => 0,
            DiagnosticCode::GaussianConvergence => -1,
            DiagnosticCode::Skewed => -2,
            DiagnosticCode::StepConvergence => -3,
            DiagnosticCode::ExpDecayConvergence => -4,
            DiagnosticCode::LinearConvergence => -5,
            DiagnosticCode::Oscillating => -6,
            DiagnosticCode::BoxCox => -7,
            DiagnosticCode::ZNormalization => -8,
            DiagnosticCode::Discontinuities => -9,
            DiagnosticCode::TooManyDiscontinuities => -10,
        }
    }

    /// Whether the code reports a parameter-error tolerance violation.
    pub fn is_convergence_warning(&self) -> bool {
        matches!(
            self,
            DiagnosticCode::GaussianConvergence
                | DiagnosticCode::StepConvergence
                | DiagnosticCode::ExpDecayConvergence
                | DiagnosticCode::LinearConvergence
        )
    }

    /// Fixed message of the code.
    ///
    /// The discontinuity codes carry a count and are formatted by the
    /// collector; this is their count-free form.
    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticCode::CheckPassed => "Check passed: no anomalous points.",
            DiagnosticCode::GaussianConvergence => {
                "ConvergenceWarning: standard deviation error of the normal fit exceeds tolerance."
            }
            DiagnosticCode::Skewed => {
                "Warning: histogram skewness exceeds threshold, the distribution may be skewed."
            }
            DiagnosticCode::StepConvergence => {
                "ConvergenceWarning: step function parameter errors exceed tolerance."
            }
            DiagnosticCode::ExpDecayConvergence => {
                "ConvergenceWarning: exponential decay parameter errors exceed tolerance."
            }
            DiagnosticCode::LinearConvergence => {
                "ConvergenceWarning: slope standard error exceeds tolerance."
            }
            DiagnosticCode::Oscillating => {
                "Warning: series may be oscillating, it crosses its mean repeatedly."
            }
            DiagnosticCode::BoxCox => "Info: normal stage fit on log-transformed values.",
            DiagnosticCode::ZNormalization => "Info: residuals are z-normalized.",
            DiagnosticCode::Discontinuities => "Info: discontinuous points detected.",
            DiagnosticCode::TooManyDiscontinuities => {
                "Warning: discontinuity count exceeds limit."
            }
        }
    }
}

/// Outcome of a detection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittingResult {
    /// Selected model.
    pub model: ModelKind,
    /// Fitted parameters of the selected model.
    pub popt: Vec<f64>,
    /// Standard errors of `popt`.
    pub perr: Vec<f64>,
    /// Anomalous `(time, value)` pairs in original units, ascending in time.
    pub outliers: Vec<(f64, f64)>,
    /// Residual magnitude of each outlier, aligned with `outliers`.
    pub residual: Vec<f64>,
    /// Advisory messages keyed by code.
    pub diagnostics: BTreeMap<DiagnosticCode, String>,
    /// `false` when the series passed (no outliers).
    pub check_failed: bool,
    /// Criterion used for selection.
    pub criterion: InfoCriterion,
    /// Information-criterion score of every competing ansatz that ran.
    /// Empty when the normal ansatz was accepted without competition.
    pub scores: BTreeMap<Ansatz, f64>,
}

impl FittingResult {
    /// Number of anomalous points.
    pub fn outlier_count(&self) -> usize {
        self.outliers.len()
    }

    /// Whether a diagnostic code is attached.
    pub fn has_diagnostic(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.contains_key(&code)
    }

    /// Whether any convergence warning is attached.
    pub fn has_convergence_warning(&self) -> bool {
        self.diagnostics.keys().any(|c| c.is_convergence_warning())
    }

    /// Serialize to JSON.
    ///
    /// Outliers become `[time, value]` pairs; non-finite numbers become `null`.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AnomalyError::Computation(e.to_string()))
    }
}
