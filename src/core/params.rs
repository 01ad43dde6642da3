//! Detection configuration.
//!
//! All thresholds live in one immutable [`Params`] value that is passed into
//! each run. Field names follow the residual/tolerance pairing used per
//! ansatz: `*_res` is the outlier threshold on the (standardized) residual,
//! `*_err` the tolerance on parameter errors above which a convergence
//! warning is attached to the result.

use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};
use crate::utils::histogram::Binning;
pub use crate::utils::metrics::InfoCriterion;

/// Which ansatzes take part in a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelToggles {
    /// Normal distribution of the values.
    pub gaussian: bool,
    /// Straight line in time.
    pub linear_regression: bool,
    /// Single step between two levels.
    pub step_func: bool,
    /// Exponential decay in time.
    pub exp_decay: bool,
}

impl Default for ModelToggles {
    fn default() -> Self {
        Self {
            gaussian: true,
            linear_regression: true,
            step_func: true,
            exp_decay: true,
        }
    }
}

/// Configuration of a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Fit against `1..=N` instead of the caller's time stamps.
    pub scaleless_t: bool,
    /// Fit the normal ansatz on `ln(x)` when the normality gate passes.
    pub boxcox: bool,
    /// Standardize residuals before thresholding (non-Gaussian ansatzes).
    pub z_normalization: bool,
    /// Criterion used to rank the competing ansatzes.
    pub info_criterion: InfoCriterion,
    /// Minimum number of samples a series must have.
    pub min_sample_size: usize,
    /// Histogram binning used by the normal ansatz.
    pub binning: Binning,

    /// P-value at or above which the series counts as normal.
    pub p_normality: f64,
    /// Tolerance on `Σ perr²` of mean and standard deviation; above it the
    /// normal fit is discarded and the competing stage runs.
    #[serde(alias = "normal_err")]
    pub gaussian_energy_err: f64,
    /// Tolerance on the standard-deviation error of an accepted normal fit.
    #[serde(alias = "normal_std_err")]
    pub gaussian_err: f64,
    /// Outlier threshold in standard deviations for the normal ansatz.
    #[serde(alias = "normal_std_width")]
    pub std_width: f64,

    /// Tolerance on the slope standard error.
    #[serde(alias = "linregress_std_err")]
    pub linear_err: f64,
    /// Outlier threshold for the linear ansatz.
    #[serde(alias = "linregress_res")]
    pub linear_res: f64,

    /// Tolerance on `Σ perr²` of the step fit.
    #[serde(alias = "step_func_err")]
    pub sgn_err: f64,
    /// Outlier threshold for the step ansatz.
    #[serde(alias = "step_func_res")]
    pub sgn_res: f64,

    /// Tolerance on `Σ perr²` of the exponential fit.
    #[serde(alias = "mad_err")]
    pub exp_decay_err: f64,
    /// Outlier threshold for the exponential ansatz.
    #[serde(alias = "mad_res")]
    pub exp_decay_res: f64,

    /// Histogram skewness above which a warning is attached.
    pub skewness: f64,
    /// Residual magnitudes below this are zeroed before standardization.
    pub min_res: f64,
    /// Sign-run frequency above which the series counts as oscillating.
    pub oscillation_freq: f64,
    /// Z-score width of the first difference that marks a discontinuity.
    pub discontinuity_width: f64,
    /// Discontinuity count above which a separate diagnostic is attached.
    pub max_discontinuities: usize,

    /// Absolute tolerance of the linear tie-break.
    pub tie_break_atol: f64,
    /// Relative tolerance of the linear tie-break.
    pub tie_break_rtol: f64,
    /// Objective-evaluation budget of each nonlinear fit.
    pub max_fev: usize,
    /// Enabled ansatzes.
    pub models: ModelToggles,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            scaleless_t: true,
            boxcox: false,
            z_normalization: true,
            info_criterion: InfoCriterion::AIC,
            min_sample_size: 10,
            binning: Binning::Auto,
            p_normality: 5e-3,
            gaussian_energy_err: 75.0,
            gaussian_err: 10.0,
            std_width: 1.5,
            linear_err: 10.0,
            linear_res: 2.0,
            sgn_err: 10.0,
            sgn_res: 2.5,
            exp_decay_err: 10.0,
            exp_decay_res: 2.0,
            skewness: 20.0,
            min_res: 10.0,
            oscillation_freq: 0.3,
            discontinuity_width: 1.0,
            max_discontinuities: 10,
            tie_break_atol: 10.0,
            tie_break_rtol: 1e-2,
            max_fev: 2000,
            models: ModelToggles::default(),
        }
    }
}

/// Smallest `min_sample_size` the fitting kernels can work with.
const MIN_SUPPORTED_SAMPLES: usize = 3;

impl Params {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// Missing fields take their defaults. The information criterion is
    /// matched case-insensitively.
    ///
    /// # Errors
    /// `UnsupportedCriterion` for a criterion other than AIC/BIC,
    /// `InvalidParameter` for malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| AnomalyError::InvalidParameter(format!("malformed params: {}", e)))?;

        if let Some(raw) = value.get_mut("info_criterion") {
            if let Some(name) = raw.as_str() {
                let criterion: InfoCriterion = name.parse()?;
                *raw = serde_json::Value::String(criterion.to_string());
            }
        }

        let params: Params = serde_json::from_value(value)
            .map_err(|e| AnomalyError::InvalidParameter(format!("malformed params: {}", e)))?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AnomalyError::Computation(e.to_string()))
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.min_sample_size < MIN_SUPPORTED_SAMPLES {
            return Err(AnomalyError::InvalidParameter(format!(
                "min_sample_size must be at least {}, got {}",
                MIN_SUPPORTED_SAMPLES, self.min_sample_size
            )));
        }
        if !(0.0..=1.0).contains(&self.p_normality) {
            return Err(AnomalyError::InvalidParameter(format!(
                "p_normality must be in [0, 1], got {}",
                self.p_normality
            )));
        }
        if !(0.0..=1.0).contains(&self.oscillation_freq) {
            return Err(AnomalyError::InvalidParameter(format!(
                "oscillation_freq must be in [0, 1], got {}",
                self.oscillation_freq
            )));
        }
        if self.max_fev == 0 {
            return Err(AnomalyError::InvalidParameter(
                "max_fev must be positive".into(),
            ));
        }

        let thresholds = [
            ("gaussian_energy_err", self.gaussian_energy_err),
            ("gaussian_err", self.gaussian_err),
            ("std_width", self.std_width),
            ("linear_err", self.linear_err),
            ("linear_res", self.linear_res),
            ("sgn_err", self.sgn_err),
            ("sgn_res", self.sgn_res),
            ("exp_decay_err", self.exp_decay_err),
            ("exp_decay_res", self.exp_decay_res),
            ("skewness", self.skewness),
            ("min_res", self.min_res),
            ("discontinuity_width", self.discontinuity_width),
            ("tie_break_atol", self.tie_break_atol),
            ("tie_break_rtol", self.tie_break_rtol),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(AnomalyError::InvalidParameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Set the information criterion.
    pub fn with_info_criterion(mut self, criterion: InfoCriterion) -> Self {
        self.info_criterion = criterion;
        self
    }

    /// Set the minimum sample size.
    pub fn with_min_sample_size(mut self, n: usize) -> Self {
        self.min_sample_size = n;
        self
    }

    /// Enable or disable fitting against `1..=N`.
    pub fn with_scaleless_t(mut self, enabled: bool) -> Self {
        self.scaleless_t = enabled;
        self
    }

    /// Enable or disable the log transform of the normal stage.
    pub fn with_boxcox(mut self, enabled: bool) -> Self {
        self.boxcox = enabled;
        self
    }

    /// Enable or disable residual standardization.
    pub fn with_z_normalization(mut self, enabled: bool) -> Self {
        self.z_normalization = enabled;
        self
    }

    /// Set the residual floor.
    pub fn with_min_res(mut self, min_res: f64) -> Self {
        self.min_res = min_res;
        self
    }

    /// Set the normal-ansatz outlier width.
    pub fn with_std_width(mut self, width: f64) -> Self {
        self.std_width = width;
        self
    }

    /// Set the linear outlier threshold.
    pub fn with_linear_res(mut self, threshold: f64) -> Self {
        self.linear_res = threshold;
        self
    }

    /// Set the step outlier threshold.
    pub fn with_sgn_res(mut self, threshold: f64) -> Self {
        self.sgn_res = threshold;
        self
    }

    /// Set the exponential outlier threshold.
    pub fn with_exp_decay_res(mut self, threshold: f64) -> Self {
        self.exp_decay_res = threshold;
        self
    }

    /// Set the linear tie-break tolerances.
    pub fn with_tie_break(mut self, atol: f64, rtol: f64) -> Self {
        self.tie_break_atol = atol;
        self.tie_break_rtol = rtol;
        self
    }

    /// Select which ansatzes compete.
    pub fn with_models(mut self, models: ModelToggles) -> Self {
        self.models = models;
        self
    }
}
