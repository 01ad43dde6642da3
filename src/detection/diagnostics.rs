//! Cross-cutting diagnostics attached to every result.

use std::collections::BTreeMap;

use crate::core::{DiagnosticCode, ModelKind, Params};
use crate::detection::outlier::OutlierResult;
use crate::models::FittedModel;
use crate::utils::histogram::histogram;
use crate::utils::stats::{diff, mean, skewness, z_score};

/// Whether the series flips around its mean more often than `freq_threshold`.
///
/// Counts runs of consecutive points on the same side of the mean (points
/// exactly on the mean count as below) and compares `runs / len`.
pub fn is_oscillating(x: &[f64], freq_threshold: f64) -> bool {
    if x.is_empty() {
        return false;
    }
    let center = mean(x);
    let above: Vec<bool> = x.iter().map(|v| v - center > 0.0).collect();
    let runs = 1 + above.windows(2).filter(|w| w[0] != w[1]).count();
    runs as f64 / x.len() as f64 > freq_threshold
}

/// Indices `i` of the first difference `x[i+1] - x[i]` whose z-score
/// magnitude exceeds `std_width`.
pub fn discontinuous_idx(x: &[f64], std_width: f64) -> Vec<usize> {
    z_score(&diff(x))
        .iter()
        .enumerate()
        .filter(|(_, z)| z.abs() > std_width)
        .map(|(i, _)| i)
        .collect()
}

/// Builds the advisory message map of a result.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsCollector<'a> {
    params: &'a Params,
}

impl<'a> DiagnosticsCollector<'a> {
    /// Create a collector for one run.
    pub fn new(params: &'a Params) -> Self {
        Self { params }
    }

    /// Collect every diagnostic for a finished selection.
    ///
    /// `values` is the series in original units; `model` is the winner and
    /// `outliers` its extraction.
    pub fn collect(
        &self,
        values: &[f64],
        model: &FittedModel,
        outliers: &OutlierResult,
    ) -> BTreeMap<DiagnosticCode, String> {
        let params = self.params;
        let mut diagnostics = BTreeMap::new();
        let mut add = |code: DiagnosticCode| {
            diagnostics.insert(code, code.message().to_string());
        };

        for &code in &outliers.warnings {
            add(code);
        }
        if model.kind() == ModelKind::Gaussian && self.is_skewed(model) {
            add(DiagnosticCode::Skewed);
        }
        if is_oscillating(values, params.oscillation_freq) {
            add(DiagnosticCode::Oscillating);
        }
        if params.boxcox {
            add(DiagnosticCode::BoxCox);
        }
        if params.z_normalization {
            add(DiagnosticCode::ZNormalization);
        }
        if outliers.outlier_count() == 0 {
            add(DiagnosticCode::CheckPassed);
        }

        let discontinuities = discontinuous_idx(values, params.discontinuity_width).len();
        if discontinuities > 0 {
            diagnostics.insert(
                DiagnosticCode::Discontinuities,
                format!("Info: {} discontinuous points detected.", discontinuities),
            );
        }
        if discontinuities > params.max_discontinuities {
            diagnostics.insert(
                DiagnosticCode::TooManyDiscontinuities,
                format!(
                    "Warning: {} discontinuous points detected, more than the limit of {}.",
                    discontinuities, params.max_discontinuities
                ),
            );
        }
        diagnostics
    }

    /// Skewness of the histogram counts of the values the model was fit on.
    fn is_skewed(&self, model: &FittedModel) -> bool {
        let counts = histogram(model.values(), self.params.binning).counts;
        let skew = skewness(&counts);
        skew.is_finite() && skew.abs() > self.params.skewness
    }
}
