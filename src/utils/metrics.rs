//! Information criteria for model comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnomalyError;

/// Penalized-likelihood criterion used to rank competing ansatzes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InfoCriterion {
    /// Akaike information criterion.
    #[default]
    AIC,
    /// Bayesian information criterion.
    BIC,
}

impl fmt::Display for InfoCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoCriterion::AIC => write!(f, "AIC"),
            InfoCriterion::BIC => write!(f, "BIC"),
        }
    }
}

impl FromStr for InfoCriterion {
    type Err = AnomalyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AIC" => Ok(InfoCriterion::AIC),
            "BIC" => Ok(InfoCriterion::BIC),
            _ => Err(AnomalyError::UnsupportedCriterion(s.to_string())),
        }
    }
}

/// Residual sum of squares between observations and predictions.
pub fn rss(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum()
}

/// `n * ln(rss / n)`, the likelihood term shared by AIC and BIC.
///
/// A non-finite RSS (failed fit) yields `+inf`. An RSS that is zero, or
/// negative after rounding, is floored at the smallest positive normal
/// float so the logarithm stays finite.
fn log_likelihood_term(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len() as f64;
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::INFINITY;
    }
    let rss = rss(actual, predicted);
    if !rss.is_finite() {
        return f64::INFINITY;
    }
    let rss = rss.max(f64::MIN_POSITIVE);
    n * (rss / n).ln()
}

/// Akaike information criterion: `n ln(RSS/n) + 2p`.
///
/// # Arguments
/// * `actual` - Observed values
/// * `predicted` - Model predictions
/// * `p` - Number of fitted parameters
pub fn aic_score(actual: &[f64], predicted: &[f64], p: usize) -> f64 {
    log_likelihood_term(actual, predicted) + 2.0 * p as f64
}

/// Bayesian information criterion: `n ln(RSS/n) + p ln(n)`.
pub fn bic_score(actual: &[f64], predicted: &[f64], p: usize) -> f64 {
    let n = actual.len() as f64;
    log_likelihood_term(actual, predicted) + p as f64 * n.ln()
}

/// Score with the requested criterion.
pub fn information_criterion(
    criterion: InfoCriterion,
    actual: &[f64],
    predicted: &[f64],
    p: usize,
) -> f64 {
    match criterion {
        InfoCriterion::AIC => aic_score(actual, predicted, p),
        InfoCriterion::BIC => bic_score(actual, predicted, p),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn noisy_ramp() -> (Vec<f64>, Vec<f64>) {
        let y: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let offsets = [0.1, -0.2, 0.3, -0.4, 0.5];
        let pred = y.iter().zip(offsets.iter()).map(|(a, o)| a + o).collect();
        (y, pred)
    }

    #[test]
    fn aic_known_value() {
        let (y, pred) = noisy_ramp();
        assert_relative_eq!(aic_score(&y, &pred, 2), -7.03637456595, epsilon = 1e-9);
    }

    #[test]
    fn bic_known_value() {
        let (y, pred) = noisy_ramp();
        assert_relative_eq!(bic_score(&y, &pred, 2), -7.81749874108, epsilon = 1e-9);
    }

    #[test]
    fn criterion_dispatch() {
        let (y, pred) = noisy_ramp();
        assert_relative_eq!(
            information_criterion(InfoCriterion::BIC, &y, &pred, 2),
            bic_score(&y, &pred, 2)
        );
    }

    #[test]
    fn perfect_fit_stays_finite() {
        let y = vec![1.0, 2.0, 3.0];
        let score = aic_score(&y, &y, 2);
        assert!(score.is_finite());
        assert!(score < -1000.0);
    }

    #[test]
    fn failed_fit_scores_infinite() {
        let y = vec![1.0, 2.0, 3.0];
        let pred = vec![f64::INFINITY; 3];
        assert_eq!(aic_score(&y, &pred, 3), f64::INFINITY);
        assert_eq!(bic_score(&y, &[f64::NAN; 3], 3), f64::INFINITY);
    }

    #[test]
    fn criterion_parses_case_insensitively() {
        assert_eq!("aic".parse::<InfoCriterion>().unwrap(), InfoCriterion::AIC);
        assert_eq!(" BIC ".parse::<InfoCriterion>().unwrap(), InfoCriterion::BIC);
        assert_eq!(
            "HQIC".parse::<InfoCriterion>(),
            Err(AnomalyError::UnsupportedCriterion("HQIC".to_string()))
        );
    }
}
