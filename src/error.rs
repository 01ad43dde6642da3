//! Error types for the anofox-anomaly library.

use thiserror::Error;

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

/// Errors that can escape a detection run.
///
/// Only validation errors and [`AnomalyError::NoModelSelectable`] leave
/// `check()`; the remaining variants are raised by individual kernels and
/// absorbed by the model that called them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnomalyError {
    /// Insufficient data points for a detection run.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Time and value arrays differ in length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Invalid configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// NaN or infinite values in the input series.
    #[error("non-finite values detected in data")]
    NonFiniteValues,

    /// Information criterion other than AIC or BIC.
    #[error("unsupported information criterion '{0}', expected 'AIC' or 'BIC'")]
    UnsupportedCriterion(String),

    /// Function evaluated outside its domain.
    #[error("domain error: {0}")]
    Domain(String),

    /// Every candidate model failed to converge.
    #[error("no model could be selected: every candidate fit failed")]
    NoModelSelectable,

    /// Numerical failure (singular system, degenerate input).
    #[error("computation error: {0}")]
    Computation(String),
}

impl AnomalyError {
    /// Whether this error belongs to the input-validation class.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AnomalyError::InsufficientData { .. }
                | AnomalyError::DimensionMismatch { .. }
                | AnomalyError::InvalidParameter(_)
                | AnomalyError::NonFiniteValues
                | AnomalyError::UnsupportedCriterion(_)
        )
    }
}
