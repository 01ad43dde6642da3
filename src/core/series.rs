//! Validated input series.

use crate::error::{AnomalyError, Result};

/// An ordered sequence of `(time, value)` pairs.
///
/// The values are never modified after construction; detection runs derive
/// their own working copies and report outliers against these originals.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl Series {
    /// Create a series from explicit time stamps and values.
    ///
    /// # Errors
    /// * `DimensionMismatch` if the arrays differ in length
    /// * `NonFiniteValues` if any time or value is NaN or infinite
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if time.len() != values.len() {
            return Err(AnomalyError::DimensionMismatch {
                expected: values.len(),
                got: time.len(),
            });
        }
        if time.iter().chain(values.iter()).any(|v| !v.is_finite()) {
            return Err(AnomalyError::NonFiniteValues);
        }
        Ok(Self { time, values })
    }

    /// Create a series whose time axis is the dense index `1..=N`.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        Self::new(dense_index(values.len()), values)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Time stamps used when reporting outliers.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Abscissa the models are fit against.
    ///
    /// With `scaleless` the caller's time stamps are replaced by `1..=N`,
    /// which keeps thresholds independent of the time unit. Reported
    /// outliers always carry the caller's time stamps.
    pub fn fitting_time(&self, scaleless: bool) -> Vec<f64> {
        if scaleless {
            dense_index(self.len())
        } else {
            self.time.clone()
        }
    }
}

fn dense_index(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}
