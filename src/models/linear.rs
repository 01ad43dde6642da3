//! Linear-trend ansatz, fit in closed form by ordinary least squares.

use crate::core::{Ansatz, Params};
use crate::models::functions::linear;
use crate::models::traits::{Candidate, ConvergenceFailure, FitOutcome, FitResult, FittedModel};
use crate::utils::ols::linear_regression;

/// `value = intercept + slope * t`.
#[derive(Debug, Clone)]
pub struct LinearTrend {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl LinearTrend {
    /// Create an unfitted model.
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self { time, values }
    }
}

impl Candidate for LinearTrend {
    fn ansatz(&self) -> Ansatz {
        Ansatz::LinearRegression
    }

    fn fit(self, _params: &Params) -> FitResult {
        let fail = |e: crate::error::AnomalyError| {
            ConvergenceFailure::new(Ansatz::LinearRegression, e.to_string())
        };
        let reg = linear_regression(&self.time, &self.values).map_err(fail)?;

        let popt = vec![reg.intercept, reg.slope];
        let predicted = linear(&self.time, &popt).map_err(fail)?;

        FittedModel::new(
            Ansatz::LinearRegression,
            self.time,
            self.values.clone(),
            FitOutcome {
                popt,
                perr: vec![reg.intercept_stderr, reg.slope_stderr],
                observed: self.values,
                predicted,
            },
        )
    }
}
