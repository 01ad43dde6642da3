//! Candidate models.
//!
//! Each ansatz is its own type implementing [`Candidate`]; [`Model`] is the
//! closed set the detection engine works with.

mod exp_decay;
mod functions;
mod gaussian;
mod linear;
mod step;
mod traits;

pub use exp_decay::ExponentialDecay;
pub use functions::{exp_decay, general_sgn, linear, normal_density};
pub use gaussian::Gaussian;
pub use linear::LinearTrend;
pub use step::StepFunction;
pub use traits::{Candidate, ConvergenceFailure, FitOutcome, FitResult, FittedModel};

use crate::core::{Ansatz, Params};

/// Any of the four ansatzes, unfitted.
///
/// # Example
///
/// ```
/// use anofox_anomaly::core::{Ansatz, Params};
/// use anofox_anomaly::models::{Candidate, Model};
///
/// let time: Vec<f64> = (1..=20).map(f64::from).collect();
/// let values: Vec<f64> = time.iter().map(|t| 3.0 * t + 1.0).collect();
///
/// let fitted = Model::new(Ansatz::LinearRegression, time, values)
///     .fit(&Params::default())
///     .unwrap();
/// assert!((fitted.popt()[1] - 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub enum Model {
    Gaussian(Gaussian),
    LinearTrend(LinearTrend),
    StepFunction(StepFunction),
    ExponentialDecay(ExponentialDecay),
}

impl Model {
    /// Create an unfitted model of the given family.
    pub fn new(ansatz: Ansatz, time: Vec<f64>, values: Vec<f64>) -> Self {
        match ansatz {
            Ansatz::Gaussian => Model::Gaussian(Gaussian::new(time, values)),
            Ansatz::LinearRegression => Model::LinearTrend(LinearTrend::new(time, values)),
            Ansatz::StepFunc => Model::StepFunction(StepFunction::new(time, values)),
            Ansatz::ExpDecay => Model::ExponentialDecay(ExponentialDecay::new(time, values)),
        }
    }
}

impl Candidate for Model {
    fn ansatz(&self) -> Ansatz {
        match self {
            Model::Gaussian(m) => m.ansatz(),
            Model::LinearTrend(m) => m.ansatz(),
            Model::StepFunction(m) => m.ansatz(),
            Model::ExponentialDecay(m) => m.ansatz(),
        }
    }

    fn is_applicable(&self, params: &Params) -> bool {
        match self {
            Model::Gaussian(m) => m.is_applicable(params),
            Model::LinearTrend(m) => m.is_applicable(params),
            Model::StepFunction(m) => m.is_applicable(params),
            Model::ExponentialDecay(m) => m.is_applicable(params),
        }
    }

    fn fit(self, params: &Params) -> FitResult {
        match self {
            Model::Gaussian(m) => m.fit(params),
            Model::LinearTrend(m) => m.fit(params),
            Model::StepFunction(m) => m.fit(params),
            Model::ExponentialDecay(m) => m.fit(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_dispatches_by_ansatz() {
        for ansatz in [
            Ansatz::Gaussian,
            Ansatz::LinearRegression,
            Ansatz::StepFunc,
            Ansatz::ExpDecay,
        ] {
            let model = Model::new(ansatz, vec![1.0, 2.0], vec![1.0, 2.0]);
            assert_eq!(model.ansatz(), ansatz);
        }
    }

    #[test]
    fn smooth_competitors_fit_a_ramp() {
        let time: Vec<f64> = (1..=30).map(f64::from).collect();
        let values: Vec<f64> = time.iter().map(|t| 100.0 - 2.0 * t).collect();
        let params = Params::default();

        for ansatz in [Ansatz::LinearRegression, Ansatz::ExpDecay] {
            let result = Model::new(ansatz, time.clone(), values.clone()).fit(&params);
            let fitted = result.unwrap_or_else(|e| panic!("{} failed: {}", ansatz, e));
            assert_eq!(fitted.ansatz(), ansatz);
            assert!(fitted.score(params.info_criterion).is_finite());
        }
    }
}
