//! Numeric kernels shared by the models and the detection engine.

pub mod histogram;
pub mod metrics;
pub mod ols;
pub mod optimization;
pub mod residual;
pub mod stats;

pub use histogram::{histogram, Binning, Histogram};
pub use metrics::{aic_score, bic_score, information_criterion, InfoCriterion};
pub use ols::{linear_regression, LinearRegression};
pub use optimization::{
    count_fit, curve_fit, nelder_mead, CurveFit, NelderMeadConfig, NelderMeadResult,
};
pub use residual::fitting_residual;
pub use stats::{
    diff, median_absolute_deviation, modified_z_score, skewness, std_dev, z_score,
};
