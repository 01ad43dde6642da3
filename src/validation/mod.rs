//! Statistical hypothesis tests used to gate model selection.
//!
//! # Example
//!
//! ```
//! use anofox_anomaly::validation::normal_test;
//!
//! let series: Vec<f64> = (1..=100).map(|i| i as f64).collect();
//! let result = normal_test(&series);
//! // A uniform ramp has far too light tails to pass
//! assert!(!result.is_normal(5e-3));
//! ```

pub mod normality;

pub use normality::{kurtosis_test, normal_test, skew_test, NormalityResult};
