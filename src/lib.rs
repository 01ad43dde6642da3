//! # anofox-anomaly
//!
//! Anomaly detection for univariate time series by ansatz competition.
//!
//! A series is first tested for normality; a normal series is described by a
//! Gaussian fit to its histogram. Otherwise a linear trend, a single step and
//! an exponential decay compete on AIC/BIC, with ties resolved in favour of
//! the straight line. Points deviating from the winning model beyond a
//! per-model threshold are reported as anomalies together with advisory
//! diagnostics.
//!
//! ```
//! use anofox_anomaly::prelude::*;
//!
//! // 20 before t = 20, 60 after, 40 exactly at the jump
//! let values: Vec<f64> = (1..=100)
//!     .map(|t: i32| match t.cmp(&20) {
//!         std::cmp::Ordering::Less => 20.0,
//!         std::cmp::Ordering::Equal => 40.0,
//!         std::cmp::Ordering::Greater => 60.0,
//!     })
//!     .collect();
//! let detector = AnomalyDetector::from_arrays(None, values, Params::default()).unwrap();
//! let result = detector.check().unwrap();
//!
//! assert_eq!(result.model, ModelKind::IncreaseStepFunc);
//! assert_eq!(result.outliers, vec![(20.0, 40.0)]);
//! ```

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod detection;
pub mod error;
pub mod models;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{AnomalyError, Result};

pub mod prelude {
    pub use crate::core::{
        Ansatz, DiagnosticCode, FittingResult, InfoCriterion, ModelKind, ModelToggles, Params,
        Series,
    };
    pub use crate::detection::AnomalyDetector;
    pub use crate::error::{AnomalyError, Result};
    pub use crate::models::{Candidate, ConvergenceFailure, FittedModel, Model};
}
