//! Detection engine: model selection, outlier extraction and diagnostics.

pub mod diagnostics;
pub mod engine;
pub mod outlier;

pub use diagnostics::{discontinuous_idx, is_oscillating, DiagnosticsCollector};
pub use engine::{AnomalyDetector, Selection};
pub use outlier::{extract_outliers, OutlierResult, OutlierRule};
