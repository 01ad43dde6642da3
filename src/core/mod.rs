//! Core data structures: input series, configuration and result record.

mod params;
mod result;
mod series;

pub use params::{InfoCriterion, ModelToggles, Params};
pub use result::{Ansatz, DiagnosticCode, FittingResult, ModelKind};
pub use series::Series;
