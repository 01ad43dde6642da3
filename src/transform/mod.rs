//! Input transformations.
//!
//! # Example
//!
//! ```
//! use anofox_anomaly::transform::{boxcox, inv_boxcox};
//!
//! let series = vec![1.0, 10.0, 100.0];
//! let logged = boxcox(&series, 0.0).unwrap();
//! let back = inv_boxcox(&logged, 0.0);
//! assert!((back[2] - 100.0).abs() < 1e-9);
//! ```

pub mod boxcox;

pub use boxcox::{boxcox, boxcox_auto, boxcox_lambda, inv_boxcox, BoxCoxResult};
