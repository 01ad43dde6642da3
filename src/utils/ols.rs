//! Ordinary least squares for a single regressor.
//!
//! Also hosts the small dense Cholesky routines used to turn a normal
//! matrix `JᵀJ` into a parameter covariance.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{AnomalyError, Result};

/// Simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    /// Slope of the regression line.
    pub slope: f64,
    /// Intercept of the regression line.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Two-sided p-value of the null hypothesis `slope == 0` (Wald test, t distribution).
    pub p_value: f64,
    /// Standard error of the slope.
    pub slope_stderr: f64,
    /// Standard error of the intercept.
    pub intercept_stderr: f64,
}

impl LinearRegression {
    /// Predicted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = intercept + slope * x` by least squares.
///
/// # Errors
/// * `DimensionMismatch` if `x` and `y` differ in length
/// * `InsufficientData` for fewer than three points
/// * `Computation` when every `x` is identical
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearRegression> {
    if x.len() != y.len() {
        return Err(AnomalyError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    let n = x.len();
    if n < 3 {
        return Err(AnomalyError::InsufficientData { needed: 3, got: n });
    }
    let nf = n as f64;

    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }
    ss_xx /= nf;
    ss_yy /= nf;
    ss_xy /= nf;

    if ss_xx == 0.0 {
        return Err(AnomalyError::Computation(
            "cannot regress on identical x values".into(),
        ));
    }

    let r = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ss_xy / ss_xx;
    let intercept = y_mean - slope * x_mean;

    let df = nf - 2.0;
    // Keeps the t statistic finite for a perfect correlation
    const TINY: f64 = 1e-20;
    let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
    let p_value = StudentsT::new(0.0, 1.0, df)
        .map(|dist| 2.0 * dist.sf(t.abs()))
        .unwrap_or(f64::NAN);

    let slope_stderr = ((1.0 - r * r) * ss_yy / ss_xx / df).max(0.0).sqrt();
    let intercept_stderr = slope_stderr * (ss_xx + x_mean * x_mean).sqrt();

    Ok(LinearRegression {
        slope,
        intercept,
        r_squared: r * r,
        p_value,
        slope_stderr,
        intercept_stderr,
    })
}

/// Cholesky factor `L` of a symmetric positive definite matrix (`A = L Lᵀ`).
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Some(l)
}

/// Solve `L Lᵀ x = b` given the Cholesky factor.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    x
}

/// Invert a symmetric positive definite matrix.
///
/// Returns `None` if the matrix is empty, not square, or not positive definite.
pub fn invert_symmetric(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    if n == 0 || a.iter().any(|row| row.len() != n) {
        return None;
    }
    let l = cholesky(a)?;

    let mut inv = vec![vec![0.0; n]; n];
    for col in 0..n {
        let mut e = vec![0.0; n];
        e[col] = 1.0;
        let x = cholesky_solve(&l, &e);
        for row in 0..n {
            inv[row][col] = x[row];
        }
    }
    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn regression_recovers_exact_line() {
        // y = 2 + 3*x
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![5.0, 8.0, 11.0, 14.0, 17.0];

        let fit = linear_regression(&x, &y).unwrap();

        assert_relative_eq!(fit.intercept, 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.slope, 3.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.slope_stderr, 0.0, epsilon = 1e-6);
        assert!(fit.p_value < 1e-6);
        assert_relative_eq!(fit.predict(10.0), 32.0, epsilon = 1e-9);
    }

    #[test]
    fn regression_standard_errors_match_reference() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 5.0, 4.0, 5.0];

        let fit = linear_regression(&x, &y).unwrap();

        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 0.6, epsilon = 1e-10);
        // s = sqrt(2.4 / 3), Sxx = 10
        assert_relative_eq!(fit.slope_stderr, (0.8_f64 / 10.0).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(
            fit.intercept_stderr,
            (0.8_f64 * (1.0 / 5.0 + 9.0 / 10.0)).sqrt(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn flat_response_has_zero_slope() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![7.0; 4];
        let fit = linear_regression(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.0);
        assert_relative_eq!(fit.intercept, 7.0);
        assert_relative_eq!(fit.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn identical_x_is_rejected() {
        let err = linear_regression(&[2.0; 4], &[1.0, 2.0, 3.0, 4.0]).unwrap_err();
        assert!(matches!(err, AnomalyError::Computation(_)));
    }

    #[test]
    fn regression_validates_input() {
        assert_eq!(
            linear_regression(&[1.0, 2.0], &[1.0]).unwrap_err(),
            AnomalyError::DimensionMismatch { expected: 2, got: 1 }
        );
        assert_eq!(
            linear_regression(&[1.0, 2.0], &[1.0, 2.0]).unwrap_err(),
            AnomalyError::InsufficientData { needed: 3, got: 2 }
        );
    }

    #[test]
    fn inverse_of_spd_matrix() {
        let a = vec![vec![4.0, 2.0], vec![2.0, 3.0]];
        let inv = invert_symmetric(&a).unwrap();
        // det = 8
        assert_relative_eq!(inv[0][0], 3.0 / 8.0, epsilon = 1e-12);
        assert_relative_eq!(inv[0][1], -2.0 / 8.0, epsilon = 1e-12);
        assert_relative_eq!(inv[1][1], 4.0 / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_rejects_singular_matrix() {
        let a = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        assert!(invert_symmetric(&a).is_none());
        assert!(invert_symmetric(&[]).is_none());
    }
}
