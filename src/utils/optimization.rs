//! Bounded derivative-free least squares.
//!
//! [`nelder_mead`] minimizes an arbitrary objective under a hard cap on
//! objective evaluations; [`curve_fit`] wraps it into a least-squares fitter
//! that also estimates parameter standard errors from the Jacobian at the
//! optimum. The model functions fitted here are not smooth in every
//! parameter (a step location has zero derivative almost everywhere), so the
//! search itself never needs gradients.

use crate::error::{AnomalyError, Result};
use crate::utils::ols::invert_symmetric;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the best point.
    pub optimal_value: f64,
    /// Number of simplex iterations performed.
    pub iterations: usize,
    /// Number of objective evaluations spent.
    pub evaluations: usize,
    /// Whether both the objective-spread and the simplex-size tolerances
    /// were met before the evaluation budget ran out.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of objective evaluations.
    pub max_evals: usize,
    /// Objective spread tolerance, relative to `max(1, |best|)`.
    pub ftol: f64,
    /// Simplex size tolerance, relative to `max(1, |centroid|∞)`.
    pub xtol: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step, relative to each coordinate (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_evals: 2000,
            ftol: 1e-10,
            xtol: 1e-10,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    /// Default configuration with the given evaluation budget.
    pub fn with_max_evals(max_evals: usize) -> Self {
        Self {
            max_evals,
            ..Default::default()
        }
    }
}

/// Objective wrapper that counts calls and maps NaN to `+inf`.
struct Counted<F> {
    objective: F,
    calls: usize,
}

impl<F: Fn(&[f64]) -> f64> Counted<F> {
    fn eval(&mut self, point: &[f64]) -> f64 {
        self.calls += 1;
        let v = (self.objective)(point);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    }
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// # Arguments
/// * `objective` - The objective function to minimize
/// * `initial` - Initial guess
/// * `bounds` - Optional `(min, max)` per dimension; points are clamped into the box
///
/// The search stops once the objective spread and the simplex size are both
/// within tolerance. A simplex whose values agree but which is still wide is
/// shrunk toward its best vertex.
/// * `config` - Configuration parameters
///
/// # Example
/// ```
/// use anofox_anomaly::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 1e-3);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            evaluations: 0,
            converged: false,
        };
    }

    let mut f = Counted {
        objective,
        calls: 0,
    };

    let start = apply_bounds(initial, bounds);
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(start.clone());
    for i in 0..n {
        let mut vertex = start.clone();
        let step = if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        // A vertex clamped back onto the start would collapse the simplex
        let mut vertex = apply_bounds(&vertex, bounds);
        if vertex == start {
            vertex[i] -= 2.0 * step;
            vertex = apply_bounds(&vertex, bounds);
        }
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| f.eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while f.calls < config.max_evals {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        let centroid = centroid_without(&simplex, worst);

        // Both tolerances must hold: a simplex straddling the minimum can
        // have zero spread while still being wide.
        let spread = values[worst] - values[best];
        let f_scale = values[best].abs().max(1.0);
        let flat = spread <= config.ftol * f_scale;
        let x_scale = centroid.iter().fold(1.0_f64, |m, c| m.max(c.abs()));
        let size = simplex
            .iter()
            .map(|v| chebyshev_distance(v, &simplex[best]))
            .fold(0.0, f64::max);
        if values[best].is_finite() && flat && size <= config.xtol * x_scale {
            converged = true;
            break;
        }
        if flat {
            shrink_toward(&mut simplex, &mut values, best, config.sigma, bounds, &mut f);
            continue;
        }

        let reflected = apply_bounds(&blend(&centroid, &simplex[worst], -config.alpha), bounds);
        let reflected_value = f.eval(&reflected);

        if reflected_value < values[best] {
            let expanded = apply_bounds(&blend(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = f.eval(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        // Outside contraction toward the reflected point, inside otherwise
        let (target, target_value) = if reflected_value < values[worst] {
            (reflected, reflected_value)
        } else {
            (simplex[worst].clone(), values[worst])
        };
        let contracted = apply_bounds(&blend(&centroid, &target, config.rho), bounds);
        let contracted_value = f.eval(&contracted);
        if contracted_value <= target_value {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        shrink_toward(&mut simplex, &mut values, best, config.sigma, bounds, &mut f);
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        evaluations: f.calls,
        converged,
    }
}

/// Pull every vertex toward `anchor` by `sigma`.
fn shrink_toward<F: Fn(&[f64]) -> f64>(
    simplex: &mut [Vec<f64>],
    values: &mut [f64],
    anchor: usize,
    sigma: f64,
    bounds: Option<&[(f64, f64)]>,
    f: &mut Counted<F>,
) {
    let origin = simplex[anchor].clone();
    for i in 0..simplex.len() {
        if i == anchor {
            continue;
        }
        let shrunk = blend(&origin, &simplex[i], sigma);
        simplex[i] = apply_bounds(&shrunk, bounds);
        values[i] = f.eval(&simplex[i]);
    }
}

/// Centroid of the simplex excluding one vertex.
fn centroid_without(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dim];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
            *c += v;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

/// `origin + coef * (point - origin)`.
///
/// Reflection, expansion, contraction and shrink are all this affine map.
fn blend(origin: &[f64], point: &[f64], coef: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point.iter())
        .map(|(o, p)| o + coef * (p - o))
        .collect()
}

fn apply_bounds(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn chebyshev_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Least-squares fit of a parametric model.
#[derive(Debug, Clone)]
pub struct CurveFit {
    /// Fitted parameters.
    pub popt: Vec<f64>,
    /// Standard errors of the fitted parameters.
    pub perr: Vec<f64>,
    /// Residual sum of squares at `popt`.
    pub rss: f64,
    /// Objective evaluations spent.
    pub evaluations: usize,
}

/// Sum of squared residuals, `+inf` if the model cannot be evaluated.
fn sse<F>(model: &F, x: &[f64], y: &[f64], params: &[f64]) -> f64
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
{
    match model(x, params) {
        Ok(pred) if pred.len() == y.len() => y
            .iter()
            .zip(pred.iter())
            .map(|(a, p)| (a - p).powi(2))
            .sum(),
        _ => f64::INFINITY,
    }
}

/// Poisson deviance `2 Σ [μ - c + c ln(c / μ)]` of counts `c` under the
/// model mean `μ`; `+inf` if a populated bin gets a non-positive mean.
fn poisson_deviance<F>(model: &F, x: &[f64], counts: &[f64], params: &[f64]) -> f64
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
{
    let pred = match model(x, params) {
        Ok(pred) if pred.len() == counts.len() => pred,
        _ => return f64::INFINITY,
    };
    let mut deviance = 0.0;
    for (&c, &mu) in counts.iter().zip(pred.iter()) {
        if mu.is_nan() || mu <= 0.0 {
            if c > 0.0 {
                return f64::INFINITY;
            }
            continue;
        }
        deviance += mu - c;
        if c > 0.0 {
            deviance += c * (c / mu).ln();
        }
    }
    2.0 * deviance
}

/// Reject a start point outside the box; the search never leaves it.
fn check_start(p0: &[f64], bounds: Option<(f64, f64)>) -> Result<()> {
    if let Some((lo, hi)) = bounds {
        if let Some(p) = p0.iter().find(|p| !(lo..=hi).contains(*p)) {
            return Err(AnomalyError::Computation(format!(
                "initial guess {} outside bounds [{}, {}]",
                p, lo, hi
            )));
        }
    }
    Ok(())
}

/// Minimize `objective` from `p0` and attach standard errors.
fn fit_with<F, O>(
    model: &F,
    objective: O,
    x: &[f64],
    y: &[f64],
    p0: &[f64],
    bounds: Option<(f64, f64)>,
    max_evals: usize,
) -> Result<CurveFit>
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
    O: Fn(&[f64]) -> f64,
{
    check_start(p0, bounds)?;
    let box_bounds: Option<Vec<(f64, f64)>> = bounds.map(|b| vec![b; p0.len()]);
    let config = NelderMeadConfig::with_max_evals(max_evals);

    let result = nelder_mead(objective, p0, box_bounds.as_deref(), &config);

    if !result.converged {
        return Err(AnomalyError::Computation(format!(
            "fit did not converge within {} evaluations",
            max_evals
        )));
    }
    if !result.optimal_value.is_finite() {
        return Err(AnomalyError::Computation(
            "fit ended on a non-finite objective".into(),
        ));
    }

    let perr = parameter_errors(model, x, y, &result.optimal_point);
    let rss = sse(model, x, y, &result.optimal_point);
    Ok(CurveFit {
        popt: result.optimal_point,
        perr,
        rss,
        evaluations: result.evaluations,
    })
}

/// Fit `model(x, params) ≈ y` in the least-squares sense.
///
/// `bounds` applies the same `(min, max)` box to every parameter. The search
/// is capped at `max_evals` objective evaluations; running out of budget is
/// reported as a convergence failure, never retried.
///
/// # Errors
/// `Computation` if `p0` lies outside `bounds`, if the search does not
/// converge, or if it ends on a non-finite residual sum of squares.
pub fn curve_fit<F>(
    model: F,
    x: &[f64],
    y: &[f64],
    p0: &[f64],
    bounds: Option<(f64, f64)>,
    max_evals: usize,
) -> Result<CurveFit>
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
{
    fit_with(&model, |p| sse(&model, x, y, p), x, y, p0, bounds, max_evals)
}

/// Fit `model(x, params)` to histogram counts by Poisson maximum likelihood.
///
/// Same contract as [`curve_fit`], but bins are weighted by their expected
/// count instead of equally, so sparse tail bins do not pull the shape.
/// `rss` and `perr` are still reported on the least-squares scale.
///
/// # Example
/// ```
/// use anofox_anomaly::models::normal_density;
/// use anofox_anomaly::utils::optimization::count_fit;
///
/// let x: Vec<f64> = (0..21).map(|i| i as f64).collect();
/// let counts = normal_density(&x, &[40.0, 10.0, 3.0]).unwrap();
///
/// let fit = count_fit(normal_density, &x, &counts, &[30.0, 9.0, 4.0], Some((0.0, 1e6)), 5000).unwrap();
/// assert!((fit.popt[2] - 3.0).abs() < 1e-3);
/// ```
///
/// # Errors
/// As [`curve_fit`].
pub fn count_fit<F>(
    model: F,
    x: &[f64],
    counts: &[f64],
    p0: &[f64],
    bounds: Option<(f64, f64)>,
    max_evals: usize,
) -> Result<CurveFit>
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
{
    fit_with(
        &model,
        |p| poisson_deviance(&model, x, counts, p),
        x,
        counts,
        p0,
        bounds,
        max_evals,
    )
}

/// Standard errors `sqrt(diag(s² (JᵀJ)⁻¹))` with `s² = RSS / (n - p)`.
///
/// The Jacobian is taken by central differences. Parameters the model does
/// not respond to at `popt` get a zero error; if the remaining normal matrix
/// is singular, or `n <= p`, every error is `+inf`.
pub fn parameter_errors<F>(model: &F, x: &[f64], y: &[f64], popt: &[f64]) -> Vec<f64>
where
    F: Fn(&[f64], &[f64]) -> Result<Vec<f64>>,
{
    let p = popt.len();
    let n = y.len();
    if n <= p {
        return vec![f64::INFINITY; p];
    }

    let mut jacobian: Vec<Vec<f64>> = Vec::with_capacity(p);
    for j in 0..p {
        let h = f64::EPSILON.sqrt() * popt[j].abs().max(1.0);
        let mut up = popt.to_vec();
        let mut down = popt.to_vec();
        up[j] += h;
        down[j] -= h;
        let column = match (model(x, &up), model(x, &down)) {
            (Ok(fu), Ok(fd)) => fu
                .iter()
                .zip(fd.iter())
                .map(|(a, b)| (a - b) / (2.0 * h))
                .collect(),
            _ => return vec![f64::INFINITY; p],
        };
        jacobian.push(column);
    }

    let active: Vec<usize> = (0..p)
        .filter(|&j| jacobian[j].iter().any(|v| *v != 0.0))
        .collect();

    let rss = sse(model, x, y, popt);
    let s2 = rss / (n - p) as f64;

    let normal: Vec<Vec<f64>> = active
        .iter()
        .map(|&a| {
            active
                .iter()
                .map(|&b| {
                    jacobian[a]
                        .iter()
                        .zip(jacobian[b].iter())
                        .map(|(u, v)| u * v)
                        .sum()
                })
                .collect()
        })
        .collect();

    let mut perr = vec![0.0; p];
    if active.is_empty() {
        return perr;
    }
    match invert_symmetric(&normal) {
        Some(inv) => {
            for (k, &j) in active.iter().enumerate() {
                perr[j] = (s2 * inv[k][k]).max(0.0).sqrt();
            }
            perr
        }
        None => vec![f64::INFINITY; p],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nelder_mead_quadratic_2d() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.optimal_point[1], 3.0, epsilon = 1e-4);
        assert_relative_eq!(result.optimal_value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn nelder_mead_respects_bounds() {
        // Unconstrained minimum at 5, box is [0, 3]
        let result = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            &NelderMeadConfig::default(),
        );

        assert_relative_eq!(result.optimal_point[0], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_stops_at_evaluation_budget() {
        let config = NelderMeadConfig::with_max_evals(20);
        let result = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[-1.2, 1.0],
            None,
            &config,
        );

        assert!(!result.converged);
        // One iteration may overrun by at most a shrink step
        assert!(result.evaluations <= 20 + 3);
    }

    #[test]
    fn nelder_mead_treats_nan_as_infinite() {
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 1.0).powi(2) },
            &[0.5],
            None,
            &NelderMeadConfig::default(),
        );
        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn nelder_mead_flat_objective_shrinks_before_stopping() {
        let config = NelderMeadConfig::default();
        let result = nelder_mead(|_| 0.0, &[1.0, 2.0], None, &config);

        assert!(result.converged);
        assert!(result.evaluations < config.max_evals);
    }

    #[test]
    fn nelder_mead_symmetric_simplex_keeps_searching() {
        // Start and first vertex straddle the minimum with equal values
        let start = 2.0 / 2.05;
        let result = nelder_mead(
            |x| ((x[0] - 1.0) * 1e3).round().powi(2),
            &[start],
            None,
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.optimal_point[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn nelder_mead_empty_initial() {
        let result = nelder_mead(|_| 0.0, &[], None, &NelderMeadConfig::default());
        assert!(!result.converged);
        assert!(result.optimal_value.is_nan());
    }

    fn line(x: &[f64], p: &[f64]) -> Result<Vec<f64>> {
        Ok(x.iter().map(|t| p[0] + p[1] * t).collect())
    }

    #[test]
    fn curve_fit_matches_closed_form_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, t)| 1.5 + 0.5 * t + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();

        let fit = curve_fit(line, &x, &y, &[1.0, 1.0], None, 5000).unwrap();
        let reference = crate::utils::ols::linear_regression(&x, &y).unwrap();

        assert_relative_eq!(fit.popt[0], reference.intercept, epsilon = 1e-3);
        assert_relative_eq!(fit.popt[1], reference.slope, epsilon = 1e-4);
        assert_relative_eq!(fit.perr[1], reference.slope_stderr, epsilon = 1e-4);
        assert_relative_eq!(fit.perr[0], reference.intercept_stderr, epsilon = 1e-3);
    }

    #[test]
    fn curve_fit_reports_budget_exhaustion() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|t| 3.0 * t).collect();
        let err = curve_fit(line, &x, &y, &[100.0, -50.0], None, 5).unwrap_err();
        assert!(matches!(err, AnomalyError::Computation(_)));
    }

    #[test]
    fn curve_fit_rejects_start_outside_bounds() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|t| 3.0 * t).collect();

        let err = curve_fit(line, &x, &y, &[2e6, 3.0], Some((0.0, 1e6)), 2000).unwrap_err();
        assert!(matches!(err, AnomalyError::Computation(_)));
        let err = count_fit(line, &x, &y, &[-1.0, 3.0], Some((0.0, 1e6)), 2000).unwrap_err();
        assert!(matches!(err, AnomalyError::Computation(_)));
    }

    fn bell(x: &[f64], p: &[f64]) -> Result<Vec<f64>> {
        Ok(x.iter()
            .map(|v| p[0] * (-(v - p[1]).powi(2) / (2.0 * p[2] * p[2])).exp())
            .collect())
    }

    #[test]
    fn count_fit_recovers_exact_counts() {
        let x: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let counts = bell(&x, &[30.0, 12.0, 4.0]).unwrap();

        let fit = count_fit(bell, &x, &counts, &[20.0, 10.0, 6.0], Some((0.0, 1e6)), 5000).unwrap();
        assert_relative_eq!(fit.popt[0], 30.0, epsilon = 1e-3);
        assert_relative_eq!(fit.popt[1], 12.0, epsilon = 1e-3);
        assert_relative_eq!(fit.popt[2], 4.0, epsilon = 1e-3);
        assert!(fit.rss < 1e-6);
    }

    #[test]
    fn count_fit_constant_mean_is_average_count() {
        let x = [0.0, 1.0, 2.0];
        let counts = [0.0, 5.0, 0.0];
        let constant = |x: &[f64], p: &[f64]| -> Result<Vec<f64>> { Ok(vec![p[0]; x.len()]) };

        // Poisson optimum of a constant mean is the average count
        let fit = count_fit(constant, &x, &counts, &[1.0], Some((0.0, 100.0)), 2000).unwrap();
        assert_relative_eq!(fit.popt[0], 5.0 / 3.0, epsilon = 1e-4);
    }

    #[test]
    fn insensitive_parameter_gets_zero_error() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|t| 2.0 + if *t as usize % 3 == 0 { 0.5 } else { 0.0 }).collect();
        // Second parameter is ignored by the model
        let constant = |x: &[f64], p: &[f64]| -> Result<Vec<f64>> { Ok(vec![p[0]; x.len()]) };

        let perr = parameter_errors(&constant, &x, &y, &[2.2, 7.0]);
        assert!(perr[0] > 0.0 && perr[0].is_finite());
        assert_eq!(perr[1], 0.0);
    }

    #[test]
    fn too_few_points_give_infinite_errors() {
        let perr = parameter_errors(&line, &[1.0, 2.0], &[1.0, 2.0], &[0.0, 1.0]);
        assert!(perr.iter().all(|e| e.is_infinite()));
    }
}
