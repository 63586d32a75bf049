//! Weighted straight-line fit with uncertainties on both axes.
//!
//! Points are weighted by `1/dy²`. When x carries uncertainty too, it is
//! projected onto y with the current slope estimate,
//! `dy_eff = sqrt((g·dx)² + dy²)`, and the fit is repeated until the slope
//! settles.

use lm_core::{
    LmError, MIN_UNCERTAINTY, Measurement, Real, Uncertainty, ensure_min_len, ensure_same_len,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::dataset::Dataset2D;
use crate::error::{FitError, FitResult};

/// Fixed-point iteration configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Stop once the slope's relative change per iteration drops below this
    pub rel_tol: f64,
    /// Maximum iterations of the x-uncertainty correction
    pub max_iterations: usize,
    /// Replaces zero y-uncertainties in the weights
    pub min_uncertainty: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            rel_tol: 1e-5,
            max_iterations: 100,
            min_uncertainty: MIN_UNCERTAINTY,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> FitResult<()> {
        if !(self.rel_tol.is_finite() && self.rel_tol > 0.0) {
            return Err(LmError::InvalidArg {
                what: "rel_tol must be positive",
            }
            .into());
        }
        if self.max_iterations == 0 {
            return Err(LmError::InvalidArg {
                what: "max_iterations must be at least 1",
            }
            .into());
        }
        if !(self.min_uncertainty.is_finite() && self.min_uncertainty > 0.0) {
            return Err(LmError::InvalidArg {
                what: "min_uncertainty must be positive",
            }
            .into());
        }
        Ok(())
    }
}

/// Fitted line `y = slope·x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionResult {
    pub slope: Real,
    pub slope_err: Real,
    pub intercept: Real,
    pub intercept_err: Real,
    /// Correction passes for x-uncertainty; zero for a plain weighted fit.
    pub iterations: usize,
}

impl RegressionResult {
    pub fn slope(&self) -> Measurement {
        Measurement {
            value: self.slope,
            uncertainty: Uncertainty::Known(self.slope_err),
        }
    }

    pub fn intercept(&self) -> Measurement {
        Measurement {
            value: self.intercept,
            uncertainty: Uncertainty::Known(self.intercept_err),
        }
    }

    /// Value of the fitted line at `x`.
    pub fn eval(&self, x: Real) -> Real {
        self.slope * x + self.intercept
    }

    /// Line of uncertainty: steepest slope with the lowest intercept.
    pub fn eval_uncertainty_line(&self, x: Real) -> Real {
        (self.slope + self.slope_err) * x + (self.intercept - self.intercept_err)
    }
}

/// One weighted least-squares pass.
///
/// Zero entries of `dy` are replaced by `floor`, giving that point an
/// overwhelming weight. Weights are taken relative to the most precise
/// point and the sums are centred on the weighted means, so an exact point
/// away from the origin stays in range and equal x-values are detected
/// instead of cancelling to a tiny spread.
pub fn linreg_iter(x: &[Real], y: &[Real], dy: &[Real], floor: Real) -> FitResult<RegressionResult> {
    ensure_min_len(x, 2, "regression")?;
    ensure_same_len(x.len(), y.len(), "regression y")?;
    ensure_same_len(x.len(), dy.len(), "regression dy")?;

    let sigma: Vec<Real> = dy
        .iter()
        .map(|&d| if d == 0.0 { floor } else { d.abs() })
        .collect();
    let sigma_min = sigma.iter().copied().fold(Real::INFINITY, Real::min);
    if !(sigma_min.is_finite() && sigma_min > 0.0) {
        return Err(LmError::InvalidArg {
            what: "regression uncertainties must be positive after flooring",
        }
        .into());
    }
    // w = (sigma_min / sigma)², so the true weights are w / sigma_min².
    let w: Vec<Real> = sigma.iter().map(|s| (sigma_min / s).powi(2)).collect();

    let s0: Real = w.iter().sum();
    let x_mean = w.iter().zip(x).map(|(w, x)| w * x).sum::<Real>() / s0;
    let y_mean = w.iter().zip(y).map(|(w, y)| w * y).sum::<Real>() / s0;
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for i in 0..x.len() {
        let dx = x[i] - x_mean;
        sxx += w[i] * dx * dx;
        sxy += w[i] * dx * (y[i] - y_mean);
    }

    let (x_lo, x_hi) = x
        .iter()
        .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let spread = x_hi - x_lo;
    let distinct = spread > Real::EPSILON * x_lo.abs().max(x_hi.abs());
    if !(distinct && sxx.is_finite() && sxx > 0.0) {
        warn!(spread, sxx, points = x.len(), "degenerate weighted regression");
        return Err(FitError::Degenerate { spread });
    }

    let slope = sxy / sxx;
    Ok(RegressionResult {
        slope,
        slope_err: sigma_min / sxx.sqrt(),
        intercept: y_mean - slope * x_mean,
        intercept_err: sigma_min * (1.0 / s0 + x_mean * x_mean / sxx).sqrt(),
        iterations: 0,
    })
}

/// `sqrt((slope·dx)² + dy²)` per point.
pub fn effective_dy(slope: Real, dx: &[Real], dy: &[Real]) -> Vec<Real> {
    dx.iter()
        .zip(dy)
        .map(|(&dxi, &dyi)| (slope * dxi).hypot(dyi))
        .collect()
}

fn relative_change(old: Real, new: Real) -> Real {
    if new == 0.0 {
        if old == 0.0 { 0.0 } else { Real::INFINITY }
    } else {
        (1.0 - old / new).abs()
    }
}

/// Fit result together with the y-uncertainties of the final pass.
pub(crate) fn fit_with_dy(
    data: &Dataset2D,
    config: &FitConfig,
) -> FitResult<(RegressionResult, Vec<Real>)> {
    config.validate()?;
    let (x, y, dy) = (data.x(), data.y(), data.dy());
    let first = linreg_iter(x, y, dy, config.min_uncertainty)?;

    let Some(dx) = data.dx() else {
        return Ok((first, dy.to_vec()));
    };

    let mut slope = first.slope;
    let mut rel_change = Real::INFINITY;
    for iteration in 1..=config.max_iterations {
        let dy_eff = effective_dy(slope, dx, dy);
        let next = linreg_iter(x, y, &dy_eff, config.min_uncertainty)?;
        rel_change = relative_change(slope, next.slope);
        trace!(iteration, slope = next.slope, rel_change, "x-uncertainty correction");

        if rel_change < config.rel_tol {
            debug!(iterations = iteration, slope = next.slope, "regression converged");
            return Ok((
                RegressionResult {
                    iterations: iteration,
                    ..next
                },
                dy_eff,
            ));
        }
        slope = next.slope;
    }

    warn!(
        max_iterations = config.max_iterations,
        rel_change, "regression did not converge"
    );
    Err(FitError::NotConverged {
        iterations: config.max_iterations,
        rel_change,
    })
}

/// Fit `y = g·x + b` to the dataset.
///
/// Without x-uncertainties this is a single weighted pass. With them, the
/// x-uncertainty is folded into y with the current slope until the slope's
/// relative change falls below [`FitConfig::rel_tol`].
pub fn linreg(data: &Dataset2D, config: &FitConfig) -> FitResult<RegressionResult> {
    fit_with_dy(data, config).map(|(result, _)| result)
}

/// Per-point y-uncertainty with the x-uncertainty projected through the
/// fitted slope, for reuse in later computations.
pub fn lin_yerr(
    x: &[Real],
    dx: &[Real],
    y: &[Real],
    dy: &[Real],
    config: &FitConfig,
) -> FitResult<Vec<Real>> {
    let data = Dataset2D::new(x.to_vec(), y.to_vec(), dy.to_vec())?.with_dx(dx.to_vec())?;
    let fit = linreg(&data, config)?;
    Ok(effective_dy(fit.slope, dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(g: Real, b: Real, xs: &[Real]) -> Vec<Real> {
        xs.iter().map(|x| g * x + b).collect()
    }

    #[test]
    fn recovers_noiseless_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = line(2.0, 1.0, &x);
        let r = linreg_iter(&x, &y, &[1.0; 5], MIN_UNCERTAINTY).unwrap();
        assert!((r.slope - 2.0).abs() < 1e-12);
        assert!((r.intercept - 1.0).abs() < 1e-12);
        assert!(r.slope_err.is_finite() && r.slope_err > 0.0);
        assert!(r.intercept_err.is_finite() && r.intercept_err > 0.0);
        // x̄ = 3, Σw(x − x̄)² = 10
        assert!((r.slope_err - 0.1_f64.sqrt()).abs() < 1e-12);
        assert!((r.intercept_err - 1.1_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn equal_x_is_degenerate() {
        let r = linreg_iter(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], &[1.0; 3], MIN_UNCERTAINTY);
        assert!(matches!(r, Err(FitError::Degenerate { .. })));
    }

    #[test]
    fn repeated_inexact_x_is_degenerate() {
        for x in [vec![0.1; 3], vec![0.7; 2]] {
            let n = x.len();
            let y: Vec<Real> = (1..=n).map(|i| i as Real).collect();
            let r = linreg_iter(&x, &y, &vec![0.3; n], MIN_UNCERTAINTY);
            assert!(matches!(r, Err(FitError::Degenerate { spread }) if spread == 0.0));
        }
    }

    #[test]
    fn too_few_points_are_rejected() {
        let one = linreg_iter(&[0.1], &[1.0], &[0.3], MIN_UNCERTAINTY);
        assert!(matches!(
            one,
            Err(FitError::Input(LmError::TooFewPoints { required: 2, actual: 1, .. }))
        ));
        let none = linreg_iter(&[], &[], &[], MIN_UNCERTAINTY);
        assert!(matches!(
            none,
            Err(FitError::Input(LmError::TooFewPoints { actual: 0, .. }))
        ));
    }

    #[test]
    fn exact_point_off_origin_is_pinned() {
        let y = [3.0, 5.1, 6.9];
        let dy = [0.0, 0.1, 0.1];
        let r = linreg_iter(&[1.0, 2.0, 3.0], &y, &dy, MIN_UNCERTAINTY).unwrap();
        assert!((r.eval(1.0) - 3.0).abs() < 1e-9);
        assert!((r.slope - 1.98).abs() < 1e-9);
        // Only the two uncertain points constrain the slope: 1/sqrt(100 + 400).
        assert!((r.slope_err - 500f64.sqrt().recip()).abs() < 1e-9);

        let shifted = linreg_iter(&[0.0, 1.0, 2.0], &y, &dy, MIN_UNCERTAINTY).unwrap();
        assert!((shifted.slope - r.slope).abs() < 1e-9);
        assert!((shifted.intercept - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_floor_is_rejected() {
        let r = linreg_iter(&[1.0, 2.0], &[1.0, 2.0], &[0.0, 0.1], 0.0);
        assert!(matches!(r, Err(FitError::Input(LmError::InvalidArg { .. }))));
    }

    #[test]
    fn zero_dy_point_dominates() {
        // The exact point at x = 0 pins the intercept.
        let x = [0.0, 1.0, 2.0];
        let y = [5.0, 7.5, 8.5];
        let r = linreg_iter(&x, &y, &[0.0, 1.0, 1.0], MIN_UNCERTAINTY).unwrap();
        assert!((r.intercept - 5.0).abs() < 1e-9);
    }

    #[test]
    fn without_dx_is_single_pass() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![3.1, 4.9, 7.2, 8.8];
        let dy = vec![0.2, 0.2, 0.3, 0.2];
        let single = linreg_iter(&x, &y, &dy, MIN_UNCERTAINTY).unwrap();
        let data = Dataset2D::new(x, y, dy).unwrap();
        let full = linreg(&data, &FitConfig::default()).unwrap();
        assert_eq!(full, single);
        assert_eq!(full.iterations, 0);
    }

    #[test]
    fn dx_widens_uncertainty_and_converges() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.9, 5.2, 6.8, 9.1, 11.0];
        let dy = vec![0.1; 5];
        let plain = Dataset2D::new(x.clone(), y.clone(), dy.clone()).unwrap();
        let with_dx = plain.clone().with_dx(vec![0.2; 5]).unwrap();

        let config = FitConfig::default();
        let a = linreg(&plain, &config).unwrap();
        let b = linreg(&with_dx, &config).unwrap();
        assert!(b.iterations >= 1);
        assert!(b.slope_err > a.slope_err);
        assert!((a.slope - b.slope).abs() < 0.2);
    }

    #[test]
    fn exact_line_with_dx_converges_immediately() {
        let x = vec![1.0, 2.0, 3.0];
        let data = Dataset2D::new(x.clone(), line(-3.0, 2.0, &x), vec![0.5; 3])
            .unwrap()
            .with_dx(vec![0.1; 3])
            .unwrap();
        let r = linreg(&data, &FitConfig::default()).unwrap();
        assert_eq!(r.iterations, 1);
        assert!((r.slope + 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_slope_with_dx_converges() {
        let data = Dataset2D::new(vec![1.0, 2.0, 3.0], vec![4.0; 3], vec![0.1; 3])
            .unwrap()
            .with_dx(vec![0.3; 3])
            .unwrap();
        let r = linreg(&data, &FitConfig::default()).unwrap();
        assert_eq!(r.slope, 0.0);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let data = Dataset2D::new(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1.0, 3.5, 2.0, 6.0],
            vec![0.1, 1.0, 0.1, 1.0],
        )
        .unwrap()
        .with_dx(vec![1.0, 0.1, 1.0, 0.1])
        .unwrap();
        let config = FitConfig {
            rel_tol: 1e-300,
            max_iterations: 3,
            ..FitConfig::default()
        };
        assert!(matches!(
            linreg(&data, &config),
            Err(FitError::NotConverged { iterations: 3, .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let data = Dataset2D::new(vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, 1.0]).unwrap();
        let config = FitConfig {
            max_iterations: 0,
            ..FitConfig::default()
        };
        assert!(matches!(linreg(&data, &config), Err(FitError::Input(_))));
    }

    #[test]
    fn lin_yerr_projects_dx() {
        let x = [1.0, 2.0, 3.0];
        let y = line(2.0, 0.0, &x);
        let dy = lin_yerr(&x, &[0.3, 0.3, 0.3], &y, &[0.4, 0.4, 0.4], &FitConfig::default())
            .unwrap();
        for d in dy {
            assert!((d - 0.52_f64.sqrt()).abs() < 1e-9);
        }
    }

    #[test]
    fn result_helpers() {
        let r = RegressionResult {
            slope: 2.0,
            slope_err: 0.1,
            intercept: 1.0,
            intercept_err: 0.5,
            iterations: 0,
        };
        assert_eq!(r.eval(3.0), 7.0);
        assert!((r.eval_uncertainty_line(2.0) - 4.7).abs() < 1e-12);
        assert_eq!(r.slope().sigma(), 0.1);
    }
}
