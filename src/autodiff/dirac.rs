//! # Dirac
//!
//! $$
//! \frac{d}{dx}\,\mathbf 1_{x\ge 0}=\delta(x)\approx
//! \frac{\mathbf 1_{|x|\le w/2}}{w}
//! $$
//!
//! The derivative of the indicator primitive is zero almost everywhere and
//! infinite at the discontinuity, so a pathwise Monte Carlo estimator built
//! from it is degenerate. The backward sweep substitutes a smoothed weight
//! for it instead. Two strategies are provided:
//!
//! - **Direct**: count the paths of the trigger X falling into a rectangular
//!   window around zero and divide by the window width. The resulting scalar
//!   density estimate weights the upstream adjoint uniformly.
//! - **Regression on distribution**: sweep a family of one-sided windows on
//!   both sides of zero, turn each into an empirical density sample, fit a
//!   polynomial through the samples and evaluate it at each path's own
//!   realization of X. The weight adapts to where in the distribution each
//!   path sits, which lowers the variance of the final estimate.
//!
//! A width of 0 reproduces the true (degenerate) derivative; an infinite
//! width short-circuits to a flat weight without evaluating any window.

use tracing::debug;

use crate::error::Result;
use crate::error::SensitivityError;
use crate::random_variable::RandomVariable;
use crate::stats::fit_polynomial;
use crate::stats::polynomial_value;

/// Number of one-sided window samples per side of zero in the density sweep.
const DENSITY_SAMPLES_PER_SIDE: i32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiracDeltaMethod {
  #[default]
  Direct,
  RegressionOnDistribution,
}

/// Validated smoothing parameters, fixed per tape at construction time.
#[derive(Clone, Debug)]
pub struct DiracDeltaConfig {
  width_per_std_dev: f64,
  method: DiracDeltaMethod,
  density_regression_width_per_std_dev: f64,
  density_regression_powers: Vec<i32>,
}

impl Default for DiracDeltaConfig {
  fn default() -> Self {
    Self {
      width_per_std_dev: 0.05,
      method: DiracDeltaMethod::Direct,
      density_regression_width_per_std_dev: 0.5,
      density_regression_powers: vec![0, 1],
    }
  }
}

impl DiracDeltaConfig {
  pub fn new(
    width_per_std_dev: f64,
    method: DiracDeltaMethod,
    density_regression_width_per_std_dev: f64,
    density_regression_powers: Vec<i32>,
  ) -> Result<Self> {
    if width_per_std_dev.is_nan() || width_per_std_dev < 0.0 {
      return Err(SensitivityError::InvalidConfiguration(format!(
        "smoothing width must be non-negative, got {width_per_std_dev}"
      )));
    }
    if !density_regression_width_per_std_dev.is_finite()
      || density_regression_width_per_std_dev <= 0.0
    {
      return Err(SensitivityError::InvalidConfiguration(format!(
        "density regression width must be positive and finite, got {density_regression_width_per_std_dev}"
      )));
    }
    if density_regression_powers.is_empty() {
      return Err(SensitivityError::InvalidConfiguration(
        "density regression requires at least one basis power".to_string(),
      ));
    }
    Ok(Self {
      width_per_std_dev,
      method,
      density_regression_width_per_std_dev,
      density_regression_powers,
    })
  }

  /// Direct localization with the default density-regression settings.
  pub fn direct(width_per_std_dev: f64) -> Result<Self> {
    Self::new(width_per_std_dev, DiracDeltaMethod::Direct, 0.5, vec![0, 1])
  }

  /// Density-regression smoothing with a linear density basis.
  pub fn regression_on_distribution(
    width_per_std_dev: f64,
    density_regression_width_per_std_dev: f64,
  ) -> Result<Self> {
    Self::new(
      width_per_std_dev,
      DiracDeltaMethod::RegressionOnDistribution,
      density_regression_width_per_std_dev,
      vec![0, 1],
    )
  }

  pub fn width_per_std_dev(&self) -> f64 {
    self.width_per_std_dev
  }

  pub fn method(&self) -> DiracDeltaMethod {
    self.method
  }

  pub fn density_regression_width_per_std_dev(&self) -> f64 {
    self.density_regression_width_per_std_dev
  }

  pub fn density_regression_powers(&self) -> &[i32] {
    &self.density_regression_powers
  }
}

/// Indicator of the rectangular window `[-width/2, width/2)` around zero,
/// used to restrict estimates to a neighborhood of the discontinuity.
pub fn localizer(x: &RandomVariable, width: f64) -> Result<RandomVariable> {
  let one = RandomVariable::scalar(1.0);
  let zero = RandomVariable::scalar(0.0);
  let lower = x.shift(width / 2.0).choose(&one, &zero)?;
  let upper = x.shift(-width / 2.0).choose(&zero, &one)?;
  lower.mult(&upper)
}

/// Coefficients of a polynomial density fit around zero.
///
/// One-sided windows `[-s, 0)` and `[0, s)` are swept over
/// `s in (0, sigma * sweep_width / 2]` on both sides; each window yields the
/// empirical density `P(X in window) / |s|`. The exactly-zero window size is
/// skipped. A least-squares polynomial with the given powers is fitted
/// through the `(signed size, density)` samples.
pub fn density_regression(
  x: &RandomVariable,
  sweep_width_per_std_dev: f64,
  powers: &[i32],
) -> Result<Vec<f64>> {
  let sigma = x.standard_deviation();
  let half_sweep = sweep_width_per_std_dev / 2.0;
  let one = RandomVariable::scalar(1.0);
  let zero = RandomVariable::scalar(0.0);

  let mut sizes = Vec::new();
  let mut densities = Vec::new();
  for step in -DENSITY_SAMPLES_PER_SIDE..=DENSITY_SAMPLES_PER_SIDE {
    let factor = f64::from(step) * half_sweep / f64::from(DENSITY_SAMPLES_PER_SIDE);
    if factor.abs() < 1e-10 {
      continue;
    }
    let size = factor * sigma;
    let lower = x.shift(size.max(0.0)).choose(&one, &zero)?;
    let upper = x.shift(size.min(0.0)).choose(&zero, &one)?;
    let window = lower.mult(&upper)?;
    sizes.push(size);
    densities.push(window.average() / size.abs());
  }

  fit_polynomial(&sizes, &densities, powers)
}

/// Smoothed stand-in for the derivative of `1_{X >= 0}`, evaluated per path.
pub fn dirac_delta_weight(config: &DiracDeltaConfig, x: &RandomVariable) -> Result<RandomVariable> {
  match config.method() {
    DiracDeltaMethod::Direct => direct_weight(config, x),
    DiracDeltaMethod::RegressionOnDistribution => regression_weight(config, x),
  }
}

fn direct_weight(config: &DiracDeltaConfig, x: &RandomVariable) -> Result<RandomVariable> {
  let width_per_std_dev = config.width_per_std_dev();
  if width_per_std_dev == 0.0 {
    return Ok(RandomVariable::scalar(0.0));
  }
  if width_per_std_dev.is_infinite() {
    return Ok(RandomVariable::scalar(1.0));
  }

  let width = width_per_std_dev * x.standard_deviation();
  if width == 0.0 {
    return Ok(RandomVariable::scalar(0.0));
  }

  let window = localizer(x, width)?;
  let density = window.average() / width;
  debug!(width, density, "direct dirac-delta estimate");
  Ok(RandomVariable::scalar(density))
}

fn regression_weight(config: &DiracDeltaConfig, x: &RandomVariable) -> Result<RandomVariable> {
  let width_per_std_dev = config.width_per_std_dev();
  if width_per_std_dev == 0.0 {
    return Ok(RandomVariable::scalar(0.0));
  }
  let sigma = x.standard_deviation();
  if sigma == 0.0 {
    return Ok(RandomVariable::scalar(0.0));
  }

  let powers = config.density_regression_powers();
  let coefficients =
    density_regression(x, config.density_regression_width_per_std_dev(), powers)?;
  let fitted = polynomial_value(x, powers, &coefficients)?;
  debug!(?coefficients, "density regression fit");

  if width_per_std_dev.is_infinite() {
    return Ok(fitted);
  }

  // Restrict the fitted density to the localization window, renormalized so
  // that averaging adjoint * weight over all paths equals the conditional
  // average over the window.
  let width = width_per_std_dev * sigma;
  let window = localizer(x, width)?;
  let inside = window.average();
  if inside <= 0.0 {
    return Ok(RandomVariable::scalar(0.0));
  }
  Ok(fitted.mult(&window)?.scale(1.0 / inside))
}
