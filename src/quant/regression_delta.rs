//! # Regression Delta
//!
//! $$
//! \frac{\partial}{\partial S_0}\mathbb E\big[A\,\mathbf 1_{X\ge0}\big]
//! =\mathbb E\big[A\mid X=0\big]\,f_X(0)
//! $$
//!
//! Delta of a digital payoff by explicit decomposition of the adjoint. Two
//! gradient runs bracket the discontinuity: a zero smoothing width keeps
//! only the contribution of the branches, an infinite width additionally
//! passes the full adjoint A through the indicator. The difference isolates
//! A, which is then regressed on a localizer around the discontinuity and
//! multiplied by a regression estimate of the density of X at zero.

use tracing::debug;

use crate::autodiff::dirac::density_regression;
use crate::autodiff::dirac::localizer;
use crate::autodiff::DiracDeltaConfig;
use crate::autodiff::DiracDeltaMethod;
use crate::error::Result;
use crate::quant::digital::DigitalOption;
use crate::random_variable::RandomVariable;
use crate::stats::polynomial_value;
use crate::stats::LinearRegression;
use crate::stochastic::black_scholes::BlackScholesMonteCarlo;

/// Decomposed sensitivity with its diagnostic ingredients.
#[derive(Clone, Debug)]
pub struct RegressionSensitivity {
  /// Pathwise delta; the Monte Carlo delta is its average.
  pub delta: RandomVariable,
  /// Regression estimate of the density of the trigger at zero.
  pub density: f64,
  /// Average adjoint over the localization window.
  pub localized_adjoint: f64,
}

/// Digital option delta via the adjoint decomposition described above. The
/// localization window and the density sweep come from the model's
/// configuration, which must carry a finite, positive smoothing width.
pub fn digital_delta_regression(
  option: &DigitalOption,
  model: &BlackScholesMonteCarlo,
) -> Result<RegressionSensitivity> {
  let config = model.tape().config();
  let density_width = config.density_regression_width_per_std_dev();
  let powers = config.density_regression_powers().to_vec();

  let zero_width = model.with_config(DiracDeltaConfig::new(
    0.0,
    DiracDeltaMethod::Direct,
    density_width,
    powers.clone(),
  )?)?;
  let full_width = model.with_config(DiracDeltaConfig::new(
    f64::INFINITY,
    DiracDeltaMethod::Direct,
    density_width,
    powers.clone(),
  )?)?;

  let branch_adjoint = option
    .delta_aad(&zero_width)?
    .realizations(model.paths());
  let branch_adjoint = RandomVariable::from_array(branch_adjoint);
  let full_adjoint = option.delta_aad(&full_width)?;
  let jump_adjoint = full_adjoint.sub(&branch_adjoint)?;

  let moneyness = full_width
    .asset_at(option.maturity)
    .value()
    .shift(-option.strike);

  let coefficients = density_regression(&moneyness, density_width, &powers)?;
  let density = polynomial_value(&RandomVariable::scalar(0.0), &powers, &coefficients)?.average();

  let width = config.width_per_std_dev() * moneyness.standard_deviation();
  assert!(
    width.is_finite() && width > 0.0,
    "the adjoint regression needs a finite, positive localization window"
  );
  let window = localizer(&moneyness, width)?;
  let localized = jump_adjoint.mult(&window)?;
  let localized_adjoint = LinearRegression::new(vec![window]).coefficients(&localized)?[0];

  debug!(density, localized_adjoint, "adjoint regression estimate");

  let delta = branch_adjoint.shift(localized_adjoint * density);
  Ok(RegressionSensitivity {
    delta,
    density,
    localized_adjoint,
  })
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use statrs::distribution::Continuous;
  use statrs::distribution::Normal;

  use super::*;
  use crate::stochastic::BrownianMotion;
  use crate::stochastic::K;
  use crate::stochastic::S0;
  use crate::stochastic::SEED;

  const RATE: f64 = 0.05;
  const VOLATILITY: f64 = 0.50;
  const MATURITY: f64 = 1.0;

  /// Lognormal density of the terminal asset value, evaluated at the strike.
  fn moneyness_density_at_zero() -> f64 {
    let d = ((S0 / K).ln() + (RATE - 0.5 * VOLATILITY * VOLATILITY) * MATURITY)
      / (VOLATILITY * MATURITY.sqrt());
    Normal::default().pdf(d) / (K * VOLATILITY * MATURITY.sqrt())
  }

  #[test]
  fn density_regression_matches_the_lognormal_density() {
    let brownian = BrownianMotion::new(1, MATURITY, 200_000, SEED);
    let model = BlackScholesMonteCarlo::new(
      S0,
      RATE,
      VOLATILITY,
      brownian,
      DiracDeltaConfig::direct(0.05).unwrap(),
    )
    .unwrap();
    let option = DigitalOption::new(MATURITY, K);

    let sensitivity = digital_delta_regression(&option, &model).unwrap();
    assert_relative_eq!(
      sensitivity.density,
      moneyness_density_at_zero(),
      max_relative = 0.05
    );
  }

  #[test]
  fn decomposed_delta_matches_the_analytic_value() {
    let brownian = BrownianMotion::new(1, MATURITY, 200_000, SEED);
    let model = BlackScholesMonteCarlo::new(
      S0,
      RATE,
      VOLATILITY,
      brownian,
      DiracDeltaConfig::regression_on_distribution(0.05, 0.75).unwrap(),
    )
    .unwrap();
    let option = DigitalOption::new(MATURITY, K);

    let sensitivity = digital_delta_regression(&option, &model).unwrap();
    let delta_analytic =
      crate::quant::analytic::digital_option_delta(S0, RATE, VOLATILITY, MATURITY, K);
    assert_relative_eq!(sensitivity.delta.average(), delta_analytic, epsilon = 4e-3);
  }
}
