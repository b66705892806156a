//! # Digital
//!
//! $$
//! V=e^{-rT}\,\mathbf 1_{S_T-K\ge 0}
//! $$
//!
//! Cash-or-nothing digital call. The payoff is a step function of the
//! terminal asset value, so its pathwise delta is degenerate; the adjoint
//! estimators below differ only in how they smooth that discontinuity.

use impl_new_derive::ImplNew;

use crate::autodiff::Differentiable;
use crate::error::Result;
use crate::random_variable::RandomVariable;
use crate::stochastic::black_scholes::BlackScholesMonteCarlo;

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct DigitalOption {
  pub maturity: f64,
  pub strike: f64,
}

impl DigitalOption {
  /// Discounted payoff recorded on the model's tape.
  pub fn value(&self, model: &BlackScholesMonteCarlo) -> Result<Differentiable> {
    let tape = model.tape();
    let moneyness = model.asset_at(self.maturity).shift(-self.strike);
    let one = tape.constant(RandomVariable::scalar(1.0));
    let zero = tape.constant(RandomVariable::scalar(0.0));
    let payoff = moneyness.choose(&one, &zero)?;
    Ok(payoff.scale((-model.rate * self.maturity).exp()))
  }

  /// Pathwise delta from the adjoint sweep, using the model's configured
  /// Dirac-delta approximation. The Monte Carlo delta is its average.
  pub fn delta_aad(&self, model: &BlackScholesMonteCarlo) -> Result<RandomVariable> {
    let value = self.value(model)?;
    let gradient = value.gradient()?;
    Ok(gradient.adjoint(model.initial_value_node().id()))
  }

  /// Central finite difference on spot-bumped re-runs sharing the base
  /// model's Brownian draws.
  pub fn delta_finite_difference(
    &self,
    model: &BlackScholesMonteCarlo,
    bump: f64,
  ) -> Result<RandomVariable> {
    assert!(bump > 0.0, "the bump size must be positive");
    let bumped_up = model.with_initial_value(model.initial_value + 0.5 * bump)?;
    let bumped_down = model.with_initial_value(model.initial_value - 0.5 * bump)?;
    let value_up = self.value(&bumped_up)?.value();
    let value_down = self.value(&bumped_down)?.value();
    Ok(value_up.sub(&value_down)?.scale(1.0 / bump))
  }

  /// Likelihood-ratio delta, the standard benchmark for digital payoffs:
  /// the payoff is left untouched and the lognormal transition density is
  /// differentiated instead, giving the weight `W_T / (S_0 sigma T)`.
  pub fn delta_likelihood_ratio(&self, model: &BlackScholesMonteCarlo) -> Result<f64> {
    let steps = (self.maturity / model.brownian.delta_t).round() as usize;
    let time = steps as f64 * model.brownian.delta_t;
    let noise = RandomVariable::from_array(model.brownian.accumulated(steps));

    let moneyness = model.asset_at(self.maturity).value().shift(-self.strike);
    let indicator = moneyness.choose(
      &RandomVariable::scalar(1.0),
      &RandomVariable::scalar(0.0),
    )?;

    let discount = (-model.rate * self.maturity).exp();
    let weighted = indicator.mult(&noise)?;
    Ok(discount * weighted.average() / (model.initial_value * model.volatility * time))
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;
  use crate::autodiff::DiracDeltaConfig;
  use crate::quant::analytic;
  use crate::quant::regression_delta::digital_delta_regression;
  use crate::stochastic::BrownianMotion;
  use crate::stochastic::K;
  use crate::stochastic::S0;
  use crate::stochastic::SEED;

  const RATE: f64 = 0.05;
  const VOLATILITY: f64 = 0.50;
  const MATURITY: f64 = 1.0;

  fn model(
    paths: usize,
    seed: u64,
    config: DiracDeltaConfig,
  ) -> BlackScholesMonteCarlo {
    let brownian = BrownianMotion::new(1, MATURITY, paths, seed);
    BlackScholesMonteCarlo::new(S0, RATE, VOLATILITY, brownian, config).unwrap()
  }

  #[test]
  fn payoff_takes_only_the_discounted_cash_values() {
    let direct = model(1000, 1, DiracDeltaConfig::direct(0.05).unwrap());
    let option = DigitalOption::new(MATURITY, K);
    let value = option.value(&direct).unwrap().value();

    let discount = (-RATE * MATURITY).exp();
    let terminal = direct.terminal_asset().value();
    for path in 0..1000 {
      let expected = if terminal.get(path) >= K { discount } else { 0.0 };
      assert_eq!(value.get(path), expected);
    }
  }

  #[test]
  fn digital_option_delta_estimates() {
    let paths = 200_000;
    let width = 0.05;
    let option = DigitalOption::new(MATURITY, K);

    let direct = model(paths, SEED, DiracDeltaConfig::direct(width).unwrap());
    let regression = direct
      .with_config(DiracDeltaConfig::regression_on_distribution(width, 0.75).unwrap())
      .unwrap();

    let delta_analytic = analytic::digital_option_delta(S0, RATE, VOLATILITY, MATURITY, K);

    let moneyness_std_dev = direct
      .terminal_asset()
      .value()
      .shift(-K)
      .standard_deviation();
    let delta_finite_difference = option
      .delta_finite_difference(&direct, width * moneyness_std_dev)
      .unwrap()
      .average();
    let delta_direct = option.delta_aad(&direct).unwrap().average();
    let delta_regression = option.delta_aad(&regression).unwrap().average();
    let delta_adjoint_regression = digital_delta_regression(&option, &direct)
      .unwrap()
      .delta
      .average();
    let delta_likelihood = option.delta_likelihood_ratio(&direct).unwrap();

    assert_relative_eq!(delta_finite_difference, delta_analytic, epsilon = 1e-1);
    assert_relative_eq!(delta_direct, delta_analytic, epsilon = 1e-2);
    assert_relative_eq!(delta_regression, delta_analytic, epsilon = 4e-3);
    assert_relative_eq!(delta_adjoint_regression, delta_analytic, epsilon = 4e-3);
    assert_relative_eq!(delta_likelihood, delta_analytic, epsilon = 4e-3);
  }

  #[test]
  fn smoothing_methods_agree_for_large_path_counts() {
    let paths = 200_000;
    let option = DigitalOption::new(MATURITY, K);

    let direct = model(paths, 57, DiracDeltaConfig::direct(0.2).unwrap());
    let regression = direct
      .with_config(DiracDeltaConfig::regression_on_distribution(0.2, 0.75).unwrap())
      .unwrap();

    let delta_direct = option.delta_aad(&direct).unwrap().average();
    let delta_regression = option.delta_aad(&regression).unwrap().average();
    let delta_analytic = analytic::digital_option_delta(S0, RATE, VOLATILITY, MATURITY, K);

    assert_relative_eq!(delta_direct, delta_regression, epsilon = 2e-2);
    assert_relative_eq!(delta_direct, delta_analytic, epsilon = 2e-2);
    assert_relative_eq!(delta_regression, delta_analytic, epsilon = 2e-2);
  }

  #[test]
  fn variance_ordering_of_the_estimators() {
    let paths = 20_000;
    let width = 0.1;
    let bump = 0.005 * S0;
    let option = DigitalOption::new(MATURITY, K);

    let mut finite_difference = Vec::new();
    let mut direct = Vec::new();
    let mut regression = Vec::new();
    for seed in 0..24u64 {
      let base = model(paths, 1000 + seed, DiracDeltaConfig::direct(width).unwrap());
      finite_difference.push(
        option
          .delta_finite_difference(&base, bump)
          .unwrap()
          .average(),
      );
      direct.push(option.delta_aad(&base).unwrap().average());

      let smoothed = base
        .with_config(DiracDeltaConfig::regression_on_distribution(width, 0.75).unwrap())
        .unwrap();
      regression.push(option.delta_aad(&smoothed).unwrap().average());
    }

    let variance_finite_difference = sample_variance(&finite_difference);
    let variance_direct = sample_variance(&direct);
    let variance_regression = sample_variance(&regression);

    assert!(
      variance_regression < variance_direct,
      "regression variance {variance_regression} should be below direct variance {variance_direct}"
    );
    assert!(
      variance_direct < variance_finite_difference,
      "direct variance {variance_direct} should be below finite-difference variance {variance_finite_difference}"
    );
  }

  fn sample_variance(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (values.len() - 1) as f64
  }
}
