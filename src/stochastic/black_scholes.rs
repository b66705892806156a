//! # Black Scholes
//!
//! $$
//! S_{t_{k+1}}=S_{t_k}\exp\!\Big(\big(r-\tfrac{\sigma^2}{2}\big)\Delta t+\sigma\,\Delta W_k\Big)
//! $$
//!
//! Black-Scholes Monte Carlo simulation recorded on a tape. Each step
//! multiplies the asset by its exact lognormal growth factor; the factor
//! does not depend on the initial value, so it enters the tape as a
//! constant and the chain rule through the multiplications is exact.

use std::rc::Rc;

use tracing::debug;

use crate::autodiff::Differentiable;
use crate::autodiff::DiracDeltaConfig;
use crate::autodiff::Tape;
use crate::error::Result;
use crate::random_variable::RandomVariable;
use crate::stochastic::brownian::BrownianMotion;

pub struct BlackScholesMonteCarlo {
  pub initial_value: f64,
  pub rate: f64,
  pub volatility: f64,
  pub brownian: BrownianMotion,
  tape: Rc<Tape>,
  initial_node: Differentiable,
  assets: Vec<Differentiable>,
}

impl BlackScholesMonteCarlo {
  pub fn new(
    initial_value: f64,
    rate: f64,
    volatility: f64,
    brownian: BrownianMotion,
    config: DiracDeltaConfig,
  ) -> Result<Self> {
    assert!(initial_value > 0.0, "the initial value must be positive");
    assert!(volatility > 0.0, "the volatility must be positive");

    debug!(
      paths = brownian.paths,
      steps = brownian.time_steps,
      "building black-scholes simulation"
    );

    let tape = Tape::with_config(config);
    let initial_node = tape.variable(RandomVariable::scalar(initial_value));

    let drift = (rate - 0.5 * volatility * volatility) * brownian.delta_t;
    let mut asset = initial_node.clone();
    let mut assets = vec![asset.clone()];
    for increment in brownian.increments() {
      let growth = increment.mapv(|dw| (drift + volatility * dw).exp());
      let growth = tape.constant(RandomVariable::from_array(growth));
      asset = asset.mult(&growth)?;
      assets.push(asset.clone());
    }

    Ok(Self {
      initial_value,
      rate,
      volatility,
      brownian,
      tape,
      initial_node,
      assets,
    })
  }

  pub fn tape(&self) -> &Rc<Tape> {
    &self.tape
  }

  /// The differentiable leaf holding the initial value. Sensitivities with
  /// respect to the spot are read off a gradient at this node's id.
  pub fn initial_value_node(&self) -> &Differentiable {
    &self.initial_node
  }

  pub fn paths(&self) -> usize {
    self.brownian.paths
  }

  pub fn time_horizon(&self) -> f64 {
    self.brownian.time_horizon()
  }

  /// Asset value at the discretization time closest to `time`.
  pub fn asset_at(&self, time: f64) -> &Differentiable {
    assert!(
      time >= 0.0 && time <= self.time_horizon() + 1e-12,
      "time {time} is outside the simulated horizon"
    );
    let step = (time / self.brownian.delta_t).round() as usize;
    &self.assets[step.min(self.assets.len() - 1)]
  }

  pub fn terminal_asset(&self) -> &Differentiable {
    self.assets.last().unwrap()
  }

  /// Rebuild the simulation with a bumped spot on the same Brownian draws.
  pub fn with_initial_value(&self, initial_value: f64) -> Result<Self> {
    Self::new(
      initial_value,
      self.rate,
      self.volatility,
      self.brownian.clone(),
      self.tape.config().clone(),
    )
  }

  /// Rebuild the simulation with a different smoothing configuration on the
  /// same Brownian draws.
  pub fn with_config(&self, config: DiracDeltaConfig) -> Result<Self> {
    Self::new(
      self.initial_value,
      self.rate,
      self.volatility,
      self.brownian.clone(),
      config,
    )
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;
  use crate::stochastic::S0;

  fn model(paths: usize, seed: u64) -> BlackScholesMonteCarlo {
    let brownian = BrownianMotion::new(1, 1.0, paths, seed);
    BlackScholesMonteCarlo::new(S0, 0.05, 0.5, brownian, DiracDeltaConfig::default()).unwrap()
  }

  #[test]
  fn discounted_terminal_asset_is_a_martingale() {
    let model = model(100_000, 42);
    let discounted = model.terminal_asset().value().scale((-0.05f64).exp());
    assert_relative_eq!(discounted.average(), S0, epsilon = 0.01);
  }

  #[test]
  fn asset_at_time_zero_is_the_initial_value() {
    let model = model(100, 1);
    assert_eq!(
      model.asset_at(0.0).value(),
      RandomVariable::scalar(S0)
    );
    assert_eq!(
      model.asset_at(0.0).id(),
      model.initial_value_node().id()
    );
  }

  #[test]
  fn bumped_spot_scales_every_path_proportionally() {
    let base = model(1000, 5);
    let bumped = base.with_initial_value(S0 * 1.1).unwrap();

    let base_terminal = base.terminal_asset().value();
    let bumped_terminal = bumped.terminal_asset().value();
    for path in 0..1000 {
      assert_relative_eq!(
        bumped_terminal.get(path) / base_terminal.get(path),
        1.1,
        epsilon = 1e-12
      );
    }
  }

  #[test]
  fn multi_step_terminal_matches_the_accumulated_noise() {
    let brownian = BrownianMotion::new(4, 0.25, 500, 11);
    let model =
      BlackScholesMonteCarlo::new(S0, 0.05, 0.5, brownian.clone(), DiracDeltaConfig::default())
        .unwrap();

    let terminal = model.terminal_asset().value();
    let noise = brownian.terminal();
    let drift = (0.05 - 0.5 * 0.5 * 0.5) * 1.0;
    for path in 0..500 {
      let exact = S0 * (drift + 0.5 * noise[path]).exp();
      assert_relative_eq!(terminal.get(path), exact, epsilon = 1e-12);
    }
  }
}
