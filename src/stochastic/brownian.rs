//! # Brownian
//!
//! $$
//! \Delta W_k\sim\mathcal N(0,\Delta t)
//! $$
//!
//! Seeded Brownian increments. The same seed always reproduces the same
//! draws, which lets bumped model re-runs share their noise with the base
//! run (common random numbers).

use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;

#[derive(ImplNew, Clone, Debug)]
pub struct BrownianMotion {
  pub time_steps: usize,
  pub delta_t: f64,
  pub paths: usize,
  pub seed: u64,
}

impl BrownianMotion {
  /// Per-step increment vectors, drawn step-major from the seeded generator.
  pub fn increments(&self) -> Vec<Array1<f64>> {
    assert!(self.time_steps > 0, "at least one time step is required");
    assert!(self.paths > 0, "at least one path is required");
    assert!(self.delta_t > 0.0, "the step size must be positive");

    let mut rng = StdRng::seed_from_u64(self.seed);
    let normal = Normal::new(0.0, self.delta_t.sqrt()).unwrap();
    (0..self.time_steps)
      .map(|_| Array1::random_using(self.paths, normal, &mut rng))
      .collect()
  }

  /// The accumulated Brownian value after the given number of steps.
  pub fn accumulated(&self, steps: usize) -> Array1<f64> {
    let mut total = Array1::<f64>::zeros(self.paths);
    for increment in self.increments().iter().take(steps) {
      total += increment;
    }
    total
  }

  /// The terminal Brownian value `W_T`.
  pub fn terminal(&self) -> Array1<f64> {
    self.accumulated(self.time_steps)
  }

  pub fn time_horizon(&self) -> f64 {
    self.time_steps as f64 * self.delta_t
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn same_seed_reproduces_the_same_draws() {
    let first = BrownianMotion::new(4, 0.25, 1000, 7).increments();
    let second = BrownianMotion::new(4, 0.25, 1000, 7).increments();
    assert_eq!(first, second);

    let other = BrownianMotion::new(4, 0.25, 1000, 8).increments();
    assert_ne!(first, other);
  }

  #[test]
  fn terminal_value_has_the_right_moments() {
    let brownian = BrownianMotion::new(2, 0.5, 100_000, 42);
    let terminal = brownian.terminal();

    let mean = terminal.mean().unwrap();
    let variance = terminal.mapv(|w| w * w).mean().unwrap() - mean * mean;

    assert_relative_eq!(mean, 0.0, epsilon = 0.02);
    assert_relative_eq!(variance, brownian.time_horizon(), epsilon = 0.02);
  }

  #[test]
  fn one_increment_per_step() {
    let brownian = BrownianMotion::new(3, 1.0 / 3.0, 16, 1);
    let increments = brownian.increments();
    assert_eq!(increments.len(), 3);
    assert!(increments.iter().all(|dw| dw.len() == 16));
  }
}
