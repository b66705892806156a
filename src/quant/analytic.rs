//! # Analytic
//!
//! $$
//! V=e^{-rT}N(d_2),\qquad
//! \Delta=\frac{e^{-rT}\varphi(d_2)}{S_0\sigma\sqrt T}
//! $$
//!
//! Closed-form digital option value and delta under Black-Scholes, used as
//! the correctness oracle for the Monte Carlo estimators.

use statrs::distribution::Continuous;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

fn d2(initial_value: f64, rate: f64, volatility: f64, maturity: f64, strike: f64) -> f64 {
  ((initial_value / strike).ln() + (rate - 0.5 * volatility * volatility) * maturity)
    / (volatility * maturity.sqrt())
}

/// Price of a cash-or-nothing digital call paying one unit.
pub fn digital_option_price(
  initial_value: f64,
  rate: f64,
  volatility: f64,
  maturity: f64,
  strike: f64,
) -> f64 {
  let normal = Normal::default();
  (-rate * maturity).exp() * normal.cdf(d2(initial_value, rate, volatility, maturity, strike))
}

/// Delta of a cash-or-nothing digital call paying one unit.
pub fn digital_option_delta(
  initial_value: f64,
  rate: f64,
  volatility: f64,
  maturity: f64,
  strike: f64,
) -> f64 {
  let normal = Normal::default();
  (-rate * maturity).exp() * normal.pdf(d2(initial_value, rate, volatility, maturity, strike))
    / (initial_value * volatility * maturity.sqrt())
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use super::*;

  #[test]
  fn delta_matches_a_finite_difference_of_the_price() {
    let (rate, volatility, maturity, strike) = (0.05, 0.5, 1.0, 1.05);
    let bump = 1e-6;

    for spot in [0.8, 1.0, 1.3] {
      let bumped_up = digital_option_price(spot + bump, rate, volatility, maturity, strike);
      let bumped_down = digital_option_price(spot - bump, rate, volatility, maturity, strike);
      let finite_difference = (bumped_up - bumped_down) / (2.0 * bump);
      let delta = digital_option_delta(spot, rate, volatility, maturity, strike);
      assert_relative_eq!(delta, finite_difference, epsilon = 1e-6);
    }
  }

  #[test]
  fn price_stays_inside_the_discount_bound() {
    let price = digital_option_price(1.0, 0.05, 0.5, 1.0, 1.05);
    assert!(price > 0.0);
    assert!(price < (-0.05f64).exp());
  }
}
