use anyhow::Result;
use prettytable::row;
use prettytable::Table;
use stochastic_aad::autodiff::DiracDeltaConfig;
use stochastic_aad::quant::analytic;
use stochastic_aad::quant::digital_delta_regression;
use stochastic_aad::quant::DigitalOption;
use stochastic_aad::stochastic::BlackScholesMonteCarlo;
use stochastic_aad::stochastic::BrownianMotion;
use stochastic_aad::stochastic::K;
use stochastic_aad::stochastic::S0;
use stochastic_aad::stochastic::SEED;
use tracing::info;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let rate = 0.05;
  let volatility = 0.50;
  let maturity = 1.0;
  let paths = 200_000;
  let width = 0.05;
  let density_width = 0.75;

  let brownian = BrownianMotion::new(1, maturity, paths, SEED);
  let option = DigitalOption::new(maturity, K);

  let direct = BlackScholesMonteCarlo::new(
    S0,
    rate,
    volatility,
    brownian,
    DiracDeltaConfig::direct(width)?,
  )?;
  let regression =
    direct.with_config(DiracDeltaConfig::regression_on_distribution(width, density_width)?)?;

  let delta_analytic = analytic::digital_option_delta(S0, rate, volatility, maturity, K);

  let moneyness_std_dev = direct
    .terminal_asset()
    .value()
    .shift(-K)
    .standard_deviation();
  let delta_finite_difference = option
    .delta_finite_difference(&direct, width * moneyness_std_dev)?
    .average();
  let delta_direct = option.delta_aad(&direct)?.average();
  let delta_regression = option.delta_aad(&regression)?.average();
  let delta_adjoint_regression = digital_delta_regression(&option, &direct)?.delta.average();
  let delta_likelihood = option.delta_likelihood_ratio(&direct)?;

  info!(paths, "digital option delta estimates ready");

  let mut table = Table::new();
  table.add_row(row!["estimator", "delta", "error"]);
  for (name, delta) in [
    ("finite difference", delta_finite_difference),
    ("adjoint differentiation", delta_direct),
    ("adjoint + density regression", delta_regression),
    ("adjoint + adjoint regression", delta_adjoint_regression),
    ("likelihood ratio", delta_likelihood),
    ("analytic", delta_analytic),
  ] {
    table.add_row(row![
      name,
      format!("{delta:.4}"),
      format!("{:+.4}", delta - delta_analytic)
    ]);
  }
  table.printstd();

  Ok(())
}
