//! # Stochastic AAD
//!
//! $$
//! \frac{\partial}{\partial S_0}\,\mathbb E\big[f(S_T)\big]
//! \quad\text{for discontinuous }f
//! $$
//!
//! Adjoint algorithmic differentiation over vectors of Monte Carlo paths,
//! built for payoffs with discontinuities. Arithmetic on differentiable
//! random variables records an operation graph; a reverse sweep propagates
//! adjoints through it, replacing the degenerate derivative of indicator
//! operations with a localized or regression-smoothed Dirac-delta estimate.
//!
//! ## Modules
//!
//! | Module | Description |
//! |----------------------|--------------------------------------------------------------|
//! | [`random_variable`]   | Vector-valued random variables over Monte Carlo paths.      |
//! | [`autodiff`]          | Tape, differentiable arithmetic, Dirac smoothing, gradients.|
//! | [`stats`]             | Least-squares regression used by the density smoothing.     |
//! | [`stochastic`]        | Brownian driver and the Black-Scholes path simulation.      |
//! | [`quant`]             | Digital option valuation and delta estimators.              |
//! | [`error`]             | Failure taxonomy shared across the crate.                   |
//!
//! ## Example
//!
//! ```rust
//! use stochastic_aad::autodiff::DiracDeltaConfig;
//! use stochastic_aad::quant::DigitalOption;
//! use stochastic_aad::stochastic::{BlackScholesMonteCarlo, BrownianMotion};
//!
//! let brownian = BrownianMotion::new(1, 1.0, 100_000, 3141);
//! let config = DiracDeltaConfig::regression_on_distribution(0.05, 0.75).unwrap();
//! let model = BlackScholesMonteCarlo::new(1.0, 0.05, 0.5, brownian, config).unwrap();
//!
//! let option = DigitalOption::new(1.0, 1.05);
//! let delta = option.delta_aad(&model).unwrap().average();
//! ```

pub mod autodiff;
pub mod error;
pub mod quant;
pub mod random_variable;
pub mod stats;
pub mod stochastic;

pub use error::Result;
pub use error::SensitivityError;
pub use random_variable::RandomVariable;
