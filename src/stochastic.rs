//! # Stochastic
//!
//! $$
//! dS_t=rS_t\,dt+\sigma S_t\,dW_t
//! $$
//!
//! Path simulation for the sensitivity engine.
//!
//! | Module | Description |
//! |------------------|---------------------------------------------------------------|
//! | [`brownian`]      | Seeded Brownian increments shared across model re-runs.      |
//! | [`black_scholes`] | Black-Scholes Monte Carlo simulation recorded on a tape.     |

pub mod black_scholes;
pub mod brownian;

pub use black_scholes::BlackScholesMonteCarlo;
pub use brownian::BrownianMotion;

/// Default number of Monte Carlo paths
pub const N: usize = 10_000;
/// Default initial asset value
pub const S0: f64 = 1.0;
/// Default strike price
pub const K: f64 = 1.05;
/// Default simulation seed
pub const SEED: u64 = 3141;
