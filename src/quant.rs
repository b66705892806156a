//! # Quant
//!
//! $$
//! \Delta=\frac{\partial}{\partial S_0}\,\mathbb E\big[e^{-rT}\,\mathbf 1_{S_T\ge K}\big]
//! $$
//!
//! Digital option valuation and the delta estimators built on top of the
//! adjoint machinery.

pub mod analytic;
pub mod digital;
pub mod regression_delta;

pub use digital::DigitalOption;
pub use regression_delta::digital_delta_regression;
pub use regression_delta::RegressionSensitivity;
