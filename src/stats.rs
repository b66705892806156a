//! # Stats
//!
//! $$
//! \hat\beta=\arg\min_\beta\|y-X\beta\|_2^2
//! $$
//!
pub mod linear_regression;

pub use linear_regression::fit_polynomial;
pub use linear_regression::polynomial_value;
pub use linear_regression::LinearRegression;
