//! # Error
//!
//! Failure taxonomy shared by the random-variable arithmetic, the
//! least-squares solver and the adjoint machinery. A failure is fatal to the
//! simulation run that produced it; nothing is retried or suppressed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensitivityError {
  /// Element-wise operation between two path vectors of different lengths.
  #[error("path count mismatch between operands ({left} vs {right})")]
  ShapeMismatch { left: usize, right: usize },

  /// The least-squares solve failed even with the pseudo-inverse fallback.
  #[error("least-squares design matrix could not be solved")]
  SingularRegression,

  /// A configuration value outside its validated domain.
  #[error("invalid configuration: {0}")]
  InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, SensitivityError>;
