//! # Random Variable
//!
//! $$
//! X:\Omega\to\mathbb R,\qquad \Omega=\{\omega_1,\dots,\omega_N\}
//! $$
//!
//! Vector-valued random variables over a fixed set of Monte Carlo paths. A
//! value is either deterministic (one number broadcast over every path) or
//! stochastic (one realization per path). Operations are pure and return a
//! new value; statistics are computed on demand and never cached.

use ndarray::Array1;

use crate::error::Result;
use crate::error::SensitivityError;

#[derive(Clone, Debug, PartialEq)]
pub enum RandomVariable {
  /// A single value, broadcast over all paths.
  Deterministic(f64),
  /// One realization per path.
  Stochastic(Array1<f64>),
}

impl RandomVariable {
  pub fn scalar(value: f64) -> Self {
    Self::Deterministic(value)
  }

  pub fn from_array(values: Array1<f64>) -> Self {
    Self::Stochastic(values)
  }

  pub fn from_vec(values: Vec<f64>) -> Self {
    Self::Stochastic(Array1::from_vec(values))
  }

  pub fn ones(paths: usize) -> Self {
    Self::Stochastic(Array1::ones(paths))
  }

  /// Number of paths, or `None` for a deterministic value.
  pub fn size(&self) -> Option<usize> {
    match self {
      Self::Deterministic(_) => None,
      Self::Stochastic(values) => Some(values.len()),
    }
  }

  pub fn is_deterministic(&self) -> bool {
    matches!(self, Self::Deterministic(_))
  }

  /// Realization on a given path; a deterministic value ignores the index.
  pub fn get(&self, path: usize) -> f64 {
    match self {
      Self::Deterministic(value) => *value,
      Self::Stochastic(values) => values[path],
    }
  }

  /// Realizations as a dense vector of the given path count.
  pub fn realizations(&self, paths: usize) -> Array1<f64> {
    match self {
      Self::Deterministic(value) => Array1::from_elem(paths, *value),
      Self::Stochastic(values) => values.clone(),
    }
  }

  fn map(&self, f: impl Fn(f64) -> f64) -> Self {
    match self {
      Self::Deterministic(value) => Self::Deterministic(f(*value)),
      Self::Stochastic(values) => Self::Stochastic(values.mapv(f)),
    }
  }

  fn zip(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
    match (self, other) {
      (Self::Deterministic(a), Self::Deterministic(b)) => Ok(Self::Deterministic(f(*a, *b))),
      (Self::Deterministic(a), Self::Stochastic(b)) => Ok(Self::Stochastic(b.mapv(|y| f(*a, y)))),
      (Self::Stochastic(a), Self::Deterministic(b)) => Ok(Self::Stochastic(a.mapv(|x| f(x, *b)))),
      (Self::Stochastic(a), Self::Stochastic(b)) => {
        if a.len() != b.len() {
          return Err(SensitivityError::ShapeMismatch {
            left: a.len(),
            right: b.len(),
          });
        }
        let values = a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
        Ok(Self::Stochastic(values))
      }
    }
  }

  pub fn add(&self, other: &Self) -> Result<Self> {
    self.zip(other, |x, y| x + y)
  }

  pub fn sub(&self, other: &Self) -> Result<Self> {
    self.zip(other, |x, y| x - y)
  }

  pub fn mult(&self, other: &Self) -> Result<Self> {
    self.zip(other, |x, y| x * y)
  }

  pub fn div(&self, other: &Self) -> Result<Self> {
    self.zip(other, |x, y| x / y)
  }

  pub fn pow(&self, exponent: i32) -> Self {
    self.map(|x| x.powi(exponent))
  }

  pub fn squared(&self) -> Self {
    self.map(|x| x * x)
  }

  pub fn shift(&self, offset: f64) -> Self {
    self.map(|x| x + offset)
  }

  pub fn scale(&self, factor: f64) -> Self {
    self.map(|x| x * factor)
  }

  /// Per-path selection: where the receiver is non-negative the result takes
  /// `on_true`, elsewhere `on_false`. The selection itself is exact; only its
  /// derivative needs a Dirac-delta approximation.
  pub fn choose(&self, on_true: &Self, on_false: &Self) -> Result<Self> {
    match self {
      Self::Deterministic(x) => {
        if *x >= 0.0 {
          Ok(on_true.clone())
        } else {
          Ok(on_false.clone())
        }
      }
      Self::Stochastic(x) => {
        let paths = x.len();
        for branch in [on_true, on_false] {
          if let Some(size) = branch.size() {
            if size != paths {
              return Err(SensitivityError::ShapeMismatch {
                left: paths,
                right: size,
              });
            }
          }
        }
        let values = x
          .iter()
          .enumerate()
          .map(|(i, &xi)| if xi >= 0.0 { on_true.get(i) } else { on_false.get(i) })
          .collect();
        Ok(Self::Stochastic(values))
      }
    }
  }

  /// Arithmetic mean over all paths.
  pub fn average(&self) -> f64 {
    match self {
      Self::Deterministic(value) => *value,
      Self::Stochastic(values) => values.mean().unwrap_or(0.0),
    }
  }

  /// Population variance over all paths.
  pub fn variance(&self) -> f64 {
    match self {
      Self::Deterministic(_) => 0.0,
      Self::Stochastic(values) => {
        let mean = values.mean().unwrap_or(0.0);
        let second_moment = values.mapv(|x| x * x).mean().unwrap_or(0.0);
        (second_moment - mean * mean).max(0.0)
      }
    }
  }

  pub fn standard_deviation(&self) -> f64 {
    self.variance().sqrt()
  }
}
