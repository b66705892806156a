//! # Linear Regression
//!
//! $$
//! \hat c=(B^\top B)^{+}B^\top y
//! $$
//!
//! Plain least squares over a set of basis random variables. The solve runs
//! through an SVD so that rank-deficient design matrices fall back to the
//! minimum-norm (pseudo-inverse) solution instead of failing. No
//! differentiation happens here; the adjoint machinery treats the returned
//! coefficients as constants.

use impl_new_derive::ImplNew;
use nalgebra::DMatrix;
use nalgebra::DVector;

use crate::error::Result;
use crate::error::SensitivityError;
use crate::random_variable::RandomVariable;

/// Threshold below which singular values are treated as zero.
const SINGULAR_VALUE_CUTOFF: f64 = 1e-10;

#[derive(ImplNew)]
pub struct LinearRegression {
  pub basis: Vec<RandomVariable>,
}

impl LinearRegression {
  /// Coefficients minimizing the mean squared error of
  /// `target - sum_i c_i * basis_i` across paths.
  pub fn coefficients(&self, target: &RandomVariable) -> Result<Vec<f64>> {
    if self.basis.is_empty() {
      return Err(SensitivityError::InvalidConfiguration(
        "regression requires at least one basis function".to_string(),
      ));
    }

    let mut paths = target.size();
    for basis in &self.basis {
      match (paths, basis.size()) {
        (Some(n), Some(m)) if n != m => {
          return Err(SensitivityError::ShapeMismatch { left: n, right: m });
        }
        (None, Some(m)) => paths = Some(m),
        _ => {}
      }
    }
    let paths = paths.unwrap_or(1);

    let design = DMatrix::from_fn(paths, self.basis.len(), |i, j| self.basis[j].get(i));
    let rhs = DVector::from_fn(paths, |i, _| target.get(i));

    let svd = design.svd(true, true);
    let solution = svd
      .solve(&rhs, SINGULAR_VALUE_CUTOFF)
      .map_err(|_| SensitivityError::SingularRegression)?;

    Ok(solution.iter().copied().collect())
  }
}

/// Least-squares fit of `sum_j c_j * x^{p_j}` through the sample points.
pub fn fit_polynomial(xs: &[f64], ys: &[f64], powers: &[i32]) -> Result<Vec<f64>> {
  if xs.len() != ys.len() {
    return Err(SensitivityError::ShapeMismatch {
      left: xs.len(),
      right: ys.len(),
    });
  }
  let x = RandomVariable::from_vec(xs.to_vec());
  let basis = powers.iter().map(|&p| x.pow(p)).collect();
  LinearRegression::new(basis).coefficients(&RandomVariable::from_vec(ys.to_vec()))
}

/// Evaluate `sum_j c_j * x^{p_j}` path-wise.
pub fn polynomial_value(
  x: &RandomVariable,
  powers: &[i32],
  coefficients: &[f64],
) -> Result<RandomVariable> {
  if powers.len() != coefficients.len() {
    return Err(SensitivityError::ShapeMismatch {
      left: powers.len(),
      right: coefficients.len(),
    });
  }
  let mut value = RandomVariable::scalar(0.0);
  for (&power, &coefficient) in powers.iter().zip(coefficients) {
    value = value.add(&x.pow(power).scale(coefficient))?;
  }
  Ok(value)
}
