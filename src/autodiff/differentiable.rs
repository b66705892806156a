//! # Differentiable
//!
//! A cheap handle onto a tape node. Arithmetic mirrors
//! [`RandomVariable`](crate::random_variable::RandomVariable) but every call
//! also appends an operation record, so the full computation graph of a
//! simulation is available for the backward sweep.

use std::rc::Rc;

use crate::autodiff::gradient;
use crate::autodiff::gradient::Gradient;
use crate::autodiff::tape::NodeId;
use crate::autodiff::tape::Operation;
use crate::autodiff::tape::Tape;
use crate::error::Result;
use crate::error::SensitivityError;
use crate::random_variable::RandomVariable;

#[derive(Clone)]
pub struct Differentiable {
  tape: Rc<Tape>,
  id: NodeId,
}

impl Differentiable {
  pub(crate) fn from_parts(tape: Rc<Tape>, id: NodeId) -> Self {
    Self { tape, id }
  }

  pub fn id(&self) -> NodeId {
    self.id
  }

  pub fn tape(&self) -> &Rc<Tape> {
    &self.tape
  }

  /// The primal value recorded for this node.
  pub fn value(&self) -> RandomVariable {
    self.tape.value(self.id)
  }

  pub fn average(&self) -> f64 {
    self.value().average()
  }

  pub fn standard_deviation(&self) -> f64 {
    self.value().standard_deviation()
  }

  fn record(&self, value: RandomVariable, operation: Operation) -> Self {
    let id = self.tape.push(value, operation);
    Self::from_parts(Rc::clone(&self.tape), id)
  }

  fn assert_same_tape(&self, other: &Self) {
    assert!(
      Rc::ptr_eq(&self.tape, &other.tape),
      "operands were recorded on different tapes"
    );
  }

  pub fn add(&self, other: &Self) -> Result<Self> {
    self.assert_same_tape(other);
    let value = self.value().add(&other.value())?;
    Ok(self.record(value, Operation::Add(self.id, other.id)))
  }

  pub fn sub(&self, other: &Self) -> Result<Self> {
    self.assert_same_tape(other);
    let value = self.value().sub(&other.value())?;
    Ok(self.record(value, Operation::Sub(self.id, other.id)))
  }

  pub fn mult(&self, other: &Self) -> Result<Self> {
    self.assert_same_tape(other);
    let value = self.value().mult(&other.value())?;
    Ok(self.record(value, Operation::Mult(self.id, other.id)))
  }

  pub fn div(&self, other: &Self) -> Result<Self> {
    self.assert_same_tape(other);
    let value = self.value().div(&other.value())?;
    Ok(self.record(value, Operation::Div(self.id, other.id)))
  }

  pub fn pow(&self, exponent: i32) -> Self {
    let value = self.value().pow(exponent);
    self.record(value, Operation::Pow(self.id, exponent))
  }

  pub fn squared(&self) -> Self {
    let value = self.value().squared();
    self.record(value, Operation::Squared(self.id))
  }

  /// Add a deterministic offset, recorded through a constant node.
  pub fn shift(&self, offset: f64) -> Self {
    let constant = self.tape.constant(RandomVariable::scalar(offset));
    let value = self.value().shift(offset);
    self.record(value, Operation::Add(self.id, constant.id))
  }

  /// Multiply by a deterministic factor, recorded through a constant node.
  pub fn scale(&self, factor: f64) -> Self {
    let constant = self.tape.constant(RandomVariable::scalar(factor));
    let value = self.value().scale(factor);
    self.record(value, Operation::Mult(self.id, constant.id))
  }

  /// Per-path selection on the sign of the receiver. The primal is exact;
  /// the backward sweep substitutes a Dirac-delta approximation for the
  /// receiver's derivative.
  pub fn choose(&self, on_true: &Self, on_false: &Self) -> Result<Self> {
    self.assert_same_tape(on_true);
    self.assert_same_tape(on_false);
    let value = self.value().choose(&on_true.value(), &on_false.value())?;
    Ok(self.record(
      value,
      Operation::Choose {
        trigger: self.id,
        on_true: on_true.id,
        on_false: on_false.id,
      },
    ))
  }

  /// Adjoints of every ancestor of this node, seeded with all ones.
  pub fn gradient(&self) -> Result<Gradient> {
    let seed = match self.value().size() {
      Some(paths) => RandomVariable::ones(paths),
      None => RandomVariable::scalar(1.0),
    };
    gradient::propagate(&self.tape, self.id, seed)
  }

  /// Adjoints of every ancestor of this node under a caller-provided seed.
  pub fn gradient_with_seed(&self, seed: RandomVariable) -> Result<Gradient> {
    if let (Some(out), Some(given)) = (self.value().size(), seed.size()) {
      if out != given {
        return Err(SensitivityError::ShapeMismatch {
          left: out,
          right: given,
        });
      }
    }
    gradient::propagate(&self.tape, self.id, seed)
  }
}
