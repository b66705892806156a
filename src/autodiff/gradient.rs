//! # Gradient
//!
//! $$
//! \bar u \mathrel{+}= \frac{\partial v}{\partial u}\,\bar v
//! $$
//!
//! Reverse sweep over the recorded graph. Nodes are visited in descending
//! id order; since operands always precede their results on the tape, every
//! node is visited after all of its consumers have contributed, which is the
//! standard reverse-mode accumulation order.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::autodiff::dirac;
use crate::autodiff::tape::NodeId;
use crate::autodiff::tape::Operation;
use crate::autodiff::tape::Tape;
use crate::error::Result;
use crate::random_variable::RandomVariable;

/// Accumulated adjoints keyed by node id.
pub struct Gradient {
  adjoints: HashMap<NodeId, RandomVariable>,
}

impl Gradient {
  /// Adjoint of a node. A node that never influenced the output has zero
  /// sensitivity; asking for it is not an error.
  pub fn adjoint(&self, id: NodeId) -> RandomVariable {
    self
      .adjoints
      .get(&id)
      .cloned()
      .unwrap_or(RandomVariable::Deterministic(0.0))
  }

  pub fn contains(&self, id: NodeId) -> bool {
    self.adjoints.contains_key(&id)
  }

  pub fn len(&self) -> usize {
    self.adjoints.len()
  }

  pub fn is_empty(&self) -> bool {
    self.adjoints.is_empty()
  }
}

pub(crate) fn propagate(tape: &Rc<Tape>, output: NodeId, seed: RandomVariable) -> Result<Gradient> {
  debug!(nodes = output.index() + 1, "running reverse sweep");

  let mut adjoints: HashMap<NodeId, RandomVariable> = HashMap::new();
  adjoints.insert(output, seed);

  for index in (0..=output.index()).rev() {
    let id = NodeId::new(index);
    let Some(adjoint) = adjoints.get(&id).cloned() else {
      continue;
    };

    match tape.operation(id) {
      Operation::Variable | Operation::Constant => {}
      Operation::Add(left, right) => {
        accumulate(&mut adjoints, left, adjoint.clone())?;
        accumulate(&mut adjoints, right, adjoint)?;
      }
      Operation::Sub(left, right) => {
        accumulate(&mut adjoints, left, adjoint.clone())?;
        accumulate(&mut adjoints, right, adjoint.scale(-1.0))?;
      }
      Operation::Mult(left, right) => {
        accumulate(&mut adjoints, left, adjoint.mult(&tape.value(right))?)?;
        accumulate(&mut adjoints, right, adjoint.mult(&tape.value(left))?)?;
      }
      Operation::Div(numerator, denominator) => {
        let denominator_value = tape.value(denominator);
        accumulate(&mut adjoints, numerator, adjoint.div(&denominator_value)?)?;
        let quotient = adjoint
          .mult(&tape.value(numerator))?
          .div(&denominator_value.squared())?
          .scale(-1.0);
        accumulate(&mut adjoints, denominator, quotient)?;
      }
      Operation::Pow(base, exponent) => {
        if exponent != 0 {
          let partial = tape.value(base).pow(exponent - 1).scale(f64::from(exponent));
          accumulate(&mut adjoints, base, adjoint.mult(&partial)?)?;
        }
      }
      Operation::Squared(base) => {
        let partial = tape.value(base).scale(2.0);
        accumulate(&mut adjoints, base, adjoint.mult(&partial)?)?;
      }
      Operation::Choose {
        trigger,
        on_true,
        on_false,
      } => {
        let x = tape.value(trigger);

        // the discontinuity: substitute the smoothed Dirac-delta weight
        let weight = dirac::dirac_delta_weight(tape.config(), &x)?;
        accumulate(&mut adjoints, trigger, adjoint.mult(&weight)?)?;

        // the branches follow the ordinary chain rule
        let one = RandomVariable::scalar(1.0);
        let zero = RandomVariable::scalar(0.0);
        let indicator_true = x.choose(&one, &zero)?;
        let indicator_false = x.choose(&zero, &one)?;
        accumulate(&mut adjoints, on_true, adjoint.mult(&indicator_true)?)?;
        accumulate(&mut adjoints, on_false, adjoint.mult(&indicator_false)?)?;
      }
    }
  }

  Ok(Gradient { adjoints })
}

fn accumulate(
  adjoints: &mut HashMap<NodeId, RandomVariable>,
  id: NodeId,
  contribution: RandomVariable,
) -> Result<()> {
  match adjoints.entry(id) {
    Entry::Occupied(mut slot) => {
      let total = slot.get().add(&contribution)?;
      slot.insert(total);
    }
    Entry::Vacant(slot) => {
      slot.insert(contribution);
    }
  }
  Ok(())
}
