//! # Tape
//!
//! Append-only arena holding one node per recorded operation. Nodes
//! reference their operands by index; indices increase monotonically and are
//! never reused, so the recording order is a topological order of the
//! operation graph. Nothing is pruned or mutated until the whole tape is
//! dropped at the end of a simulation run.

use std::cell::RefCell;
use std::rc::Rc;

use crate::autodiff::differentiable::Differentiable;
use crate::autodiff::dirac::DiracDeltaConfig;
use crate::random_variable::RandomVariable;

/// Index of a node on its tape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  pub(crate) fn new(index: usize) -> Self {
    Self(index)
  }

  pub fn index(self) -> usize {
    self.0
  }
}

/// Operation that produced a node, carrying exactly the operands it needs.
#[derive(Clone, Debug)]
pub enum Operation {
  /// Differentiable input (a leaf).
  Variable,
  /// Recorded input with no dependence on any variable.
  Constant,
  Add(NodeId, NodeId),
  Sub(NodeId, NodeId),
  Mult(NodeId, NodeId),
  Div(NodeId, NodeId),
  Pow(NodeId, i32),
  Squared(NodeId),
  Choose {
    trigger: NodeId,
    on_true: NodeId,
    on_false: NodeId,
  },
}

struct Node {
  value: RandomVariable,
  operation: Operation,
}

pub struct Tape {
  nodes: RefCell<Vec<Node>>,
  config: DiracDeltaConfig,
}

impl Tape {
  pub fn new() -> Rc<Self> {
    Self::with_config(DiracDeltaConfig::default())
  }

  pub fn with_config(config: DiracDeltaConfig) -> Rc<Self> {
    Rc::new(Self {
      nodes: RefCell::new(Vec::new()),
      config,
    })
  }

  pub fn config(&self) -> &DiracDeltaConfig {
    &self.config
  }

  pub fn len(&self) -> usize {
    self.nodes.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.borrow().is_empty()
  }

  /// Record a differentiable leaf.
  pub fn variable(self: &Rc<Self>, value: RandomVariable) -> Differentiable {
    let id = self.push(value, Operation::Variable);
    Differentiable::from_parts(Rc::clone(self), id)
  }

  /// Record a value that does not depend on any differentiable input.
  pub fn constant(self: &Rc<Self>, value: RandomVariable) -> Differentiable {
    let id = self.push(value, Operation::Constant);
    Differentiable::from_parts(Rc::clone(self), id)
  }

  pub(crate) fn push(&self, value: RandomVariable, operation: Operation) -> NodeId {
    let mut nodes = self.nodes.borrow_mut();
    let id = NodeId::new(nodes.len());
    nodes.push(Node { value, operation });
    id
  }

  pub(crate) fn value(&self, id: NodeId) -> RandomVariable {
    self.nodes.borrow()[id.index()].value.clone()
  }

  pub(crate) fn operation(&self, id: NodeId) -> Operation {
    self.nodes.borrow()[id.index()].operation.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn node_ids_increase_monotonically() {
    let tape = Tape::new();
    assert!(tape.is_empty());

    let a = tape.variable(RandomVariable::scalar(1.0));
    let b = tape.constant(RandomVariable::scalar(2.0));
    let c = a.add(&b).unwrap();

    assert_eq!(a.id().index(), 0);
    assert_eq!(b.id().index(), 1);
    assert_eq!(c.id().index(), 2);
    assert_eq!(tape.len(), 3);
  }

  #[test]
  fn recorded_values_are_immutable() {
    let tape = Tape::new();
    let a = tape.variable(RandomVariable::from_vec(vec![1.0, 2.0]));
    let _ = a.shift(5.0);

    // the original node keeps its primal regardless of later operations
    assert_eq!(a.value(), RandomVariable::from_vec(vec![1.0, 2.0]));
  }
}
