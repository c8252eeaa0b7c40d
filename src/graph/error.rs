//! Graph integrity errors.

use super::node::{KindTag, NodeId};
use thiserror::Error;

/// A single structural problem found while validating a graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IntegrityViolation {
    #[error("Graph has no root node")]
    MissingRoot,

    #[error("Root {root} does not refer to a node in this graph")]
    UnknownRoot { root: NodeId },

    #[error("Root {root} is a {kind} node; the root must be a Real node")]
    RootNotReal { root: NodeId, kind: KindTag },

    #[error("Node id {id} is used by more than one node")]
    DuplicateNodeId { id: NodeId },

    #[error("Transition {priority} of {node} targets missing node {target}")]
    DanglingTarget {
        node: NodeId,
        priority: usize,
        target: NodeId,
    },

    #[error("Transition {priority} of {node} targets the Common node {target}")]
    TargetsCommon {
        node: NodeId,
        priority: usize,
        target: NodeId,
    },

    #[error("Exit node {node} has {count} outgoing transition(s)")]
    ExitHasTransitions { node: NodeId, count: usize },

    #[error("Graph has more than one Common node: {first} and {second}")]
    MultipleCommon { first: NodeId, second: NodeId },

    #[error("Id counter {next_id} is not above node id {id}")]
    StaleIdCounter { next_id: u32, id: NodeId },

    #[error("Builder referred to unknown node {node}")]
    UnknownSource { node: NodeId },

    #[error("Completion handler attached to {kind} node {node}; only Real nodes complete")]
    HandlerOnNonReal { node: NodeId, kind: KindTag },
}

/// A graph failed validation and must not be used to start a run.
///
/// Carries every violation found, not just the first.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Graph integrity check failed: {}", render(.violations))]
pub struct GraphIntegrityError {
    pub violations: Vec<IntegrityViolation>,
}

impl GraphIntegrityError {
    pub fn new(violations: Vec<IntegrityViolation>) -> Self {
        Self { violations }
    }

    pub fn single(violation: IntegrityViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn contains(&self, violation: &IntegrityViolation) -> bool {
        self.violations.contains(violation)
    }
}

fn render(violations: &[IntegrityViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
