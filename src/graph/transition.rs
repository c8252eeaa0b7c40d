//! Conditioned edges between nodes.

use super::node::NodeId;
use crate::core::{BoxError, Condition};
use std::fmt;

/// A directed edge out of a node.
///
/// A transition with no condition always fires; a transition with no target
/// ends the run when it fires.
pub struct Transition<C> {
    pub(crate) priority: usize,
    condition: Option<Condition<C>>,
    target: Option<NodeId>,
}

impl<C> Transition<C> {
    /// Unconditional edge toward `target`.
    pub fn to(target: NodeId) -> Self {
        Self {
            priority: 0,
            condition: None,
            target: Some(target),
        }
    }

    /// Unconditional edge that ends the run.
    pub fn terminal() -> Self {
        Self {
            priority: 0,
            condition: None,
            target: None,
        }
    }

    /// Edge with an explicit, possibly absent, target.
    pub fn with_target(target: Option<NodeId>) -> Self {
        Self {
            priority: 0,
            condition: None,
            target,
        }
    }

    /// Gate the edge on a condition.
    pub fn when(mut self, condition: Condition<C>) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Position of this edge among its node's transitions; lower fires first.
    pub fn priority(&self) -> usize {
        self.priority
    }

    pub fn condition(&self) -> Option<&Condition<C>> {
        self.condition.as_ref()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Whether this edge fires for the given context.
    ///
    /// An absent condition is always satisfied.
    pub fn is_satisfied(&self, ctx: &mut C) -> Result<bool, BoxError> {
        match &self.condition {
            Some(condition) => condition.evaluate(ctx),
            None => Ok(true),
        }
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            condition: self.condition.clone(),
            target: self.target,
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("priority", &self.priority)
            .field("condition", &self.condition)
            .field("target", &self.target)
            .finish()
    }
}

/// Return the first transition in `transitions` that fires for `ctx`.
///
/// Evaluation stops at the first satisfied edge, so later conditions are not
/// run at all. The first error raised by a condition aborts the scan.
pub fn first_satisfied<'t, C>(
    transitions: &'t [Transition<C>],
    ctx: &mut C,
) -> Result<Option<&'t Transition<C>>, (usize, BoxError)> {
    for transition in transitions {
        match transition.is_satisfied(ctx) {
            Ok(true) => return Ok(Some(transition)),
            Ok(false) => {}
            Err(err) => return Err((transition.priority, err)),
        }
    }
    Ok(None)
}
