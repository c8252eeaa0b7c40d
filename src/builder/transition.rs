//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{BoxError, Condition};
use crate::graph::{NodeId, Transition};

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<C> {
    target: Option<Option<NodeId>>,
    condition: Option<Condition<C>>,
    negate: bool,
}

impl<C> TransitionBuilder<C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            target: None,
            condition: None,
            negate: false,
        }
    }

    /// Set the target node.
    pub fn to(mut self, node: NodeId) -> Self {
        self.target = Some(Some(node));
        self
    }

    /// Make this an edge that ends the run.
    pub fn terminal(mut self) -> Self {
        self.target = Some(None);
        self
    }

    /// Use a prepared condition (optional).
    pub fn condition(mut self, condition: Condition<C>) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Add a condition using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&mut C) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Condition::new(predicate));
        self
    }

    /// Add a fallible condition using a closure (optional).
    pub fn try_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&mut C) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.condition = Some(Condition::try_new(predicate));
        self
    }

    /// Invert the condition. Has no effect on an unconditional edge.
    pub fn negate(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<C>, BuildError> {
        let target = self.target.ok_or(BuildError::MissingTarget)?;
        let transition = Transition::with_target(target);
        let negate = self.negate;

        Ok(match self.condition {
            Some(condition) => {
                let negate = condition.is_negated() != negate;
                transition.when(condition.with_negate(negate))
            }
            None => transition,
        })
    }
}

impl<C> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        hungry: bool,
    }

    #[test]
    fn builder_validates_missing_target() {
        let result = TransitionBuilder::<Ctx>::new().when(|c| c.hungry).build();

        assert!(matches!(result, Err(BuildError::MissingTarget)));
    }

    #[test]
    fn fluent_api_builds_transition() {
        let transition = TransitionBuilder::<Ctx>::new()
            .to(NodeId(3))
            .when(|c| c.hungry)
            .build()
            .unwrap();

        assert_eq!(transition.target(), Some(NodeId(3)));
        assert!(transition.is_satisfied(&mut Ctx { hungry: true }).unwrap());
        assert!(!transition.is_satisfied(&mut Ctx { hungry: false }).unwrap());
    }

    #[test]
    fn negate_inverts_condition() {
        let transition = TransitionBuilder::<Ctx>::new()
            .terminal()
            .when(|c| c.hungry)
            .negate()
            .build()
            .unwrap();

        assert_eq!(transition.target(), None);
        assert!(!transition.is_satisfied(&mut Ctx { hungry: true }).unwrap());
        assert!(transition.is_satisfied(&mut Ctx { hungry: false }).unwrap());
    }

    #[test]
    fn negate_combines_with_prenegated_condition() {
        let transition = TransitionBuilder::<Ctx>::new()
            .to(NodeId(1))
            .condition(Condition::new(|c: &mut Ctx| c.hungry).negated())
            .negate()
            .build()
            .unwrap();

        assert!(transition.is_satisfied(&mut Ctx { hungry: true }).unwrap());
    }

    #[test]
    fn unconditional_transition_ignores_negate() {
        let transition = TransitionBuilder::<Ctx>::new()
            .to(NodeId(2))
            .negate()
            .build()
            .unwrap();

        assert!(transition.condition().is_none());
        assert!(transition.is_satisfied(&mut Ctx { hungry: false }).unwrap());
    }
}
