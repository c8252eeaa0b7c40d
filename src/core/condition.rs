//! Conditions that gate transitions.
//!
//! A condition is a boolean predicate over the shared run context with an
//! optional negation flag. Conditions are stored in the immutable graph and
//! shared by every engine running it, so the predicate must be `Send + Sync`.

use super::BoxError;
use std::fmt;
use std::sync::Arc;

type Predicate<C> = Arc<dyn Fn(&mut C) -> Result<bool, BoxError> + Send + Sync>;

/// Predicate over the shared context that decides whether a transition fires.
///
/// The effective value of a condition is the predicate's result, inverted when
/// the condition is negated.
///
/// # Example
///
/// ```rust
/// use tickgraph::core::Condition;
///
/// struct Blackboard {
///     alerted: bool,
/// }
///
/// let alerted = Condition::new(|ctx: &mut Blackboard| ctx.alerted);
/// let calm = alerted.clone().negated();
///
/// let mut ctx = Blackboard { alerted: false };
/// assert!(!alerted.evaluate(&mut ctx).unwrap());
/// assert!(calm.evaluate(&mut ctx).unwrap());
/// ```
pub struct Condition<C> {
    predicate: Predicate<C>,
    negate: bool,
    label: Option<String>,
}

impl<C> Condition<C> {
    /// Create a condition from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&mut C) -> bool + Send + Sync + 'static,
    {
        Self::try_new(move |ctx: &mut C| Ok(predicate(ctx)))
    }

    /// Create a condition from a predicate that may fail.
    ///
    /// Errors are not swallowed: they abort the tick that evaluated them.
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&mut C) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Condition {
            predicate: Arc::new(predicate),
            negate: false,
            label: None,
        }
    }

    /// Flip the negation flag.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Set the negation flag explicitly.
    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Attach a diagnostic label, usually the registry key.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Evaluate the condition against the context, honoring negation.
    pub fn evaluate(&self, ctx: &mut C) -> Result<bool, BoxError> {
        let raw = (self.predicate)(ctx)?;
        Ok(raw != self.negate)
    }
}

impl<C> Clone for Condition<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            negate: self.negate,
            label: self.label.clone(),
        }
    }
}

impl<C> fmt::Debug for Condition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("label", &self.label)
            .field("negate", &self.negate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        value: i32,
        evaluations: usize,
    }

    fn ctx(value: i32) -> Ctx {
        Ctx {
            value,
            evaluations: 0,
        }
    }

    #[test]
    fn condition_reports_predicate_result() {
        let positive = Condition::new(|c: &mut Ctx| c.value > 0);

        assert!(positive.evaluate(&mut ctx(3)).unwrap());
        assert!(!positive.evaluate(&mut ctx(-1)).unwrap());
    }

    #[test]
    fn negation_inverts_result() {
        let positive = Condition::new(|c: &mut Ctx| c.value > 0).negated();

        assert!(positive.is_negated());
        assert!(!positive.evaluate(&mut ctx(3)).unwrap());
        assert!(positive.evaluate(&mut ctx(-1)).unwrap());
    }

    #[test]
    fn double_negation_restores_original() {
        let cond = Condition::new(|c: &mut Ctx| c.value == 7)
            .negated()
            .negated();

        assert!(!cond.is_negated());
        assert!(cond.evaluate(&mut ctx(7)).unwrap());
    }

    #[test]
    fn condition_may_write_context() {
        let counting = Condition::new(|c: &mut Ctx| {
            c.evaluations += 1;
            false
        });

        let mut c = ctx(0);
        counting.evaluate(&mut c).unwrap();
        counting.evaluate(&mut c).unwrap();

        assert_eq!(c.evaluations, 2);
    }

    #[test]
    fn failing_predicate_propagates_error() {
        let broken = Condition::try_new(|_: &mut Ctx| Err("sensor offline".into())).negated();

        let err = broken.evaluate(&mut ctx(0)).unwrap_err();
        assert_eq!(err.to_string(), "sensor offline");
    }

    #[test]
    fn clones_share_predicate_and_keep_label() {
        let cond = Condition::new(|c: &mut Ctx| c.value > 10).labeled("far_away");
        let copy = cond.clone();

        assert_eq!(copy.label(), Some("far_away"));
        assert_eq!(
            cond.evaluate(&mut ctx(11)).unwrap(),
            copy.evaluate(&mut ctx(11)).unwrap()
        );
    }
}
