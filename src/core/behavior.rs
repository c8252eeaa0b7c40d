//! Runtime behaviour attached to Real nodes.
//!
//! Each activation of a Real node owns one [`StateBehavior`] instance. The
//! engine guarantees the call order `set_up`, then any number of `tick`s,
//! then exactly one `tear_down`.

use super::BoxError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Progress reported by a behaviour after each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The state still has work to do.
    Running,
    /// The state finished; its completion handler fires this tick.
    Complete,
}

impl Status {
    pub fn is_complete(self) -> bool {
        matches!(self, Status::Complete)
    }
}

/// Per-activation state of a Real node.
///
/// `set_up` and `tear_down` default to no-ops so simple behaviours only
/// implement `tick`.
///
/// # Example
///
/// ```rust
/// use tickgraph::core::{BoxError, StateBehavior, Status};
///
/// struct Wait {
///     remaining: f32,
/// }
///
/// impl StateBehavior<()> for Wait {
///     fn tick(&mut self, _ctx: &mut (), dt: f32) -> Result<Status, BoxError> {
///         self.remaining -= dt;
///         if self.remaining <= 0.0 {
///             Ok(Status::Complete)
///         } else {
///             Ok(Status::Running)
///         }
///     }
/// }
///
/// let mut wait = Wait { remaining: 0.15 };
/// assert_eq!(wait.tick(&mut (), 0.1).unwrap(), Status::Running);
/// assert_eq!(wait.tick(&mut (), 0.1).unwrap(), Status::Complete);
/// ```
pub trait StateBehavior<C>: Send {
    /// Called once per activation, before the first tick.
    fn set_up(&mut self, ctx: &mut C) -> Result<(), BoxError> {
        let _ = ctx;
        Ok(())
    }

    /// Advance the state by `dt` seconds.
    fn tick(&mut self, ctx: &mut C, dt: f32) -> Result<Status, BoxError>;

    /// Called once when the node is deactivated.
    fn tear_down(&mut self, ctx: &mut C) -> Result<(), BoxError> {
        let _ = ctx;
        Ok(())
    }
}

/// Constructor for the behaviour of a Real node.
///
/// Stored in the shared graph; each engine calls it to obtain its own
/// instance, so no per-run state ever lives on the graph.
pub type BehaviorFactory<C> = Arc<dyn Fn() -> Box<dyn StateBehavior<C>> + Send + Sync>;

/// Behaviour that never completes and does nothing.
///
/// Useful for nodes that exist only to wait for a transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct Idle;

impl<C> StateBehavior<C> for Idle {
    fn tick(&mut self, _ctx: &mut C, _dt: f32) -> Result<Status, BoxError> {
        Ok(Status::Running)
    }
}

/// Behaviour that completes on its first tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct Instant;

impl<C> StateBehavior<C> for Instant {
    fn tick(&mut self, _ctx: &mut C, _dt: f32) -> Result<Status, BoxError> {
        Ok(Status::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
    }

    struct Recorder;

    impl StateBehavior<Log> for Recorder {
        fn set_up(&mut self, ctx: &mut Log) -> Result<(), BoxError> {
            ctx.calls.push("set_up");
            Ok(())
        }

        fn tick(&mut self, ctx: &mut Log, _dt: f32) -> Result<Status, BoxError> {
            ctx.calls.push("tick");
            Ok(Status::Running)
        }

        fn tear_down(&mut self, ctx: &mut Log) -> Result<(), BoxError> {
            ctx.calls.push("tear_down");
            Ok(())
        }
    }

    #[test]
    fn status_reports_completion() {
        assert!(Status::Complete.is_complete());
        assert!(!Status::Running.is_complete());
    }

    #[test]
    fn default_hooks_are_noops() {
        let mut idle = Idle;
        let mut ctx = Log::default();

        StateBehavior::<Log>::set_up(&mut idle, &mut ctx).unwrap();
        assert_eq!(idle.tick(&mut ctx, 0.5).unwrap(), Status::Running);
        StateBehavior::<Log>::tear_down(&mut idle, &mut ctx).unwrap();

        assert!(ctx.calls.is_empty());
    }

    #[test]
    fn instant_completes_immediately() {
        let mut instant = Instant;
        assert_eq!(instant.tick(&mut (), 0.0).unwrap(), Status::Complete);
    }

    #[test]
    fn factory_builds_independent_instances() {
        let factory: BehaviorFactory<Log> = Arc::new(|| Box::new(Recorder));
        let mut ctx = Log::default();

        let mut first = factory();
        let mut second = factory();
        first.set_up(&mut ctx).unwrap();
        second.tick(&mut ctx, 0.1).unwrap();
        first.tear_down(&mut ctx).unwrap();

        assert_eq!(ctx.calls, vec!["set_up", "tick", "tear_down"]);
    }

    #[test]
    fn status_serializes_correctly() {
        let json = serde_json::to_string(&Status::Complete).unwrap();
        let status: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(status, Status::Complete);
    }
}
