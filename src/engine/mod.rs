//! Runtime execution of graphs.
//!
//! A [`StateMachine`] holds one run at a time over a shared [`Graph`]:
//!
//! 1. `set_up(owner)` binds the host handle contexts are created from.
//! 2. `play()` creates the context and activates the root.
//! 3. `tick(dt)` advances the active behaviour and follows at most one
//!    transition, passing through any number of hubs.
//! 4. The run ends at an Exit node, a terminal edge, or `stop()`.
//!
//! [`Graph`]: crate::graph::Graph

mod config;
mod error;
mod history;
mod machine;
mod traversal;

pub use config::{BehaviorPolicy, EngineConfig};
pub use error::{EngineError, Phase};
pub use history::{NodeTransition, RunHistory, TransitionSource};
pub use machine::{RunStatus, RunSummary, StateMachine, TickOutcome};
