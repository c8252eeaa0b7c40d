//! Builder API for authoring graphs.
//!
//! This module provides fluent builders for creating graphs in code. Graphs
//! loaded from data go through [`crate::asset`] instead; both end in the same
//! validation.

pub mod error;
pub mod graph;
pub mod transition;

pub use error::BuildError;
pub use graph::GraphBuilder;
pub use transition::TransitionBuilder;

use crate::graph::{NodeId, Transition};

/// Create an unconditional transition toward `target`.
///
/// # Example
///
/// ```
/// use tickgraph::builder::{goto, GraphBuilder};
/// use tickgraph::core::Instant;
///
/// let mut builder = GraphBuilder::<()>::new();
/// let start = builder.add_real("start", || Instant);
/// let end = builder.add_exit("end");
/// builder.add_transition(start, goto(end));
///
/// assert!(builder.build().is_ok());
/// ```
pub fn goto<C>(target: NodeId) -> Transition<C> {
    Transition::to(target)
}

/// Create a transition toward `target` gated by a predicate.
///
/// # Example
///
/// ```
/// use tickgraph::builder::{goto_when, GraphBuilder};
/// use tickgraph::core::Idle;
///
/// struct Ctx {
///     spotted: bool,
/// }
///
/// let mut builder = GraphBuilder::<Ctx>::new();
/// let patrol = builder.add_real("patrol", || Idle);
/// let chase = builder.add_real("chase", || Idle);
/// builder.add_transition(patrol, goto_when(chase, |c: &mut Ctx| c.spotted));
///
/// assert!(builder.build().is_ok());
/// ```
pub fn goto_when<C, F>(target: NodeId, predicate: F) -> Transition<C>
where
    F: Fn(&mut C) -> bool + Send + Sync + 'static,
{
    Transition::to(target).when(crate::core::Condition::new(predicate))
}

/// Create an unconditional transition that ends the run.
pub fn finish<C>() -> Transition<C> {
    Transition::terminal()
}
