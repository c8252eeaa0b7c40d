//! Engine errors.

use crate::core::BoxError;
use crate::graph::NodeId;
use thiserror::Error;

/// Errors surfaced by [`StateMachine`](super::StateMachine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Run already in progress; call stop() before play()")]
    AlreadyRunning,

    #[error("No owner bound; call set_up(owner) before play()")]
    Unbound,

    #[error("{node} is not a Real node and cannot be activated")]
    NotActivatable { node: NodeId },

    #[error("Hub chain starting at {start} exceeded {limit} hops in one tick")]
    GraphCycle { start: NodeId, limit: usize },

    #[error("Condition on transition {priority} of {node} failed: {source}")]
    Condition {
        node: NodeId,
        priority: usize,
        #[source]
        source: BoxError,
    },

    #[error("Completion handler of {node} failed: {source}")]
    Handler {
        node: NodeId,
        #[source]
        source: BoxError,
    },

    #[error("Root {node} failed to set up; run not started: {source}")]
    StartFailed {
        node: NodeId,
        #[source]
        source: BoxError,
    },

    #[error("Behaviour of {node} failed during {phase}: {source}")]
    Behavior {
        node: NodeId,
        phase: Phase,
        #[source]
        source: BoxError,
    },
}

impl EngineError {
    /// Whether this error ended the run.
    ///
    /// Cycle errors and failures while switching states stop the engine;
    /// everything else leaves the active node in place.
    pub fn is_fatal(&self) -> bool {
        match self {
            EngineError::GraphCycle { .. } => true,
            EngineError::Behavior { phase, .. } => *phase != Phase::Tick,
            _ => false,
        }
    }
}

/// Lifecycle call that raised a behaviour error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SetUp,
    Tick,
    TearDown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::SetUp => "set_up",
            Phase::Tick => "tick",
            Phase::TearDown => "tear_down",
        };
        f.write_str(name)
    }
}
