//! Callback protocols shared by graphs and engines.
//!
//! This module contains the leaf types every other layer builds on:
//! - Conditions gating transitions
//! - Completion handlers fired when a state finishes
//! - The `StateBehavior` trait implemented by Real node states
//! - The `PermanentState` trait for the per-run shared context

mod behavior;
mod condition;
mod context;
mod handler;

pub use behavior::{BehaviorFactory, Idle, Instant, StateBehavior, Status};
pub use condition::Condition;
pub use context::PermanentState;
pub use handler::CompletionHandler;

/// Error type returned by user-supplied conditions, handlers, and behaviours.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
