//! Tickgraph: a tick-driven graph state machine
//!
//! A graph of nodes is authored once, validated once, and then walked by a
//! [`StateMachine`] that the host ticks every frame. Each tick runs the
//! active state's behaviour and follows at most one transition.
//!
//! # Core Concepts
//!
//! - **Real nodes** run a [`StateBehavior`](core::StateBehavior) while active
//! - **Hub nodes** are routing points crossed within a single tick
//! - **Exit nodes** end the run
//! - **The Common node** holds transitions polled every tick, before the
//!   active node's own
//! - **Conditions** gate transitions and may be negated
//!
//! # Example
//!
//! ```rust
//! use tickgraph::builder::{GraphBuilder, TransitionBuilder};
//! use tickgraph::core::{BoxError, PermanentState, StateBehavior, Status};
//! use tickgraph::engine::{RunStatus, StateMachine, TickOutcome};
//!
//! struct Sentry {
//!     noise: f32,
//! }
//!
//! impl PermanentState for Sentry {
//!     type Owner = f32;
//!
//!     fn create(start_noise: &f32) -> Self {
//!         Sentry { noise: *start_noise }
//!     }
//! }
//!
//! struct Listen;
//!
//! impl StateBehavior<Sentry> for Listen {
//!     fn tick(&mut self, ctx: &mut Sentry, dt: f32) -> Result<Status, BoxError> {
//!         ctx.noise += dt;
//!         Ok(Status::Running)
//!     }
//! }
//!
//! let mut builder = GraphBuilder::<Sentry>::new();
//! let listen = builder.add_real("listen", || Listen);
//! let alarm = builder.add_exit("alarm");
//! builder
//!     .connect(listen, TransitionBuilder::new().to(alarm).when(|g: &mut Sentry| g.noise > 1.0))
//!     .unwrap();
//!
//! let mut engine = StateMachine::new(builder.build().unwrap());
//! engine.set_up(0.5);
//! engine.play().unwrap();
//!
//! assert_eq!(engine.tick(0.25).unwrap(), TickOutcome::Stayed { node: listen });
//! assert!(matches!(engine.tick(0.5).unwrap(), TickOutcome::Finished(_)));
//! assert_eq!(engine.status(), RunStatus::Stopped);
//! ```

pub mod asset;
pub mod builder;
pub mod core;
pub mod engine;
pub mod graph;

// Re-export commonly used types
pub use asset::{GraphAsset, Registry};
pub use builder::{GraphBuilder, TransitionBuilder};
pub use core::{CompletionHandler, Condition, PermanentState, StateBehavior, Status};
pub use engine::{EngineConfig, EngineError, RunStatus, StateMachine, TickOutcome};
pub use graph::{Graph, Node, NodeId, NodeKind};
