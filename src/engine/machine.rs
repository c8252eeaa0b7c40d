//! The runtime walker that ticks a graph.

use crate::core::{PermanentState, StateBehavior};
use crate::engine::config::{BehaviorPolicy, EngineConfig};
use crate::engine::error::{EngineError, Phase};
use crate::engine::history::{NodeTransition, RunHistory, TransitionSource};
use crate::engine::traversal::{self, Destination};
use crate::graph::{Graph, Node, NodeId, RealNode};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle status of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Never played, or stopped by the host.
    Idle,
    /// A run is in progress.
    Running,
    /// The last run reached an exit, a terminal edge, or a fatal error.
    Stopped,
}

/// Summary handed to the run-complete listener.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// The Real node that was active when the run ended
    pub last_node: NodeId,
    /// The Exit node entered, if the run ended through one
    pub exit_node: Option<NodeId>,
    /// Ticks processed during the run, including the final one
    pub ticks: u64,
}

/// What a call to [`StateMachine::tick`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// No run in progress; nothing happened.
    Inactive,
    /// No transition fired; `node` is still active.
    Stayed { node: NodeId },
    /// A transition fired and `to` is now active.
    Moved { from: NodeId, to: NodeId },
    /// The run ended during this tick.
    Finished(RunSummary),
}

type RunListener = Box<dyn FnMut(&RunSummary) + Send>;

struct Run<C> {
    id: Uuid,
    context: C,
    active: NodeId,
    behavior: Box<dyn StateBehavior<C>>,
    ticks: u64,
}

fn obtain<C>(
    cache: &mut HashMap<NodeId, Box<dyn StateBehavior<C>>>,
    policy: BehaviorPolicy,
    id: NodeId,
    node: &RealNode<C>,
) -> Box<dyn StateBehavior<C>> {
    match policy {
        BehaviorPolicy::Fresh => node.instantiate(),
        BehaviorPolicy::Cached => cache.remove(&id).unwrap_or_else(|| node.instantiate()),
    }
}

fn release<C>(
    cache: &mut HashMap<NodeId, Box<dyn StateBehavior<C>>>,
    policy: BehaviorPolicy,
    id: NodeId,
    behavior: Box<dyn StateBehavior<C>>,
) {
    if policy == BehaviorPolicy::Cached {
        cache.insert(id, behavior);
    }
}

/// Walks a [`Graph`] once per tick.
///
/// The engine owns everything that changes at runtime: the shared context,
/// the active behaviour, and its history. The graph itself is only read, so
/// many engines can run one `Arc<Graph>` side by side.
///
/// # Example
///
/// ```rust
/// use tickgraph::builder::{GraphBuilder, TransitionBuilder};
/// use tickgraph::core::{Idle, PermanentState};
/// use tickgraph::engine::{RunStatus, StateMachine, TickOutcome};
///
/// struct Ctx {
///     flag: bool,
/// }
///
/// impl PermanentState for Ctx {
///     type Owner = ();
///     fn create(_: &()) -> Self {
///         Ctx { flag: false }
///     }
/// }
///
/// let mut builder = GraphBuilder::<Ctx>::new();
/// let wait = builder.add_real("wait", || Idle);
/// let exit = builder.add_exit("exit");
/// builder
///     .connect(wait, TransitionBuilder::new().to(exit).when(|c: &mut Ctx| c.flag))
///     .unwrap();
///
/// let mut engine = StateMachine::new(builder.build().unwrap());
/// engine.set_up(());
/// engine.play().unwrap();
///
/// assert_eq!(engine.tick(0.1).unwrap(), TickOutcome::Stayed { node: wait });
///
/// engine.context_mut().unwrap().flag = true;
/// assert!(matches!(engine.tick(0.1).unwrap(), TickOutcome::Finished(_)));
/// assert_eq!(engine.status(), RunStatus::Stopped);
/// ```
pub struct StateMachine<C: PermanentState> {
    graph: Arc<Graph<C>>,
    config: EngineConfig,
    owner: Option<C::Owner>,
    status: RunStatus,
    run: Option<Run<C>>,
    previous: Option<NodeId>,
    cache: HashMap<NodeId, Box<dyn StateBehavior<C>>>,
    history: RunHistory,
    listener: Option<RunListener>,
}

impl<C: PermanentState> StateMachine<C> {
    /// Create an idle engine over `graph` with the default configuration.
    pub fn new(graph: impl Into<Arc<Graph<C>>>) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    pub fn with_config(graph: impl Into<Arc<Graph<C>>>, config: EngineConfig) -> Self {
        let history = RunHistory::new(config.history_limit);
        Self {
            graph: graph.into(),
            config,
            owner: None,
            status: RunStatus::Idle,
            run: None,
            previous: None,
            cache: HashMap::new(),
            history,
            listener: None,
        }
    }

    /// Bind the host handle every run's context is built from.
    pub fn set_up(&mut self, owner: C::Owner) {
        self.owner = Some(owner);
    }

    /// Register a callback fired whenever a run reaches its end on its own.
    ///
    /// Not fired by [`stop`](Self::stop).
    pub fn on_run_complete<F>(&mut self, listener: F)
    where
        F: FnMut(&RunSummary) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Start a run at the root node.
    ///
    /// Creates a fresh context and sets up the root's behaviour. On failure
    /// the engine keeps its previous status.
    pub fn play(&mut self) -> Result<(), EngineError> {
        if self.status == RunStatus::Running {
            return Err(EngineError::AlreadyRunning);
        }
        let owner = self.owner.as_ref().ok_or(EngineError::Unbound)?;
        let mut context = C::create(owner);

        let graph = Arc::clone(&self.graph);
        if self.config.warn_on_unreachable {
            for id in graph.unreachable_nodes() {
                warn!(graph = %graph.id(), node = %id, "node is unreachable and will never run");
            }
        }

        let root = graph.root_node();
        let real = root
            .as_real()
            .ok_or(EngineError::NotActivatable { node: root.id() })?;
        let mut behavior = obtain(&mut self.cache, self.config.behavior_policy, root.id(), real);
        behavior
            .set_up(&mut context)
            .map_err(|source| EngineError::StartFailed {
                node: root.id(),
                source,
            })?;

        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, graph = %graph.id(), root = %root.id(), "run started");
        self.history.clear();
        self.previous = None;
        self.run = Some(Run {
            id: run_id,
            context,
            active: root.id(),
            behavior,
            ticks: 0,
        });
        self.status = RunStatus::Running;
        Ok(())
    }

    /// Stop the current run, tearing down the active behaviour.
    ///
    /// Always leaves the engine Idle with the context released. Calling it
    /// again, or without a run, does nothing.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.status = RunStatus::Idle;
        let Some(mut run) = self.run.take() else {
            return Ok(());
        };

        let result = run.behavior.tear_down(&mut run.context);
        self.previous = Some(run.active);
        self.cache.clear();
        info!(run_id = %run.id, node = %run.active, ticks = run.ticks, "run stopped");

        result.map_err(|source| EngineError::Behavior {
            node: run.active,
            phase: Phase::TearDown,
            source,
        })
    }

    /// Same as [`tick`](Self::tick).
    pub fn refresh(&mut self, dt: f32) -> Result<TickOutcome, EngineError> {
        self.tick(dt)
    }

    /// Advance the run by `dt` seconds.
    ///
    /// Ticks the active behaviour, fires its completion handler if it
    /// reports Complete, then evaluates the Common node's transitions and the
    /// active node's own, first match wins, following hubs within this same
    /// call.
    ///
    /// Errors from conditions, handlers, and the behaviour's `tick` leave the
    /// active node unchanged. A hub cycle, or a failure while tearing down or
    /// setting up a behaviour, ends the run.
    pub fn tick(&mut self, dt: f32) -> Result<TickOutcome, EngineError> {
        let graph = Arc::clone(&self.graph);
        let Some(run) = self.run.as_mut() else {
            return Ok(TickOutcome::Inactive);
        };
        run.ticks += 1;
        let active = run.active;
        let node = graph
            .get_node(active)
            .ok_or(EngineError::NotActivatable { node: active })?;

        let status = run
            .behavior
            .tick(&mut run.context, dt)
            .map_err(|source| EngineError::Behavior {
                node: active,
                phase: Phase::Tick,
                source,
            })?;

        if status.is_complete() {
            debug!(run_id = %run.id, node = %active, "state complete");
            if let Some(handler) = node.as_real().and_then(RealNode::completion_handler) {
                handler
                    .invoke(&mut run.context)
                    .map_err(|source| EngineError::Handler {
                        node: active,
                        source,
                    })?;
            }
        }

        let Some(selection) = traversal::select(&graph, active, &mut run.context)? else {
            return Ok(TickOutcome::Stayed { node: active });
        };

        match traversal::resolve(&graph, selection, &mut run.context) {
            Ok(Destination::Stay) => Ok(TickOutcome::Stayed { node: active }),
            Ok(Destination::Enter { node, via, source }) => self.enter(&graph, node, via, source),
            Ok(Destination::Finish { exit, via, source }) => self.finish(exit, via, source),
            Err(err @ EngineError::GraphCycle { .. }) => {
                warn!(node = %active, error = %err, "hub cycle detected, stopping run");
                self.halt();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn enter(
        &mut self,
        graph: &Graph<C>,
        target: NodeId,
        via: Vec<NodeId>,
        source: TransitionSource,
    ) -> Result<TickOutcome, EngineError> {
        let policy = self.config.behavior_policy;
        let Some(run) = self.run.as_mut() else {
            return Ok(TickOutcome::Inactive);
        };
        let from = run.active;
        let real = graph
            .get_node(target)
            .and_then(Node::as_real)
            .ok_or(EngineError::NotActivatable { node: target })?;

        if let Err(source) = run.behavior.tear_down(&mut run.context) {
            self.abandon();
            return Err(EngineError::Behavior {
                node: from,
                phase: Phase::TearDown,
                source,
            });
        }

        let mut next = obtain(&mut self.cache, policy, target, real);
        if let Err(source) = next.set_up(&mut run.context) {
            self.abandon();
            return Err(EngineError::Behavior {
                node: target,
                phase: Phase::SetUp,
                source,
            });
        }

        let old = std::mem::replace(&mut run.behavior, next);
        release(&mut self.cache, policy, from, old);
        run.active = target;
        debug!(run_id = %run.id, from = %from, to = %target, hubs = via.len(), "transitioned");

        self.previous = Some(from);
        self.history.record(NodeTransition {
            from,
            to: Some(target),
            via,
            source,
            timestamp: Utc::now(),
        });
        Ok(TickOutcome::Moved { from, to: target })
    }

    fn finish(
        &mut self,
        exit: Option<NodeId>,
        via: Vec<NodeId>,
        source: TransitionSource,
    ) -> Result<TickOutcome, EngineError> {
        let Some(mut run) = self.run.take() else {
            return Ok(TickOutcome::Inactive);
        };
        let result = run.behavior.tear_down(&mut run.context);
        self.status = RunStatus::Stopped;
        self.previous = Some(run.active);
        self.cache.clear();
        self.history.record(NodeTransition {
            from: run.active,
            to: None,
            via,
            source,
            timestamp: Utc::now(),
        });

        result.map_err(|source| EngineError::Behavior {
            node: run.active,
            phase: Phase::TearDown,
            source,
        })?;

        let summary = RunSummary {
            run_id: run.id,
            last_node: run.active,
            exit_node: exit,
            ticks: run.ticks,
        };
        info!(run_id = %run.id, node = %run.active, ticks = run.ticks, "run finished");
        if let Some(listener) = self.listener.as_mut() {
            listener(&summary);
        }
        Ok(TickOutcome::Finished(summary))
    }

    /// End the run after a fatal traversal error, tearing down the active
    /// behaviour.
    fn halt(&mut self) {
        if let Some(mut run) = self.run.take() {
            if let Err(err) = run.behavior.tear_down(&mut run.context) {
                warn!(node = %run.active, error = %err, "tear_down failed while halting run");
            }
            self.previous = Some(run.active);
        }
        self.cache.clear();
        self.status = RunStatus::Stopped;
    }

    /// End the run without further lifecycle calls.
    fn abandon(&mut self) {
        if let Some(run) = self.run.take() {
            warn!(run_id = %run.id, node = %run.active, "run abandoned after lifecycle failure");
            self.previous = Some(run.active);
        }
        self.cache.clear();
        self.status = RunStatus::Stopped;
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// The Real node currently active. Never a Hub.
    pub fn active_node(&self) -> Option<NodeId> {
        self.run.as_ref().map(|run| run.active)
    }

    pub fn active_node_name(&self) -> Option<&str> {
        let id = self.active_node()?;
        self.graph.get_node(id).map(Node::name)
    }

    /// The node that was active before the current one, or the last active
    /// node of a run that has ended.
    pub fn previous_node(&self) -> Option<NodeId> {
        self.previous
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run.as_ref().map(|run| run.id)
    }

    pub fn ticks(&self) -> u64 {
        self.run.as_ref().map_or(0, |run| run.ticks)
    }

    /// Moves of the current, or most recent, run.
    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn context(&self) -> Option<&C> {
        self.run.as_ref().map(|run| &run.context)
    }

    /// Mutable access to the shared context between ticks.
    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.run.as_mut().map(|run| &mut run.context)
    }

    pub fn graph(&self) -> &Arc<Graph<C>> {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
