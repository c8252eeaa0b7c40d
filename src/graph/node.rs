//! Graph vertices.

use super::transition::Transition;
use crate::core::{BehaviorFactory, CompletionHandler, StateBehavior};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identifier of a node, unique within its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// Identity of a graph instance.
///
/// Nodes refer back to their graph through this id instead of a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(Uuid);

impl GraphId {
    pub fn new() -> Self {
        GraphId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        GraphId(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind tag of a node, without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Real,
    Hub,
    Exit,
    Common,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KindTag::Real => "Real",
            KindTag::Hub => "Hub",
            KindTag::Exit => "Exit",
            KindTag::Common => "Common",
        };
        f.write_str(name)
    }
}

/// Payload of a Real node: how to build its behaviour and what to run when
/// that behaviour completes.
pub struct RealNode<C> {
    behavior: BehaviorFactory<C>,
    on_complete: Option<CompletionHandler<C>>,
}

impl<C> RealNode<C> {
    pub fn new(behavior: BehaviorFactory<C>) -> Self {
        Self {
            behavior,
            on_complete: None,
        }
    }

    pub fn with_completion(mut self, handler: CompletionHandler<C>) -> Self {
        self.on_complete = Some(handler);
        self
    }

    /// Build a fresh behaviour instance.
    pub fn instantiate(&self) -> Box<dyn StateBehavior<C>> {
        (self.behavior)()
    }

    pub fn completion_handler(&self) -> Option<&CompletionHandler<C>> {
        self.on_complete.as_ref()
    }
}

impl<C> Clone for RealNode<C> {
    fn clone(&self) -> Self {
        Self {
            behavior: Arc::clone(&self.behavior),
            on_complete: self.on_complete.clone(),
        }
    }
}

/// Node kind with its kind-specific payload.
pub enum NodeKind<C> {
    /// Runs a behaviour while active.
    Real(RealNode<C>),
    /// Pass-through: its transitions are followed in the same tick it is entered.
    Hub,
    /// Terminal: entering it ends the run.
    Exit,
    /// Its transitions are polled every tick, before the active node's.
    Common,
}

impl<C> NodeKind<C> {
    pub fn tag(&self) -> KindTag {
        match self {
            NodeKind::Real(_) => KindTag::Real,
            NodeKind::Hub => KindTag::Hub,
            NodeKind::Exit => KindTag::Exit,
            NodeKind::Common => KindTag::Common,
        }
    }
}

impl<C> Clone for NodeKind<C> {
    fn clone(&self) -> Self {
        match self {
            NodeKind::Real(real) => NodeKind::Real(real.clone()),
            NodeKind::Hub => NodeKind::Hub,
            NodeKind::Exit => NodeKind::Exit,
            NodeKind::Common => NodeKind::Common,
        }
    }
}

/// A vertex of the graph.
///
/// Transitions are kept in priority order: the first one whose condition
/// holds is the one taken.
pub struct Node<C> {
    id: NodeId,
    name: String,
    position: [f32; 2],
    kind: NodeKind<C>,
    transitions: Vec<Transition<C>>,
    pub(crate) owner: Option<GraphId>,
}

impl<C> Node<C> {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind<C>) -> Self {
        Self {
            id,
            name: name.into(),
            position: [0.0, 0.0],
            kind,
            transitions: Vec::new(),
            owner: None,
        }
    }

    /// Real node running behaviours built by `factory`.
    pub fn real<F>(id: NodeId, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn StateBehavior<C>> + Send + Sync + 'static,
    {
        Self::new(id, name, NodeKind::Real(RealNode::new(Arc::new(factory))))
    }

    pub fn hub(id: NodeId, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Hub)
    }

    pub fn exit(id: NodeId, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Exit)
    }

    pub fn common(id: NodeId, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Common)
    }

    /// Set the authoring position. Has no effect on traversal.
    pub fn at(mut self, position: [f32; 2]) -> Self {
        self.position = position;
        self
    }

    /// Attach a completion handler. Ignored on non-Real nodes.
    pub fn on_complete(mut self, handler: CompletionHandler<C>) -> Self {
        self.set_completion(handler);
        self
    }

    pub(crate) fn set_position(&mut self, position: [f32; 2]) {
        self.position = position;
    }

    /// Returns false when the node is not Real and the handler was dropped.
    pub(crate) fn set_completion(&mut self, handler: CompletionHandler<C>) -> bool {
        match &mut self.kind {
            NodeKind::Real(real) => {
                real.on_complete = Some(handler);
                true
            }
            _ => false,
        }
    }

    /// Append a transition with the next lowest priority.
    pub fn with_transition(mut self, transition: Transition<C>) -> Self {
        self.push_transition(transition);
        self
    }

    pub(crate) fn push_transition(&mut self, mut transition: Transition<C>) {
        transition.priority = self.transitions.len();
        self.transitions.push(transition);
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn kind(&self) -> &NodeKind<C> {
        &self.kind
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn transitions(&self) -> &[Transition<C>] {
        &self.transitions
    }

    /// Id of the graph this node belongs to, once it has been added to one.
    pub fn owner(&self) -> Option<GraphId> {
        self.owner
    }

    pub fn as_real(&self) -> Option<&RealNode<C>> {
        match &self.kind {
            NodeKind::Real(real) => Some(real),
            _ => None,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self.kind, NodeKind::Real(_))
    }

    pub fn is_hub(&self) -> bool {
        matches!(self.kind, NodeKind::Hub)
    }
}

impl<C> Clone for Node<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            kind: self.kind.clone(),
            transitions: self.transitions.clone(),
            owner: self.owner,
        }
    }
}

impl<C> fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.tag())
            .field("transitions", &self.transitions)
            .finish()
    }
}
