//! Builder for constructing graphs.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{CompletionHandler, StateBehavior};
use crate::graph::{Graph, GraphId, GraphIntegrityError, IntegrityViolation, Node, NodeId, Transition};

/// Builder for assembling a [`Graph`] node by node.
///
/// Node ids come from a counter that only ever increases. The first Real
/// node added becomes the root unless [`set_root`](Self::set_root) says
/// otherwise. Structural problems are collected and reported together by
/// [`build`](Self::build).
pub struct GraphBuilder<C> {
    id: GraphId,
    nodes: Vec<Node<C>>,
    root: Option<NodeId>,
    next_id: u32,
    violations: Vec<IntegrityViolation>,
}

impl<C: 'static> GraphBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::with_id(GraphId::new())
    }

    /// Create a builder for a graph with a known identity.
    pub fn with_id(id: GraphId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            root: None,
            next_id: 0,
            violations: Vec::new(),
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a Real node whose behaviour is built by `factory` on activation.
    pub fn add_real<B, F>(&mut self, name: impl Into<String>, factory: F) -> NodeId
    where
        B: StateBehavior<C> + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let id = self.allocate();
        self.nodes.push(Node::real(id, name, move || {
            Box::new(factory()) as Box<dyn StateBehavior<C>>
        }));
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Add a pass-through node.
    pub fn add_hub(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.allocate();
        self.nodes.push(Node::hub(id, name));
        id
    }

    /// Add a terminal node.
    pub fn add_exit(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.allocate();
        self.nodes.push(Node::exit(id, name));
        id
    }

    /// Add the node whose transitions are polled every tick.
    pub fn add_common(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.allocate();
        self.nodes.push(Node::common(id, name));
        id
    }

    /// Add a prepared node, keeping its id.
    ///
    /// The id counter moves past the node's id so later nodes never collide.
    pub fn add_node(&mut self, node: Node<C>) -> NodeId {
        let id = node.id();
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        if self.root.is_none() && node.is_real() {
            self.root = Some(id);
        }
        self.nodes.push(node);
        id
    }

    /// Designate the root node.
    pub fn set_root(&mut self, node: NodeId) -> &mut Self {
        self.root = Some(node);
        self
    }

    /// Attach a completion handler to a Real node.
    ///
    /// An unknown id or a node of another kind is reported by `build`.
    pub fn on_complete(&mut self, node: NodeId, handler: CompletionHandler<C>) -> &mut Self {
        match self.nodes.iter_mut().find(|n| n.id() == node) {
            Some(n) => {
                let kind = n.tag();
                if !n.set_completion(handler) {
                    self.violations
                        .push(IntegrityViolation::HandlerOnNonReal { node, kind });
                }
            }
            None => self
                .violations
                .push(IntegrityViolation::UnknownSource { node }),
        }
        self
    }

    /// Record the authoring position of a node.
    pub fn position(&mut self, node: NodeId, position: [f32; 2]) -> &mut Self {
        match self.nodes.iter_mut().find(|n| n.id() == node) {
            Some(n) => n.set_position(position),
            None => self
                .violations
                .push(IntegrityViolation::UnknownSource { node }),
        }
        self
    }

    /// Append a pre-built transition to `from`.
    pub fn add_transition(&mut self, from: NodeId, transition: Transition<C>) -> &mut Self {
        match self.nodes.iter_mut().find(|n| n.id() == from) {
            Some(node) => node.push_transition(transition),
            None => self
                .violations
                .push(IntegrityViolation::UnknownSource { node: from }),
        }
        self
    }

    /// Append a transition built from `builder` to `from`.
    /// Returns an error if the builder fails validation.
    pub fn connect(
        &mut self,
        from: NodeId,
        builder: TransitionBuilder<C>,
    ) -> Result<&mut Self, BuildError> {
        let transition = builder.build()?;
        Ok(self.add_transition(from, transition))
    }

    /// Build the graph.
    /// Returns every integrity violation if the graph is malformed.
    pub fn build(self) -> Result<Graph<C>, BuildError> {
        let graph = Graph::from_parts(self.id, self.nodes, self.root, self.next_id);

        match (graph, self.violations.is_empty()) {
            (Ok(graph), true) => Ok(graph),
            (Ok(_), false) => Err(GraphIntegrityError::new(self.violations).into()),
            (Err(mut err), _) => {
                err.violations.extend(self.violations);
                Err(err.into())
            }
        }
    }
}

impl<C: 'static> Default for GraphBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Idle, Instant};
    use crate::graph::KindTag;

    #[derive(Default)]
    struct Ctx {
        ready: bool,
    }

    #[test]
    fn builder_requires_root() {
        let mut builder = GraphBuilder::<Ctx>::new();
        builder.add_hub("lonely hub");

        let result = builder.build();
        let Err(BuildError::Integrity(err)) = result else {
            panic!("expected integrity error");
        };
        assert!(err.contains(&IntegrityViolation::MissingRoot));
    }

    #[test]
    fn first_real_node_becomes_root() {
        let mut builder = GraphBuilder::<Ctx>::new();
        let hub = builder.add_hub("hub");
        let first = builder.add_real("first", || Idle);
        let second = builder.add_real("second", || Instant);
        builder.add_transition(hub, Transition::to(second));

        let graph = builder.build().unwrap();
        assert_eq!(graph.root(), first);
        assert_eq!(graph.next_id(), 3);
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut builder = GraphBuilder::<Ctx>::new();
        let a = builder.add_real("a", || Idle);
        let b = builder.add_hub("b");
        let c = builder.add_exit("c");
        let d = builder.add_common("d");

        assert_eq!([a, b, c, d], [NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn fluent_api_builds_graph() {
        let mut builder = GraphBuilder::<Ctx>::new();
        let wait = builder.add_real("wait", || Idle);
        let done = builder.add_exit("done");
        builder
            .connect(wait, TransitionBuilder::new().to(done).when(|c: &mut Ctx| c.ready))
            .unwrap()
            .position(done, [10.0, 20.0]);

        let graph = builder.build().unwrap();
        let wait_node = graph.get_node(wait).unwrap();
        assert_eq!(wait_node.transitions().len(), 1);
        assert_eq!(graph.get_node(done).unwrap().position(), [10.0, 20.0]);
        assert_eq!(graph.get_node(done).unwrap().tag(), KindTag::Exit);
    }

    #[test]
    fn transition_from_unknown_node_is_reported() {
        let mut builder = GraphBuilder::<Ctx>::new();
        builder.add_real("a", || Idle);
        builder.add_transition(NodeId(40), Transition::terminal());

        let Err(BuildError::Integrity(err)) = builder.build() else {
            panic!("expected integrity error");
        };
        assert_eq!(
            err.violations,
            vec![IntegrityViolation::UnknownSource { node: NodeId(40) }]
        );
    }

    #[test]
    fn add_node_advances_counter() {
        let mut builder = GraphBuilder::<Ctx>::new();
        builder.add_node(Node::real(NodeId(9), "imported", || Box::new(Idle)));
        let next = builder.add_exit("after");

        assert_eq!(next, NodeId(10));
        assert_eq!(builder.build().unwrap().root(), NodeId(9));
    }

    #[test]
    fn completion_handler_attaches_to_real_node() {
        let mut builder = GraphBuilder::<Ctx>::new();
        let a = builder.add_real("a", || Instant);
        builder.on_complete(a, CompletionHandler::new(|c: &mut Ctx| c.ready = true));

        let graph = builder.build().unwrap();
        let handler = graph
            .get_node(a)
            .and_then(Node::as_real)
            .and_then(|real| real.completion_handler());
        assert!(handler.is_some());
    }

    #[test]
    fn misplaced_completion_handlers_are_reported() {
        let mut builder = GraphBuilder::<Ctx>::new();
        builder.add_real("a", || Idle);
        let hub = builder.add_hub("h");
        builder
            .on_complete(hub, CompletionHandler::new(|c: &mut Ctx| c.ready = true))
            .on_complete(NodeId(99), CompletionHandler::new(|c: &mut Ctx| c.ready = true));

        let Err(BuildError::Integrity(err)) = builder.build() else {
            panic!("expected integrity error");
        };
        assert_eq!(
            err.violations,
            vec![
                IntegrityViolation::HandlerOnNonReal {
                    node: hub,
                    kind: KindTag::Hub,
                },
                IntegrityViolation::UnknownSource { node: NodeId(99) },
            ]
        );
    }

    #[test]
    fn position_of_unknown_node_is_reported() {
        let mut builder = GraphBuilder::<Ctx>::new();
        builder.add_real("a", || Idle);
        builder.position(NodeId(7), [1.0, 2.0]);

        let Err(BuildError::Integrity(err)) = builder.build() else {
            panic!("expected integrity error");
        };
        assert!(err.contains(&IntegrityViolation::UnknownSource { node: NodeId(7) }));
    }
}
