//! The immutable state graph.
//!
//! A [`Graph`] is validated once, when it is constructed, and never changes
//! afterwards. Engines only read it, so one graph can be shared behind an
//! `Arc` by any number of engines running at the same time.

mod error;
mod node;
mod transition;
mod validate;

pub use error::{GraphIntegrityError, IntegrityViolation};
pub use node::{GraphId, KindTag, Node, NodeId, NodeKind, RealNode};
pub use transition::{first_satisfied, Transition};

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Validated collection of nodes and transitions.
pub struct Graph<C> {
    id: GraphId,
    nodes: Vec<Node<C>>,
    index: HashMap<NodeId, usize>,
    root: NodeId,
    common: Option<NodeId>,
    next_id: u32,
}

impl<C> Graph<C> {
    /// Assemble and validate a graph.
    ///
    /// Fails with every integrity violation found: dangling targets,
    /// duplicate ids, a missing or non-Real root, transitions into the Common
    /// node, Exit nodes with transitions, more than one Common node, or an id
    /// counter that does not lead every node id.
    pub fn from_parts(
        id: GraphId,
        mut nodes: Vec<Node<C>>,
        root: Option<NodeId>,
        next_id: u32,
    ) -> Result<Self, GraphIntegrityError> {
        validate::validate(&nodes, root, next_id)?;
        let root = root.ok_or_else(|| GraphIntegrityError::single(IntegrityViolation::MissingRoot))?;

        for node in &mut nodes {
            node.owner = Some(id);
        }
        let index = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id(), position))
            .collect();
        let common = nodes
            .iter()
            .find(|n| n.tag() == KindTag::Common)
            .map(Node::id);

        Ok(Self {
            id,
            nodes,
            index,
            root,
            common,
            next_id,
        })
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node<C>> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node<C> {
        // Validation guarantees the root is present.
        &self.nodes[self.index[&self.root]]
    }

    pub fn common_node(&self) -> Option<&Node<C>> {
        self.common.and_then(|id| self.get_node(id))
    }

    /// Nodes in authoring order.
    pub fn nodes(&self) -> &[Node<C>] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The id the authoring layer would hand out next.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Nodes that no transition path from the root or the Common node reaches.
    ///
    /// Unreachable nodes are legal; they simply never run.
    pub fn unreachable_nodes(&self) -> Vec<NodeId> {
        let mut reached: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(self.root);
        queue.extend(self.common);

        while let Some(id) = queue.pop_front() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(node) = self.get_node(id) {
                queue.extend(node.transitions().iter().filter_map(Transition::target));
            }
        }

        self.nodes
            .iter()
            .map(Node::id)
            .filter(|id| !reached.contains(id))
            .collect()
    }
}

impl<C> fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("common", &self.common)
            .field("nodes", &self.nodes)
            .finish()
    }
}
