//! Serialisable graph assets.
//!
//! An asset is the data half of a graph: topology, names, positions, and the
//! keys of the behaviours, conditions, and handlers each node uses. Closures
//! cannot be serialised, so resolving an asset into a runnable [`Graph`]
//! goes through a [`Registry`] that maps those keys back to code.

use crate::graph::{Graph, GraphId, Node, NodeId, NodeKind, RealNode, Transition};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;
pub mod registry;

pub use error::{AssetError, KeyKind};
pub use registry::Registry;

/// Version identifier for the asset format
pub const ASSET_VERSION: u32 = 1;

/// Serialisable description of a whole graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphAsset {
    /// Asset format version
    pub version: u32,

    /// Identity of the graph built from this asset
    pub id: GraphId,

    /// Node activated by `play()`
    pub root: Option<NodeId>,

    /// Next id the authoring tool will hand out
    pub next_id: u32,

    pub nodes: Vec<NodeAsset>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeAsset {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub position: [f32; 2],
    pub kind: NodeKindAsset,
    #[serde(default)]
    pub transitions: Vec<TransitionAsset>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindAsset {
    Real {
        /// Registry key of the behaviour factory
        behavior: String,
        /// Registry key of the completion handler
        on_complete: Option<String>,
    },
    Hub,
    Exit,
    Common,
}

/// A transition in priority order; a missing target ends the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionAsset {
    pub condition: Option<ConditionRef>,
    pub target: Option<NodeId>,
}

/// A registered condition, optionally negated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRef {
    pub key: String,
    #[serde(default)]
    pub negate: bool,
}

impl GraphAsset {
    /// Empty asset at the current format version.
    pub fn new() -> Self {
        Self {
            version: ASSET_VERSION,
            id: GraphId::new(),
            root: None,
            next_id: 0,
            nodes: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, AssetError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AssetError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let asset: Self = serde_json::from_str(json)
            .map_err(|e| AssetError::DeserializationFailed(e.to_string()))?;
        asset.check_version()?;
        Ok(asset)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, AssetError> {
        bincode::serialize(self).map_err(|e| AssetError::SerializationFailed(e.to_string()))
    }

    /// Decode from the binary format, rejecting other format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let asset: Self = bincode::deserialize(bytes)
            .map_err(|e| AssetError::DeserializationFailed(e.to_string()))?;
        asset.check_version()?;
        Ok(asset)
    }

    fn check_version(&self) -> Result<(), AssetError> {
        if self.version != ASSET_VERSION {
            return Err(AssetError::UnsupportedVersion {
                found: self.version,
                supported: ASSET_VERSION,
            });
        }
        Ok(())
    }

    /// Build a validated graph, looking every key up in `registry`.
    ///
    /// Fails on the first unknown key, or with every integrity violation of
    /// the resulting topology.
    pub fn resolve<C>(&self, registry: &Registry<C>) -> Result<Graph<C>, AssetError> {
        self.check_version()?;
        let nodes = self
            .nodes
            .iter()
            .map(|node| node.resolve(registry))
            .collect::<Result<Vec<_>, _>>()?;

        let graph = Graph::from_parts(self.id, nodes, self.root, self.next_id)?;
        debug!(graph = %graph.id(), nodes = graph.node_count(), "resolved graph asset");
        Ok(graph)
    }
}

impl Default for GraphAsset {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeAsset {
    fn resolve<C>(&self, registry: &Registry<C>) -> Result<Node<C>, AssetError> {
        let unknown = |kind, key: &str| AssetError::UnknownKey {
            kind,
            key: key.to_string(),
            node: self.id,
        };

        let kind = match &self.kind {
            NodeKindAsset::Real {
                behavior,
                on_complete,
            } => {
                let factory = registry
                    .behavior(behavior)
                    .ok_or_else(|| unknown(KeyKind::Behavior, behavior))?;
                let mut real = RealNode::new(factory.clone());
                if let Some(key) = on_complete {
                    let handler = registry
                        .handler(key)
                        .ok_or_else(|| unknown(KeyKind::Handler, key))?;
                    real = real.with_completion(handler.clone());
                }
                NodeKind::Real(real)
            }
            NodeKindAsset::Hub => NodeKind::Hub,
            NodeKindAsset::Exit => NodeKind::Exit,
            NodeKindAsset::Common => NodeKind::Common,
        };

        let mut node = Node::new(self.id, self.name.clone(), kind).at(self.position);
        for transition in &self.transitions {
            let mut resolved = Transition::with_target(transition.target);
            if let Some(reference) = &transition.condition {
                let condition = registry
                    .condition(&reference.key)
                    .ok_or_else(|| unknown(KeyKind::Condition, &reference.key))?;
                resolved = resolved.when(condition.clone().with_negate(reference.negate));
            }
            node = node.with_transition(resolved);
        }
        Ok(node)
    }
}
